//! Fetch-normalize-aggregate orchestration
//!
//! `Pipeline` owns the acquisition sources and the last fetch of each one.
//! Normalization and aggregation are recomputed from the cached raw tables
//! on every call.

use crate::parsers::NormalizerRegistry;
use crate::services::acquisition::AcquisitionSource;
use crate::services::freshness::FetchResult;
use crate::services::registry::IndicatorRegistry;
use crate::types::{DateWindow, LeadError, NormalizedRecord, OutputRecord, RawTable, Result};

/// What happened to one source during a refresh
#[derive(Debug)]
pub enum SourceStatus {
    /// Cached data already matched the request
    Actual,
    /// New data was fetched and cached
    Fetched,
    /// Fetch failed; the previous cache entry is kept
    Failed(LeadError),
}

#[derive(Debug)]
pub struct RefreshOutcome {
    pub trends: SourceStatus,
    pub portal: SourceStatus,
}

impl RefreshOutcome {
    /// Neither source needed a fetch
    pub fn already_actual(&self) -> bool {
        matches!(
            (&self.trends, &self.portal),
            (SourceStatus::Actual, SourceStatus::Actual)
        )
    }
}

pub struct Pipeline {
    trends_source: Box<dyn AcquisitionSource>,
    portal_source: Box<dyn AcquisitionSource>,
    normalizers: NormalizerRegistry,
    registry: IndicatorRegistry,
    trends: FetchResult<RawTable>,
    portal: FetchResult<RawTable>,
    authenticated: bool,
    pad_window: bool,
}

impl Pipeline {
    pub fn new(
        trends_source: Box<dyn AcquisitionSource>,
        portal_source: Box<dyn AcquisitionSource>,
        registry: IndicatorRegistry,
    ) -> Self {
        Self {
            trends_source,
            portal_source,
            normalizers: NormalizerRegistry::new(),
            registry,
            trends: FetchResult::empty(),
            portal: FetchResult::empty(),
            authenticated: false,
            pad_window: false,
        }
    }

    /// Widen the filter window by one day on each side
    pub fn with_padding(mut self, pad_window: bool) -> Self {
        self.pad_window = pad_window;
        self
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    /// Authenticate the portal source; required before any refresh
    pub fn authenticate(&mut self) -> Result<()> {
        self.portal_source.authenticate()?;
        self.authenticated = true;
        tracing::info!("portal source authenticated");
        Ok(())
    }

    /// Fetch every source whose cached data does not match the request
    pub fn refresh(&mut self, keyword: &str, window: &DateWindow) -> Result<RefreshOutcome> {
        if !self.authenticated {
            return Err(LeadError::Auth(
                "authenticate with the portal before requesting data".into(),
            ));
        }

        let trends = refresh_one(self.trends_source.as_ref(), &mut self.trends, keyword, window);
        let portal = refresh_one(self.portal_source.as_ref(), &mut self.portal, keyword, window);
        let outcome = RefreshOutcome { trends, portal };

        if outcome.already_actual() {
            tracing::info!(keyword, %window, "already fetched actual data");
        }
        Ok(outcome)
    }

    pub fn normalized_trends(&self) -> Result<Vec<NormalizedRecord>> {
        self.normalize(self.trends_source.name(), &self.trends)
    }

    pub fn normalized_portal(&self) -> Result<Vec<NormalizedRecord>> {
        self.normalize(self.portal_source.name(), &self.portal)
    }

    /// Apply the named indicator to both normalized streams
    pub fn compute(&self, indicator: &str) -> Result<Vec<OutputRecord>> {
        let definition = self.registry.get(indicator)?;
        let trends = self.normalized_trends()?;
        let portal = self.normalized_portal()?;
        let output = definition.aggregate(&trends, &portal)?;
        tracing::debug!(indicator, points = output.len(), "computed indicator");
        Ok(output)
    }

    /// Normalize a cached table with the normalizer named like its source
    fn normalize(
        &self,
        source: &str,
        cached: &FetchResult<RawTable>,
    ) -> Result<Vec<NormalizedRecord>> {
        let normalizer = self
            .normalizers
            .get(source)
            .ok_or_else(|| LeadError::Config(format!("no normalizer for source '{}'", source)))?;
        let (Some(table), Some(window)) = (&cached.data, &cached.window) else {
            return Err(LeadError::Acquisition(format!("no {} data fetched yet", source)));
        };
        let window = if self.pad_window {
            window.padded()
        } else {
            *window
        };
        normalizer.process(table, &cached.keyword, &window)
    }
}

fn refresh_one(
    source: &dyn AcquisitionSource,
    cache: &mut FetchResult<RawTable>,
    keyword: &str,
    window: &DateWindow,
) -> SourceStatus {
    if cache.is_actual(keyword, window) {
        return SourceStatus::Actual;
    }

    match source.fetch(keyword, window) {
        Ok(table) => {
            tracing::info!(source = source.name(), rows = table.len(), "fetched source data");
            *cache = FetchResult::new(keyword, *window, table);
            SourceStatus::Fetched
        }
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "failed to fetch source data");
            SourceStatus::Failed(e)
        }
    }
}
