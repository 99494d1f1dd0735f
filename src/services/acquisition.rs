//! Acquisition sources backed by exported CSV files
//!
//! The live trends API client and the portal scraper live outside this
//! crate; they hand over their data as CSV exports which these sources read.

use std::path::{Path, PathBuf};

use crate::types::{DateWindow, LeadError, RawTable, Result};

/// Marker column the trends API appends; never reaches a normalizer
const PARTIAL_MARKER: &str = "isPartial";

/// Trait for sources that produce raw tables for a keyword and window
pub trait AcquisitionSource: Send + Sync {
    /// Source name (e.g., "trends")
    fn name(&self) -> &str;

    /// Authenticate against the source. Sources without auth succeed.
    fn authenticate(&mut self) -> Result<()> {
        Ok(())
    }

    /// Fetch the raw table for `keyword` over `window`
    fn fetch(&self, keyword: &str, window: &DateWindow) -> Result<RawTable>;
}

/// Trends statistics export: comma-separated, date index first
pub struct TrendsCsvSource {
    path: PathBuf,
}

impl TrendsCsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AcquisitionSource for TrendsCsvSource {
    fn name(&self) -> &str {
        "trends"
    }

    fn fetch(&self, keyword: &str, window: &DateWindow) -> Result<RawTable> {
        tracing::info!(path = %self.path.display(), keyword, %window, "reading trends export");
        let mut table = read_table(&self.path, b',')?;
        table.drop_column(PARTIAL_MARKER);
        Ok(table)
    }
}

/// Query-volume portal export: delimiter-separated with a trailing delimiter
/// on every line
pub struct PortalCsvSource {
    path: PathBuf,
    delimiter: u8,
    authenticated: bool,
}

impl PortalCsvSource {
    pub fn new(path: PathBuf, delimiter: u8) -> Self {
        Self {
            path,
            delimiter,
            authenticated: false,
        }
    }
}

impl AcquisitionSource for PortalCsvSource {
    fn name(&self) -> &str {
        "portal"
    }

    fn authenticate(&mut self) -> Result<()> {
        if !self.path.is_file() {
            return Err(LeadError::Auth(format!(
                "portal export {} is not accessible",
                self.path.display()
            )));
        }
        self.authenticated = true;
        Ok(())
    }

    fn fetch(&self, keyword: &str, window: &DateWindow) -> Result<RawTable> {
        if !self.authenticated {
            return Err(LeadError::Auth(
                "portal source used before authentication".into(),
            ));
        }
        tracing::info!(path = %self.path.display(), keyword, %window, "reading portal export");
        let mut table = read_table(&self.path, self.delimiter)?;
        if table.headers.last().is_some_and(|h| h.is_empty()) {
            table.drop_last_column();
        }
        Ok(table)
    }
}

fn read_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    RawTable::from_path(path, delimiter)
        .map_err(|e| LeadError::Acquisition(format!("{}: {}", path.display(), e)))
}
