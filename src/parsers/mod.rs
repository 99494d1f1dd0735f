//! Source normalizers: raw search-interest tables to monthly records

mod portal;
mod trends;

pub use portal::PortalNormalizer;
pub use trends::TrendsNormalizer;

use crate::types::{DateWindow, NormalizedRecord, RawTable, Result};

/// Trait for turning one source's raw table into a monthly record stream
pub trait SourceNormalizer: Send + Sync {
    /// Normalizer name (e.g., "trends")
    fn name(&self) -> &str;

    /// Normalize `table` for `keyword`, keeping only months strictly inside
    /// `window`. Output is sorted by date with unique dates.
    fn process(
        &self,
        table: &RawTable,
        keyword: &str,
        window: &DateWindow,
    ) -> Result<Vec<NormalizedRecord>>;
}

/// Apply the exclusive window filter, sort ascending and keep the first
/// record for any repeated month
fn finish(mut records: Vec<NormalizedRecord>, window: &DateWindow) -> Vec<NormalizedRecord> {
    records.retain(|r| window.contains(r.date));
    records.sort_by_key(|r| r.date);
    records.dedup_by_key(|r| r.date);
    records
}

/// Registry of available normalizers
pub struct NormalizerRegistry {
    normalizers: Vec<Box<dyn SourceNormalizer>>,
}

impl NormalizerRegistry {
    /// Create a new registry with both source normalizers
    pub fn new() -> Self {
        Self {
            normalizers: vec![Box::new(TrendsNormalizer), Box::new(PortalNormalizer)],
        }
    }

    /// Find a normalizer by name
    pub fn get(&self, name: &str) -> Option<&dyn SourceNormalizer> {
        self.normalizers
            .iter()
            .find(|n| n.name() == name)
            .map(|n| n.as_ref())
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
