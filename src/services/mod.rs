//! Services for aggregation, caching, export and orchestration

pub mod acquisition;
pub mod config;
pub mod export;
pub mod freshness;
pub mod indicator;
pub mod pipeline;
pub mod registry;

pub use acquisition::{AcquisitionSource, PortalCsvSource, TrendsCsvSource};
pub use config::Config;
pub use freshness::{is_actual, FetchResult};
pub use indicator::{builtin_definitions, IndicatorDefinition, Strategy};
pub use pipeline::{Pipeline, RefreshOutcome, SourceStatus};
pub use registry::IndicatorRegistry;
