//! Leading indicators from search-interest statistics.
//!
//! Two sources are normalized into monthly record streams
//! ([`parsers`]) and combined by named indicators ([`services`]).

pub mod parsers;
pub mod services;
pub mod types;
