//! Freshness gate for fetched source data
//!
//! A fetch is reusable only while the requested keyword and the serialized
//! window both match what was fetched.

use crate::types::DateWindow;

/// Compare cached and requested keys. Windows are compared in their wire
/// form, so this works directly on acquisition-layer cache keys.
pub fn is_actual(
    cached_keyword: &str,
    cached_window: &str,
    requested_keyword: &str,
    requested_window: &str,
) -> bool {
    cached_keyword == requested_keyword && cached_window == requested_window
}

/// Last successful fetch of one source
#[derive(Debug, Clone)]
pub struct FetchResult<T> {
    pub keyword: String,
    pub window: Option<DateWindow>,
    pub data: Option<T>,
}

impl<T> FetchResult<T> {
    /// Nothing fetched yet; never actual
    pub fn empty() -> Self {
        Self {
            keyword: String::new(),
            window: None,
            data: None,
        }
    }

    pub fn new(keyword: impl Into<String>, window: DateWindow, data: T) -> Self {
        Self {
            keyword: keyword.into(),
            window: Some(window),
            data: Some(data),
        }
    }

    pub fn is_actual(&self, keyword: &str, window: &DateWindow) -> bool {
        match (&self.data, &self.window) {
            (Some(_), Some(cached)) => {
                is_actual(&self.keyword, &cached.wire_format(), keyword, &window.wire_format())
            }
            _ => false,
        }
    }
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
