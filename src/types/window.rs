//! Requested analysis window

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{LeadError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date range requested by the caller.
///
/// Both bounds are exclusive when filtering: a record dated exactly on
/// `start` or `end` is dropped. Picking `start` as the first day of the
/// wanted first month therefore excludes that month; use [`DateWindow::padded`]
/// to widen the bounds when that is not intended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build the window the dashboard sends for a picked date range:
    /// first day of the start month to the last day of the end month.
    pub fn from_month_range(start: NaiveDate, end: NaiveDate) -> Self {
        let first = start.with_day(1).unwrap_or(start);
        let last = end
            .with_day(1)
            .and_then(|d| d.checked_add_months(Months::new(1)))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .unwrap_or(end);
        Self::new(first, last)
    }

    /// Exclusive on both ends: `start < date < end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date < self.end
    }

    /// Widen by one day on each side so dates on the requested bounds pass
    /// the exclusive filter.
    pub fn padded(&self) -> Self {
        Self {
            start: self
                .start
                .checked_sub_days(Days::new(1))
                .unwrap_or(self.start),
            end: self.end.checked_add_days(Days::new(1)).unwrap_or(self.end),
        }
    }

    /// Wire format used by acquisition sources and as the cache key
    pub fn wire_format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl FromStr for DateWindow {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once(' ')
            .ok_or_else(|| LeadError::parse("window", s))?;
        let start =
            NaiveDate::parse_from_str(start, DATE_FORMAT).map_err(|_| LeadError::parse("window", s))?;
        let end =
            NaiveDate::parse_from_str(end, DATE_FORMAT).map_err(|_| LeadError::parse("window", s))?;
        let window = Self::new(start, end);

        // chrono skips leading whitespace and accepts unpadded fields;
        // only the canonical form is a valid cache key
        if window.wire_format() != s {
            return Err(LeadError::parse("window", s));
        }
        Ok(window)
    }
}
