//! Query-volume portal export normalizer
//!
//! The portal reports one row per month with a month-year label
//! ("May 2020"), a space-grouped query count ("1 234") and a share of all
//! queries written with a decimal comma ("0,42").

use chrono::{Datelike, NaiveDate};

use super::{finish, SourceNormalizer};
use crate::types::{DateWindow, LeadError, NormalizedRecord, RawTable, Result};

// Raw portal headers first, canonical names second so re-exported
// normalized tables go through the same path.
const DATE_COLUMNS: &[&str] = &["Period", "date"];
const ABSOLUTE_COLUMNS: &[&str] = &["Number of queries", "absolute_value"];
const RELATIVE_COLUMNS: &[&str] = &["Percentage of total queries, %", "relative_value"];

/// Normalizer for the search-query-volume portal
#[derive(Debug, Default, Clone, Copy)]
pub struct PortalNormalizer;

impl SourceNormalizer for PortalNormalizer {
    fn name(&self) -> &str {
        "portal"
    }

    fn process(
        &self,
        table: &RawTable,
        _keyword: &str,
        window: &DateWindow,
    ) -> Result<Vec<NormalizedRecord>> {
        let date_col = require_column(table, DATE_COLUMNS)?;
        let abs_col = require_column(table, ABSOLUTE_COLUMNS)?;
        let rel_col = require_column(table, RELATIVE_COLUMNS)?;

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            records.push(NormalizedRecord {
                date: parse_period(table.cell(row, date_col))?,
                relative_value: parse_decimal_comma(table.cell(row, rel_col))?,
                absolute_value: Some(parse_grouped_count(table.cell(row, abs_col))?),
            });
        }

        let parsed = records.len();
        let records = finish(records, window);
        tracing::debug!(parsed, kept = records.len(), %window, "normalized portal table");
        Ok(records)
    }
}

fn require_column(table: &RawTable, names: &[&str]) -> Result<usize> {
    table
        .column_index(names)
        .ok_or_else(|| LeadError::parse(names[0], "<missing column>"))
}

/// "May 2020" (or an already normalized "2020-05-01") to the first of the month
fn parse_period(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", text), "%d %B %Y")
        .or_else(|_| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map(|d| d.with_day(1).unwrap_or(d))
        })
        .map_err(|_| LeadError::parse(DATE_COLUMNS[0], text))
}

/// "1 234" to 1234; any whitespace (including non-breaking) is a group separator
fn parse_grouped_count(text: &str) -> Result<u64> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    digits
        .parse::<u64>()
        .map_err(|_| LeadError::parse(ABSOLUTE_COLUMNS[0], text))
}

/// "0,42" to 0.42; "NaN" and "inf" are not shares
fn parse_decimal_comma(text: &str) -> Result<f64> {
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LeadError::parse(RELATIVE_COLUMNS[0], text))
}
