//! Search-trends statistics normalizer
//!
//! Trends data arrives as a daily-indexed table with one numeric column per
//! requested keyword. Days are down-sampled to calendar months by taking the
//! arithmetic mean.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use super::{finish, SourceNormalizer};
use crate::types::{DateWindow, LeadError, NormalizedRecord, RawTable, Result};

const DATE_COLUMN: &str = "date";

/// Normalizer for the trends statistics API
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendsNormalizer;

impl SourceNormalizer for TrendsNormalizer {
    fn name(&self) -> &str {
        "trends"
    }

    fn process(
        &self,
        table: &RawTable,
        keyword: &str,
        window: &DateWindow,
    ) -> Result<Vec<NormalizedRecord>> {
        // The date index is either named or the first column
        let date_col = table.column_index(&[DATE_COLUMN]).unwrap_or(0);
        let value_col = table
            .column_index(&[keyword])
            .filter(|&idx| idx != date_col)
            .ok_or_else(|| LeadError::parse(keyword, "<missing column>"))?;

        // (year, month) -> (sum, days)
        let mut months: BTreeMap<(i32, u32), (f64, u32)> = BTreeMap::new();
        for row in 0..table.len() {
            let day = parse_day(table.cell(row, date_col))?;
            let text = table.cell(row, value_col);
            let value = text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LeadError::parse(keyword, text))?;

            let slot = months.entry((day.year(), day.month())).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }

        let records: Vec<NormalizedRecord> = months
            .into_iter()
            .filter_map(|((year, month), (sum, days))| {
                NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|date| NormalizedRecord::relative(date, sum / days as f64))
            })
            .collect();

        let records = finish(records, window);
        tracing::debug!(days = table.len(), months = records.len(), %window, "normalized trends table");
        Ok(records)
    }
}

/// Daily index cell: "2020-05-01" or "2020-05-01 00:00:00"
fn parse_day(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| LeadError::parse(DATE_COLUMN, text))
}
