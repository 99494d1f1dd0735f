//! Indicator strategies combining the trends and portal streams

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::types::{LeadError, NormalizedRecord, OutputRecord, Result};

/// Aggregation rule applied to a (trends, portal) pair of normalized streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Trends relative value as is
    TrendsRelative,
    /// Portal share of queries as is
    PortalRelative,
    /// Portal query count as is
    PortalAbsolute,
    /// Each relative series divided by its own maximum, summed per date
    NormalizedSum,
}

impl Strategy {
    pub fn aggregate(
        &self,
        trends: &[NormalizedRecord],
        portal: &[NormalizedRecord],
    ) -> Result<Vec<OutputRecord>> {
        match self {
            Strategy::TrendsRelative => Ok(relative_values(trends)),
            Strategy::PortalRelative => Ok(relative_values(portal)),
            Strategy::PortalAbsolute => Ok(portal
                .iter()
                .filter_map(|r| {
                    r.absolute_value.map(|abs| OutputRecord {
                        date: r.date,
                        value: abs as f64,
                    })
                })
                .collect()),
            Strategy::NormalizedSum => normalized_sum(trends, portal),
        }
    }
}

fn relative_values(records: &[NormalizedRecord]) -> Vec<OutputRecord> {
    records
        .iter()
        .map(|r| OutputRecord {
            date: r.date,
            value: r.relative_value,
        })
        .collect()
}

/// Divide by the series maximum; empty or zero-max series cannot be scaled
fn scale_by_max(records: &[NormalizedRecord], series: &str) -> Result<Vec<(NaiveDate, f64)>> {
    // f64::max drops NaN, so a bad value would otherwise pass silently
    if let Some(bad) = records.iter().find(|r| !r.relative_value.is_finite()) {
        return Err(LeadError::parse(series, &bad.relative_value.to_string()));
    }

    let max = records
        .iter()
        .map(|r| r.relative_value)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));

    match max {
        Some(max) if max != 0.0 && max.is_finite() => Ok(records
            .iter()
            .map(|r| (r.date, r.relative_value / max))
            .collect()),
        _ => Err(LeadError::DivisionByZero(series.to_string())),
    }
}

fn normalized_sum(
    trends: &[NormalizedRecord],
    portal: &[NormalizedRecord],
) -> Result<Vec<OutputRecord>> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (date, scaled) in scale_by_max(trends, "trends")?
        .into_iter()
        .chain(scale_by_max(portal, "portal")?)
    {
        *by_date.entry(date).or_insert(0.0) += scaled;
    }

    Ok(by_date
        .into_iter()
        .map(|(date, value)| OutputRecord { date, value })
        .collect())
}

/// A named, documented strategy as exposed to users
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDefinition {
    pub name: String,
    pub description: String,
    pub strategy: Strategy,
}

impl IndicatorDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            strategy,
        }
    }

    pub fn aggregate(
        &self,
        trends: &[NormalizedRecord],
        portal: &[NormalizedRecord],
    ) -> Result<Vec<OutputRecord>> {
        self.strategy.aggregate(trends, portal)
    }
}

/// The four indicators shipped with searchlead, in display order
pub fn builtin_definitions() -> Vec<IndicatorDefinition> {
    vec![
        IndicatorDefinition::new(
            "Trends Relative Indicator",
            "Trends Relative Indicator - relative popularity of the query according to the search-trends statistics",
            Strategy::TrendsRelative,
        ),
        IndicatorDefinition::new(
            "Portal Relative Indicator",
            "Portal Relative Indicator - relative popularity of the query (share of all queries) according to the query-volume portal",
            Strategy::PortalRelative,
        ),
        IndicatorDefinition::new(
            "Portal Absolute Indicator",
            "Portal Absolute Indicator - absolute popularity of the query (number of queries) according to the query-volume portal",
            Strategy::PortalAbsolute,
        ),
        IndicatorDefinition::new(
            "Relative Sum Indicator",
            "Relative Sum Indicator - sum of both relative popularities, each divided by its maximum over the period",
            Strategy::NormalizedSum,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trends(values: &[(u32, f64)]) -> Vec<NormalizedRecord> {
        values
            .iter()
            .map(|&(m, v)| NormalizedRecord::relative(ymd(2020, m, 1), v))
            .collect()
    }

    fn portal(values: &[(u32, f64, u64)]) -> Vec<NormalizedRecord> {
        values
            .iter()
            .map(|&(m, rel, abs)| NormalizedRecord {
                date: ymd(2020, m, 1),
                relative_value: rel,
                absolute_value: Some(abs),
            })
            .collect()
    }

    fn value_at(output: &[OutputRecord], month: u32) -> Option<f64> {
        output
            .iter()
            .find(|r| r.date == ymd(2020, month, 1))
            .map(|r| r.value)
    }

    // ========== Passthrough strategies ==========

    #[test]
    fn test_trends_relative_passthrough() {
        let t = trends(&[(1, 10.0), (2, 20.0)]);
        let p = portal(&[(3, 0.5, 100)]);

        let output = Strategy::TrendsRelative.aggregate(&t, &p).unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(value_at(&output, 1), Some(10.0));
        assert_eq!(value_at(&output, 2), Some(20.0));
        assert_eq!(value_at(&output, 3), None);
    }

    #[test]
    fn test_portal_relative_passthrough() {
        let t = trends(&[(1, 10.0)]);
        let p = portal(&[(2, 0.42, 1234), (3, 0.5, 2000)]);

        let output = Strategy::PortalRelative.aggregate(&t, &p).unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(value_at(&output, 2), Some(0.42));
        assert_eq!(value_at(&output, 1), None);
    }

    #[test]
    fn test_portal_absolute_passthrough() {
        let p = portal(&[(2, 0.42, 1234), (3, 0.5, 2000)]);

        let output = Strategy::PortalAbsolute.aggregate(&[], &p).unwrap();

        assert_eq!(value_at(&output, 2), Some(1234.0));
        assert_eq!(value_at(&output, 3), Some(2000.0));
    }

    #[test]
    fn test_passthrough_of_empty_stream_is_empty() {
        let output = Strategy::TrendsRelative.aggregate(&[], &[]).unwrap();
        assert!(output.is_empty());
    }

    // ========== Normalized sum ==========

    #[test]
    fn test_normalized_sum_single_source_date_not_affected() {
        let t = trends(&[(1, 10.0), (2, 5.0)]);
        let p = portal(&[(2, 0.4, 10)]);

        let output = Strategy::NormalizedSum.aggregate(&t, &p).unwrap();

        // January only in trends: 10 / 10 = 1.0, nothing added
        assert_eq!(value_at(&output, 1), Some(1.0));
    }

    #[test]
    fn test_normalized_sum_adds_coinciding_dates() {
        let t = trends(&[(1, 10.0), (2, 5.0)]);
        let p = portal(&[(2, 0.4, 10), (3, 0.2, 5)]);

        let output = Strategy::NormalizedSum.aggregate(&t, &p).unwrap();

        let dates: Vec<_> = output.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(2020, 1, 1), ymd(2020, 2, 1), ymd(2020, 3, 1)]);
        assert!((value_at(&output, 2).unwrap() - 1.5).abs() < 1e-12);
        assert!((value_at(&output, 3).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_sum_bounded_by_two() {
        let t = trends(&[(1, 3.0), (2, 7.0), (3, 1.0)]);
        let p = portal(&[(1, 0.9, 1), (2, 0.3, 1), (3, 0.6, 1)]);

        let output = Strategy::NormalizedSum.aggregate(&t, &p).unwrap();

        assert!(output.iter().all(|r| (0.0..=2.0).contains(&r.value)));
    }

    #[test]
    fn test_normalized_sum_all_zero_fails() {
        let t = trends(&[(1, 0.0), (2, 0.0)]);
        let p = portal(&[(1, 0.4, 10)]);

        let err = Strategy::NormalizedSum.aggregate(&t, &p).unwrap_err();

        assert!(matches!(err, LeadError::DivisionByZero(ref s) if s == "trends"));
    }

    #[test]
    fn test_normalized_sum_empty_portal_fails() {
        let t = trends(&[(1, 1.0)]);

        let err = Strategy::NormalizedSum.aggregate(&t, &[]).unwrap_err();

        assert!(matches!(err, LeadError::DivisionByZero(ref s) if s == "portal"));
    }

    #[test]
    fn test_normalized_sum_non_finite_value_fails() {
        let t = trends(&[(1, f64::NAN), (2, 0.5)]);
        let p = portal(&[(1, 0.4, 10)]);

        let err = Strategy::NormalizedSum.aggregate(&t, &p).unwrap_err();
        assert!(matches!(err, LeadError::Parse { ref column, .. } if column == "trends"));

        let p = portal(&[(1, f64::INFINITY, 10)]);
        let err = Strategy::NormalizedSum
            .aggregate(&trends(&[(1, 1.0)]), &p)
            .unwrap_err();
        assert!(matches!(err, LeadError::Parse { ref column, .. } if column == "portal"));
    }

    #[test]
    fn test_normalized_sum_does_not_mutate_inputs() {
        let t = trends(&[(1, 10.0)]);
        let p = portal(&[(1, 0.5, 10)]);

        Strategy::NormalizedSum.aggregate(&t, &p).unwrap();

        assert_eq!(t[0].relative_value, 10.0);
        assert_eq!(p[0].relative_value, 0.5);
    }

    // ========== Definitions ==========

    #[test]
    fn test_builtin_definitions_order() {
        let names: Vec<_> = builtin_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "Trends Relative Indicator",
                "Portal Relative Indicator",
                "Portal Absolute Indicator",
                "Relative Sum Indicator",
            ]
        );
    }

    #[test]
    fn test_definition_delegates_to_strategy() {
        let def = IndicatorDefinition::new("x", "y", Strategy::PortalAbsolute);
        let p = portal(&[(5, 0.1, 77)]);
        let output = def.aggregate(&[], &p).unwrap();
        assert_eq!(output[0].value, 77.0);
    }
}
