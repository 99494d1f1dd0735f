//! Normalized and aggregated series types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of one source, after normalization.
///
/// `date` is always the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    pub relative_value: f64,
    /// Raw query count; only the query-volume portal reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_value: Option<u64>,
}

impl NormalizedRecord {
    pub fn relative(date: NaiveDate, relative_value: f64) -> Self {
        Self {
            date,
            relative_value,
            absolute_value: None,
        }
    }
}

/// One point of an indicator series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Descriptive statistics over a series of values.
///
/// Quantiles use linear interpolation between closest ranks; `std` is the
/// sample standard deviation and is `None` for fewer than two values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl SeriesStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(var.sqrt())
        } else {
            None
        };

        Self {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            p25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            p75: Some(quantile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

/// `sorted` must be non-empty and ascending
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_stats_empty() {
        let stats = SeriesStats::from_values(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_none());
        assert!(stats.max.is_none());
    }

    #[test]
    fn test_stats_single_value_has_no_std() {
        let stats = SeriesStats::from_values(&[4.0]);
        assert_eq!(stats.count, 1);
        assert!(approx(stats.mean, 4.0));
        assert!(stats.std.is_none());
        assert!(approx(stats.median, 4.0));
    }

    #[test]
    fn test_stats_quartiles_interpolate() {
        let stats = SeriesStats::from_values(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert!(approx(stats.mean, 2.5));
        assert!(approx(stats.min, 1.0));
        assert!(approx(stats.p25, 1.75));
        assert!(approx(stats.median, 2.5));
        assert!(approx(stats.p75, 3.25));
        assert!(approx(stats.max, 4.0));
        // sample variance of 1..=4 is 5/3
        assert!(approx(stats.std, (5.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_absolute_value_omitted_when_absent() {
        let record = NormalizedRecord::relative(NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(), 1.5);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"date":"2020-05-01","relative_value":1.5}"#);
    }
}
