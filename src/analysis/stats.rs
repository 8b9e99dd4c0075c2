//! Summary statistics of an averaged series

use crate::types::AveragedSeries;
use chrono::NaiveDateTime;
use std::fmt;

/// Statistics over the values of an [`AveragedSeries`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStatistics {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Number of points
    pub count: usize,
    /// Timestamp of the first point
    pub first: Option<NaiveDateTime>,
    /// Timestamp of the last point
    pub last: Option<NaiveDateTime>,
}

impl SeriesStatistics {
    /// Calculate statistics for a series; all zero when it is empty
    pub fn from_series(series: &AveragedSeries) -> Self {
        let values: Vec<f64> = series.values().map(f64::from).collect();
        Self {
            first: series.points.first().map(|p| p.timestamp),
            last: series.points.last().map(|p| p.timestamp),
            ..Self::from_values(&values)
        }
    }

    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            count,
            first: None,
            last: None,
        }
    }

    /// Get the peak-to-peak range
    pub fn peak_to_peak(&self) -> f64 {
        self.max - self.min
    }

    /// Check if any point contributed
    pub fn is_valid(&self) -> bool {
        self.count > 0
    }
}

impl fmt::Display for SeriesStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "no data");
        }
        write!(
            f,
            "{} points, min {:.0}, max {:.0}, mean {:.1}, std dev {:.1}",
            self.count, self.min, self.max, self.mean, self.std_dev
        )?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            write!(f, ", {} .. {}", first, last)?;
        }
        Ok(())
    }
}
