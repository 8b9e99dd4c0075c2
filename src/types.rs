//! Core data types for picolog
//!
//! This module contains the data model shared by the dump parser, the
//! averaging engine and the presentation layer:
//!
//! - [`DumpTrailer`] - The metadata line closing every dump
//! - [`SampleSeries`] - Raw sample words plus their timing information
//! - [`AveragedSeries`] - Block-averaged, uniformly time-indexed points

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw sample as read from the logger's flash (oldest first)
pub type SampleWord = u32;

/// Format of the date field of a trailer
pub const TRAILER_DATE_FORMAT: &str = "%Y%m%d";

/// Format of the time field of a trailer
pub const TRAILER_TIME_FORMAT: &str = "%H%M%S";

/// Session metadata appended after the data block of a dump
///
/// Wire form: `<YYYYMMDD> <HHMMSS> <intervalSeconds> <wordCount>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpTrailer {
    /// Date and time of the first sample
    pub start: NaiveDateTime,
    /// Seconds between two consecutive samples
    pub interval_seconds: u32,
    /// Number of words the device claims to have sent
    pub word_count: usize,
}

impl DumpTrailer {
    /// Create a new trailer
    pub fn new(start: NaiveDateTime, interval_seconds: u32, word_count: usize) -> Self {
        Self {
            start,
            interval_seconds,
            word_count,
        }
    }
}

impl Default for DumpTrailer {
    /// The logger's factory settings: 01.01.2022 00:00:00, 15 s
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self::new(start, 15, 0)
    }
}

impl fmt::Display for DumpTrailer {
    /// Renders the trailer the way the firmware prints it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:06} {}",
            self.start.format(TRAILER_DATE_FORMAT),
            self.start.format(TRAILER_TIME_FORMAT),
            self.interval_seconds,
            self.word_count
        )
    }
}

/// Raw samples reconstructed from a dump file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleSeries {
    /// Sample words in recording order
    pub values: Vec<SampleWord>,
    /// Timing information taken from the trailer
    pub trailer: DumpTrailer,
}

impl SampleSeries {
    /// Create a series from raw values and a trailer
    pub fn new(values: Vec<SampleWord>, trailer: DumpTrailer) -> Self {
        Self { values, trailer }
    }

    /// Start of the recording
    pub fn start(&self) -> NaiveDateTime {
        self.trailer.start
    }

    /// Seconds between raw samples
    pub fn interval_seconds(&self) -> u32 {
        self.trailer.interval_seconds
    }

    /// Number of raw samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no samples were recorded
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the trailer's word count agrees with the samples actually present
    pub fn word_count_matches(&self) -> bool {
        self.trailer.word_count == self.values.len()
    }
}

/// One point of a reduced series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AveragedPoint {
    /// Start of the block this point averages
    pub timestamp: NaiveDateTime,
    /// Floor of the block mean
    pub value: u32,
}

/// Block-averaged series ready for plotting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AveragedSeries {
    /// Points in time order
    pub points: Vec<AveragedPoint>,
    /// Seconds between two points (`interval * block_factor`)
    pub step_seconds: u64,
    /// Number of raw samples folded into each point
    pub block_factor: usize,
}

impl AveragedSeries {
    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Timestamps in order
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    /// Values in order
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Convert to plot points; x is the Unix time of the naive timestamp read as UTC
    pub fn as_plot_points(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p.timestamp.and_utc().timestamp() as f64, p.value as f64])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
    }

    #[test]
    fn test_trailer_display_matches_firmware() {
        let trailer = DumpTrailer::new(start(), 15, 1200);
        assert_eq!(trailer.to_string(), "20220304 050607 000015 1200");
    }

    #[test]
    fn test_default_trailer() {
        let trailer = DumpTrailer::default();
        assert_eq!(trailer.to_string(), "20220101 000000 000015 0");
    }

    #[test]
    fn test_word_count_matches() {
        let series = SampleSeries::new(vec![1, 2, 3], DumpTrailer::new(start(), 15, 5));
        assert!(!series.word_count_matches());
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_plot_points() {
        let series = AveragedSeries {
            points: vec![AveragedPoint {
                timestamp: start(),
                value: 42,
            }],
            step_seconds: 150,
            block_factor: 10,
        };
        let points = series.as_plot_points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0][0], start().and_utc().timestamp() as f64);
        assert_eq!(points[0][1], 42.0);
    }
}
