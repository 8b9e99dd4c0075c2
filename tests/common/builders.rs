//! Test data builders for creating test objects

use chrono::NaiveDateTime;
use picolog::{DumpTrailer, SampleSeries};

/// Builder for creating test SampleSeries
pub struct SampleSeriesBuilder {
    values: Vec<u32>,
    start: NaiveDateTime,
    interval_seconds: u32,
    word_count: Option<usize>,
}

impl SampleSeriesBuilder {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            start: super::factory_start(),
            interval_seconds: 15,
            word_count: None,
        }
    }

    pub fn values(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// A slow triangle wave, roughly what a day of daylight looks like
    pub fn daylight(mut self, len: usize) -> Self {
        self.values = (0..len)
            .map(|i| {
                let phase = (i % 200) as u32;
                if phase < 100 {
                    phase * 40
                } else {
                    (200 - phase) * 40
                }
            })
            .collect();
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    pub fn interval(mut self, seconds: u32) -> Self {
        self.interval_seconds = seconds;
        self
    }

    /// Declare a word count different from the number of values
    pub fn word_count(mut self, count: usize) -> Self {
        self.word_count = Some(count);
        self
    }

    pub fn build(self) -> SampleSeries {
        let count = self.word_count.unwrap_or(self.values.len());
        SampleSeries::new(
            self.values,
            DumpTrailer::new(self.start, self.interval_seconds, count),
        )
    }
}

impl Default for SampleSeriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_series_builder() {
        let series = SampleSeriesBuilder::new()
            .values([1, 2, 3])
            .interval(60)
            .word_count(5)
            .build();

        assert_eq!(series.values, vec![1, 2, 3]);
        assert_eq!(series.interval_seconds(), 60);
        assert_eq!(series.trailer.word_count, 5);
    }
}
