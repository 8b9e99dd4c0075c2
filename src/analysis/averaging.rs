//! Averaging/resampling engine
//!
//! Folds consecutive raw samples into blocks of `block_factor` and keeps the
//! floor of each block mean. Samples that do not fill a whole block at the
//! end are dropped. Both behaviors match what old dump files were always
//! plotted with, so they are kept as they are.

use crate::error::{PicoLogError, Result};
use crate::types::{AveragedPoint, AveragedSeries, SampleSeries};
use chrono::{Duration, NaiveDateTime};

/// Reduce a raw series to block averages on a fixed time grid
///
/// Point `i` is stamped `start + i * interval * block_factor` seconds. A series
/// shorter than one block yields an empty result, not an error.
pub fn reduce(series: &SampleSeries, block_factor: usize) -> Result<AveragedSeries> {
    if block_factor == 0 {
        return Err(PicoLogError::InvalidInput(
            "block factor must be at least 1".to_string(),
        ));
    }

    let step_seconds = (series.interval_seconds() as u64).saturating_mul(block_factor as u64);
    let start = series.start();

    let mut points = Vec::with_capacity(series.len() / block_factor);
    for (i, block) in series.values.chunks_exact(block_factor).enumerate() {
        let sum: u64 = block.iter().map(|&v| v as u64).sum();
        points.push(AveragedPoint {
            timestamp: point_time(start, step_seconds, i)?,
            // The floor of a mean of u32 values fits in u32
            value: (sum / block_factor as u64) as u32,
        });
    }

    let dropped = series.len() % block_factor;
    if dropped > 0 {
        tracing::debug!("Dropped {} trailing samples (block factor {})", dropped, block_factor);
    }

    Ok(AveragedSeries {
        points,
        step_seconds,
        block_factor,
    })
}

/// Timestamp of point `index`, `start + index * step_seconds`
fn point_time(start: NaiveDateTime, step_seconds: u64, index: usize) -> Result<NaiveDateTime> {
    (index as u64)
        .checked_mul(step_seconds)
        .and_then(|offset| i64::try_from(offset).ok())
        .and_then(Duration::try_seconds)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or_else(|| {
            PicoLogError::InvalidInput(format!(
                "timestamp of point {} ({} s apart from {}) is out of range",
                index, step_seconds, start
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DumpTrailer;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(values: Vec<u32>, interval: u32) -> SampleSeries {
        let count = values.len();
        SampleSeries::new(values, DumpTrailer::new(start(), interval, count))
    }

    #[test]
    fn test_truncating_average() {
        let reduced = reduce(&series(vec![10, 11], 15), 2).unwrap();
        assert_eq!(reduced.values().collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn test_three_samples_one_point() {
        let reduced = reduce(&series(vec![0x0a, 0x0b, 0x0c], 15), 3).unwrap();
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.points[0].timestamp, start());
        assert_eq!(reduced.points[0].value, 11);
        assert_eq!(reduced.step_seconds, 45);
    }

    #[test]
    fn test_tail_dropped() {
        let reduced = reduce(&series((1..=25).collect(), 15), 10).unwrap();
        assert_eq!(reduced.len(), 2);
        assert_eq!(reduced.values().collect::<Vec<_>>(), vec![5, 15]);
        assert_eq!(
            reduced.points[1].timestamp,
            start() + Duration::seconds(150)
        );
    }

    #[test]
    fn test_short_series_is_empty() {
        let reduced = reduce(&series(vec![1, 2, 3], 15), 10).unwrap();
        assert!(reduced.is_empty());
        assert!(reduce(&series(vec![], 15), 1).unwrap().is_empty());
    }

    #[test]
    fn test_zero_block_factor() {
        let err = reduce(&series(vec![1, 2, 3], 15), 0).unwrap_err();
        assert!(matches!(err, PicoLogError::InvalidInput(_)));
    }

    #[test]
    fn test_huge_interval_short_series() {
        assert!(reduce(&series(vec![1, 2, 3], u32::MAX), 2000).unwrap().is_empty());

        let reduced = reduce(&series(vec![7; 2000], u32::MAX), 2000).unwrap();
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.points[0].timestamp, start());
        assert_eq!(reduced.points[0].value, 7);
    }

    #[test]
    fn test_timestamp_past_range_is_error() {
        let err = reduce(&series(vec![1; 4000], u32::MAX), 2000).unwrap_err();
        assert!(matches!(err, PicoLogError::InvalidInput(_)));
    }

    #[test]
    fn test_no_overflow_on_large_words() {
        let reduced = reduce(&series(vec![u32::MAX; 4], 15), 4).unwrap();
        assert_eq!(reduced.points[0].value, u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_output_length(
            values in prop::collection::vec(any::<u32>(), 0..500),
            factor in 1usize..50
        ) {
            let len = values.len();
            let reduced = reduce(&series(values, 15), factor).unwrap();
            prop_assert_eq!(reduced.len(), len / factor);
        }

        #[test]
        fn prop_factor_one_is_identity(
            values in prop::collection::vec(any::<u32>(), 0..200),
            interval in 0u32..=86_400
        ) {
            let reduced = reduce(&series(values.clone(), interval), 1).unwrap();
            prop_assert_eq!(reduced.values().collect::<Vec<_>>(), values);
            for (i, ts) in reduced.timestamps().enumerate() {
                prop_assert_eq!(ts, start() + Duration::seconds(i as i64 * interval as i64));
            }
        }

        #[test]
        fn prop_point_within_block_range(
            values in prop::collection::vec(0u32..=0xffff, 1..300),
            factor in 1usize..20
        ) {
            let reduced = reduce(&series(values.clone(), 60), factor).unwrap();
            for (point, block) in reduced.points.iter().zip(values.chunks_exact(factor)) {
                let min = *block.iter().min().unwrap();
                let max = *block.iter().max().unwrap();
                prop_assert!(point.value >= min && point.value <= max);
            }
        }
    }
}
