//! Integration tests for the dump file workflow
//!
//! These tests validate the path from a dump file to a plottable series:
//! - Files written by the receiver parse back to the same samples
//! - Averaging of parsed files
//! - Failure reporting for missing and corrupt files

mod common;

use common::builders::SampleSeriesBuilder;
use picolog::analysis::{reduce, write_csv, SeriesStatistics};
use picolog::dump::{parse_dump_file, DumpParser, ParseOptions, FIRMWARE_WORDS_PER_LINE};
use picolog::PicoLogError;
use std::fs;

#[test]
fn test_three_word_file_to_one_point() {
    let (_dir, path) = common::scratch_dump_path();
    fs::write(&path, "0x0A 0x0B 0x0C\n\n20220101 000000 15 3\n").unwrap();

    let series = parse_dump_file(&path).unwrap();
    let averaged = reduce(&series, 3).unwrap();

    assert_eq!(averaged.len(), 1);
    assert_eq!(averaged.points[0].timestamp, common::at(2022, 1, 1, 0, 0, 0));
    assert_eq!(averaged.points[0].value, 11);
}

#[test]
fn test_written_file_parses_back() {
    let (_dir, path) = common::scratch_dump_path();
    let series = SampleSeriesBuilder::new()
        .daylight(1000)
        .start(common::at(2022, 11, 7, 18, 30, 0))
        .interval(60)
        .build();

    let file = fs::File::create(&path).unwrap();
    series.write_dump(file, FIRMWARE_WORDS_PER_LINE).unwrap();

    let first = parse_dump_file(&path).unwrap();
    let second = parse_dump_file(&path).unwrap();
    assert_eq!(first, series);
    assert_eq!(first, second);
}

#[test]
fn test_count_mismatch_tolerated_unless_strict() {
    let (_dir, path) = common::scratch_dump_path();
    fs::write(&path, "0x0A 0x0B 0x0C\n\n20220101 000000 15 5\n").unwrap();

    assert_eq!(parse_dump_file(&path).unwrap().len(), 3);

    let strict = DumpParser::new(ParseOptions {
        strict_word_count: true,
    });
    assert!(matches!(
        strict.parse_file(&path),
        Err(PicoLogError::WordCountMismatch { .. })
    ));
}

#[test]
fn test_bad_token_reports_line() {
    let (_dir, path) = common::scratch_dump_path();
    fs::write(&path, "0x0001 0x0002\n0xZZ\n\n20220101 000000 15 3\n").unwrap();

    let err = parse_dump_file(&path).unwrap_err();
    let text = err.to_string();
    assert!(text.contains("line 2"), "{}", text);
    assert!(text.contains("0xZZ"), "{}", text);
}

#[test]
fn test_missing_file() {
    let (_dir, path) = common::scratch_dump_path();
    assert!(matches!(
        parse_dump_file(&path),
        Err(PicoLogError::MissingFile { .. })
    ));
}

#[test]
fn test_truncated_file_without_trailer() {
    let (_dir, path) = common::scratch_dump_path();
    fs::write(&path, "0x0001 0x0002\n0x0003\n").unwrap();
    assert!(matches!(
        parse_dump_file(&path),
        Err(PicoLogError::MalformedTrailer { .. })
    ));
}

#[test]
fn test_day_of_samples_to_csv() {
    let series = SampleSeriesBuilder::new().daylight(5760).build();
    let averaged = reduce(&series, 10).unwrap();

    assert_eq!(averaged.len(), 576);
    assert_eq!(averaged.step_seconds, 150);
    assert_eq!(
        averaged.points.last().unwrap().timestamp,
        common::at(2022, 1, 1, 23, 57, 30)
    );

    let stats = SeriesStatistics::from_series(&averaged);
    assert_eq!(stats.count, 576);
    assert!(stats.max <= 4000.0);

    let csv = String::from_utf8(write_csv(&averaged, Vec::new()).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 577);
    assert!(csv.starts_with("time,brightness\n2022-01-01 00:00:00,"));
}

#[test]
fn test_too_few_samples_is_empty_not_error() {
    let series = SampleSeriesBuilder::new().values([1, 2, 3]).build();
    let averaged = reduce(&series, 10).unwrap();
    assert!(averaged.is_empty());
    assert_eq!(SeriesStatistics::from_series(&averaged).count, 0);
}
