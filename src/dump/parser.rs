//! Dump File Parser
//!
//! Reads a dump file back into a [`SampleSeries`]. Lines are fed through a
//! [`LineClassifier`] which switches state exactly once, on the first line
//! that is neither data nor blank:
//!
//! ```text
//!   AwaitingTrailer --(first non-data, non-blank line)--> TrailerSeen
//! ```
//!
//! Data lines (prefix `0x`) contribute their tokens in either state. Every
//! other line after the transition is ignored.

use crate::error::{PicoLogError, Result};
use crate::types::{DumpTrailer, SampleSeries, SampleWord};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Prefix marking a data line
pub const DATA_PREFIX: &str = "0x";

/// Longest hex payload a token may carry (u32)
const MAX_HEX_DIGITS: usize = 8;

/// Role of one line in a dump file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Whitespace-separated hex sample tokens
    Data,
    /// The metadata line
    Trailer,
    /// Blank separator or anything after the trailer
    Ignored,
}

/// State of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierState {
    #[default]
    AwaitingTrailer,
    TrailerSeen,
}

/// Two-state classifier separating data lines from the trailer
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    state: ClassifierState,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Classify the next line, advancing the state if it is the trailer
    ///
    /// Only lines starting with the prefix in their first column are data.
    pub fn classify(&mut self, line: &str) -> LineClass {
        if line.starts_with(DATA_PREFIX) {
            return LineClass::Data;
        }
        match self.state {
            ClassifierState::AwaitingTrailer if !line.trim().is_empty() => {
                self.state = ClassifierState::TrailerSeen;
                LineClass::Trailer
            }
            _ => LineClass::Ignored,
        }
    }
}

/// Decode one `0x`-prefixed hex token
pub fn parse_hex_token(token: &str) -> std::result::Result<SampleWord, String> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .ok_or_else(|| format!("token {:?} lacks the 0x prefix", token))?;

    if digits.is_empty() || digits.len() > MAX_HEX_DIGITS {
        return Err(format!("token {:?} must have 1 to 8 hex digits", token));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("token {:?} is not hexadecimal", token));
    }

    SampleWord::from_str_radix(digits, 16).map_err(|e| format!("token {:?}: {}", token, e))
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a trailer line `<YYYYMMDD> <HHMMSS> <interval> <wordCount>`
pub fn parse_trailer(line: &str) -> Result<DumpTrailer> {
    let malformed = |reason: &str| PicoLogError::MalformedTrailer {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [date, time, interval, count] = fields[..] else {
        return Err(malformed(&format!("expected 4 fields, found {}", fields.len())));
    };

    if !all_digits(date, 8) {
        return Err(malformed("date must be YYYYMMDD"));
    }
    if !all_digits(time, 6) {
        return Err(malformed("time must be HHMMSS"));
    }

    // Both fields are plain ASCII digits at this point
    let num = |s: &str| s.parse::<u32>().unwrap_or_default();
    let start = NaiveDate::from_ymd_opt(
        num(&date[..4]) as i32,
        num(&date[4..6]),
        num(&date[6..]),
    )
    .and_then(|d| d.and_hms_opt(num(&time[..2]), num(&time[2..4]), num(&time[4..])))
    .ok_or_else(|| malformed("no such date/time"))?;

    let interval_seconds = interval
        .parse::<u32>()
        .map_err(|e| malformed(&format!("bad interval {:?}: {}", interval, e)))?;
    let word_count = count
        .parse::<usize>()
        .map_err(|e| malformed(&format!("bad word count {:?}: {}", count, e)))?;

    Ok(DumpTrailer::new(start, interval_seconds, word_count))
}

/// Parser behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Fail when the trailer's word count differs from the words found
    pub strict_word_count: bool,
}

/// Reads dump files into sample series
#[derive(Debug, Clone, Default)]
pub struct DumpParser {
    options: ParseOptions,
}

impl DumpParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse the dump file at `path`
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SampleSeries> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PicoLogError::MissingFile {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                let context = format!("can't open {}", path.display());
                return Err(PicoLogError::Io(e).with_context(context));
            }
        };

        let series = self.parse_reader(BufReader::new(file))?;
        tracing::info!(
            "Parsed {}: {} samples from {}",
            path.display(),
            series.len(),
            series.start()
        );
        Ok(series)
    }

    /// Parse a dump from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<SampleSeries> {
        let mut classifier = LineClassifier::new();
        let mut values = Vec::new();
        let mut trailer = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            match classifier.classify(&line) {
                LineClass::Data => {
                    for token in line.split_whitespace() {
                        let word = parse_hex_token(token).map_err(|reason| {
                            PicoLogError::MalformedData {
                                line_number,
                                line: line.clone(),
                                reason,
                            }
                        })?;
                        values.push(word);
                    }
                }
                LineClass::Trailer => trailer = Some(parse_trailer(line.trim())?),
                LineClass::Ignored => {
                    if !line.trim().is_empty() {
                        tracing::debug!("Ignoring line {}: {:?}", line_number, line);
                    }
                }
            }
        }

        let trailer = trailer.ok_or_else(|| PicoLogError::MalformedTrailer {
            line: String::new(),
            reason: "no trailer line found".to_string(),
        })?;

        let series = SampleSeries::new(values, trailer);
        if !series.word_count_matches() {
            if self.options.strict_word_count {
                return Err(PicoLogError::WordCountMismatch {
                    declared: trailer.word_count,
                    actual: series.len(),
                });
            }
            tracing::warn!(
                "Trailer declares {} words but the dump holds {}",
                trailer.word_count,
                series.len()
            );
        }
        Ok(series)
    }
}

/// Parse a dump file with default (tolerant) options
pub fn parse_dump_file(path: impl AsRef<Path>) -> Result<SampleSeries> {
    DumpParser::default().parse_file(path)
}
