//! Scripted Transport for Testing
//!
//! This module provides an in-memory line transport that plays back a fixed
//! script of device replies and records every line the host writes. It lets
//! the session and dump logic run without a logger attached, and backs the
//! CLI's `--replay` option.
//!
//! # Example
//!
//! ```ignore
//! use picolog::backend::{ScriptedTransport, ScriptedReply};
//!
//! let mut transport = ScriptedTransport::new()
//!     .with_line("0x0001 0x0002")
//!     .with_line("")
//!     .with_line("20220101 000000 000015 2");
//!
//! let mut session = DeviceSession::new(transport);
//! session.dump_to_file("dumpfile.dat", DumpOptions::default(), |_| {})?;
//! ```

use crate::backend::transport::{LineTransport, TransportStats};
use crate::dump::writer::{format_data_line, FIRMWARE_WORDS_PER_LINE};
use crate::error::{PicoLogError, Result};
use crate::types::{DumpTrailer, SampleSeries};
use std::collections::VecDeque;
use std::io::BufRead;
use std::path::Path;

/// One scripted reaction of the fake device to a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// A line is available
    Line(String),
    /// The read runs into the timeout
    Timeout,
}

/// Line transport that replays a script
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    replies: VecDeque<ScriptedReply>,
    written: Vec<String>,
    stats: TransportStats,
}

impl ScriptedTransport {
    /// Create an empty script; every read times out
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a script from a text file, one device reply per line
    ///
    /// Blank lines are blank replies. Once the file is used up the device is
    /// silent.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            PicoLogError::Io(e).with_context(format!("can't open replay {}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Build a script from any line source
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut transport = Self::new();
        for line in reader.lines() {
            transport.push_line(line?.trim_end());
        }
        tracing::debug!("Replay script with {} lines", transport.remaining());
        Ok(transport)
    }

    /// Append a line to the script
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.push_line(line);
        self
    }

    /// Append several lines to the script
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push_line(line);
        }
        self
    }

    /// Append a timeout to the script
    pub fn with_timeout(mut self) -> Self {
        self.replies.push_back(ScriptedReply::Timeout);
        self
    }

    /// Append the full reply of a well-behaved device to `dump 0`
    ///
    /// Words are sent `words_per_line` at a time, then a blank line, then the trailer.
    pub fn with_dump_reply(mut self, series: &SampleSeries, words_per_line: usize) -> Self {
        for chunk in series.values.chunks(words_per_line.max(1)) {
            self.push_line(format_data_line(chunk));
        }
        self.push_line("");
        self.push_line(series.trailer.to_string());
        self
    }

    /// Append the reply of older firmware to `dump 0`
    ///
    /// That firmware sends the trailer straight after the data lines and then
    /// goes quiet, so the host only notices the end by timing out.
    pub fn with_legacy_dump_reply(mut self, values: &[u32], trailer: &DumpTrailer) -> Self {
        for chunk in values.chunks(FIRMWARE_WORDS_PER_LINE) {
            self.push_line(format_data_line(chunk));
        }
        self.push_line(trailer.to_string());
        self.replies.push_back(ScriptedReply::Timeout);
        self
    }

    /// Append a line to the script in place
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.replies.push_back(ScriptedReply::Line(line.into()));
    }

    /// Lines written by the host so far
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Number of scripted replies not consumed yet
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl LineTransport for ScriptedTransport {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.written.push(line.to_string());
        self.stats.record_sent();
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        match self.replies.pop_front() {
            Some(ScriptedReply::Line(line)) => {
                self.stats.record_received(&line);
                Ok(line)
            }
            Some(ScriptedReply::Timeout) | None => {
                self.stats.record_timeout();
                Err(PicoLogError::Timeout("scripted device is silent".to_string()))
            }
        }
    }

    fn stats(&self) -> TransportStats {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut transport = ScriptedTransport::new()
            .with_line("OK")
            .with_timeout()
            .with_line("");

        assert_eq!(transport.request("sample 0").unwrap(), "OK");
        assert!(transport.read_line().unwrap_err().is_timeout());
        assert_eq!(transport.read_line().unwrap(), "");
        assert!(transport.read_line().is_err());
        assert_eq!(transport.written(), &["sample 0".to_string()]);
        assert_eq!(transport.stats().timeouts, 2);
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        fn ask<T: LineTransport>(mut transport: T) -> String {
            transport.request("format 0").unwrap()
        }

        let mut transport = ScriptedTransport::new().with_line("OK");
        assert_eq!(ask(&mut transport), "OK");
        assert_eq!(transport.written().len(), 1);
        assert_eq!(transport.remaining(), 0);
    }

    #[test]
    fn test_from_reader() {
        let script = "cmd=test par=12345\r\nOK\n\n";
        let mut transport = ScriptedTransport::from_reader(script.as_bytes()).unwrap();

        assert_eq!(transport.remaining(), 3);
        assert_eq!(transport.request("test 12345").unwrap(), "cmd=test par=12345");
        assert_eq!(transport.read_line().unwrap(), "OK");
        assert_eq!(transport.read_line().unwrap(), "");
        assert!(transport.read_line().unwrap_err().is_timeout());
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScriptedTransport::from_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(err.to_string().contains("can't open replay"));
    }

    #[test]
    fn test_dump_reply_layout() {
        let series = SampleSeries::new(vec![1, 2, 3], DumpTrailer::default());
        let mut transport = ScriptedTransport::new().with_dump_reply(&series, 2);

        assert_eq!(transport.read_line().unwrap(), "0x0001 0x0002");
        assert_eq!(transport.read_line().unwrap(), "0x0003");
        assert_eq!(transport.read_line().unwrap(), "");
        assert_eq!(transport.read_line().unwrap(), "20220101 000000 000015 0");
        assert_eq!(transport.remaining(), 0);
    }
}
