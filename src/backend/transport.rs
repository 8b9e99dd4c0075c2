//! LineTransport trait for a unified device channel
//!
//! This module provides a common trait for the line-oriented channel to the
//! logger, enabling both the real serial port and scripted doubles for testing.
//! Exactly one request/response exchange is outstanding at a time; the protocol
//! has no pipelining.

use crate::error::Result;

/// Statistics for transport operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Lines written to the device
    pub lines_sent: u64,
    /// Lines received from the device (blank lines included)
    pub lines_received: u64,
    /// Reads that ran into the timeout
    pub timeouts: u64,
    /// Payload bytes received, newlines excluded
    pub bytes_received: u64,
}

impl TransportStats {
    /// Record a written line
    pub fn record_sent(&mut self) {
        self.lines_sent += 1;
    }

    /// Record a received line
    pub fn record_received(&mut self, line: &str) {
        self.lines_received += 1;
        self.bytes_received += line.len() as u64;
    }

    /// Record a read that timed out
    pub fn record_timeout(&mut self) {
        self.timeouts += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unified interface for the line channel to the logger
///
/// Implementations frame outgoing text with a trailing `\n` and return
/// incoming lines with the newline and surrounding whitespace removed. An
/// empty string is a real (blank) line; a read that sees no complete line
/// within the bound fails with [`PicoLogError::Timeout`](crate::PicoLogError::Timeout).
///
/// # Example
///
/// ```ignore
/// fn ping(transport: &mut dyn LineTransport) -> Result<String> {
///     transport.request("test 12345")
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait LineTransport {
    /// Write one line; the newline is appended by the transport
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Read one line, blocking up to the transport's timeout
    fn read_line(&mut self) -> Result<String>;

    /// Write a line and read the single line answering it
    fn request(&mut self, line: &str) -> Result<String> {
        self.write_line(line)?;
        self.read_line()
    }

    /// Get transport statistics
    fn stats(&self) -> TransportStats {
        TransportStats::default()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String> {
        (**self).read_line()
    }

    fn request(&mut self, line: &str) -> Result<String> {
        (**self).request(line)
    }

    fn stats(&self) -> TransportStats {
        (**self).stats()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String> {
        (**self).read_line()
    }

    fn request(&mut self, line: &str) -> Result<String> {
        (**self).request(line)
    }

    fn stats(&self) -> TransportStats {
        (**self).stats()
    }
}
