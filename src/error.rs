//! Error handling for picolog
//!
//! This module defines the error taxonomy shared by the transport, the dump
//! receiver, the dump file parser and the averaging engine, together with a
//! Result alias for use throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for picolog operations
#[derive(Error, Debug)]
pub enum PicoLogError {
    /// The line transport could not be opened or used
    #[error("Transport error: {0}")]
    Transport(String),

    /// Errors raised by the serial port driver
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The device answered, but not with `OK`
    #[error("{command} failed: {response}")]
    CommandFailed { command: String, response: String },

    /// No line arrived within the read bound
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A dump file was requested that does not exist
    #[error("Dump file {} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// The metadata line of a dump file could not be decoded
    #[error("Malformed trailer {line:?}: {reason}")]
    MalformedTrailer { line: String, reason: String },

    /// A data line of a dump file holds a token that is not a hex word
    #[error("Malformed data on line {line_number} {line:?}: {reason}")]
    MalformedData {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// Strict parsing only: the trailer disagrees with the number of words read
    #[error("Word count mismatch: trailer declares {declared}, file holds {actual}")]
    WordCountMismatch { declared: usize, actual: usize },

    /// Operator or caller supplied an unusable value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// The plot window could not be shown
    #[error("Plot error: {0}")]
    Plot(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PicoLogError>,
    },
}

impl PicoLogError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PicoLogError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context layers
    pub fn root(&self) -> &PicoLogError {
        match self {
            PicoLogError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error is (or wraps) a read timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), PicoLogError::Timeout(_))
    }

    /// Whether this error is (or wraps) a non-`OK` device reply
    pub fn is_command_failure(&self) -> bool {
        matches!(self.root(), PicoLogError::CommandFailed { .. })
    }
}

/// Result type alias for picolog operations
pub type Result<T> = std::result::Result<T, PicoLogError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PicoLogError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| PicoLogError::Io(e).with_context(f()))
    }
}
