//! Command/Response codec
//!
//! Requests are a single line `"<command> <param>"`; the generic reply is one
//! line that is either exactly `OK` or free text describing a failure.

use std::fmt;
use std::str::FromStr;

use crate::error::PicoLogError;

/// Parameter sent with commands that take none
pub const NO_PARAM: u32 = 0;

/// Parameter of the connectivity probe
pub const PROBE_PARAM: u32 = 12345;

/// Success token of the generic reply
pub const ACK_TOKEN: &str = "OK";

/// The closed set of commands the logger understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Start a sampling session
    Sample,
    /// Stream all stored samples
    Dump,
    /// Delete stored samples, keep settings
    Remove,
    /// Wipe flash, reset settings to defaults
    Format,
    /// Set the start date (`YYYYMMDD`)
    SetDate,
    /// Set the start time (`HHMMSS`)
    SetTime,
    /// Set the sample interval in seconds
    SetInterval,
    /// Set append mode (0 or 1)
    SetAppend,
    /// Read the ADC once
    CheckAdc,
    /// Connectivity probe, echoed by the device
    Test,
}

impl Command {
    /// All commands, in menu order
    pub const ALL: [Command; 10] = [
        Command::Sample,
        Command::Dump,
        Command::Remove,
        Command::Format,
        Command::SetDate,
        Command::SetTime,
        Command::SetInterval,
        Command::SetAppend,
        Command::CheckAdc,
        Command::Test,
    ];

    /// Wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Sample => "sample",
            Command::Dump => "dump",
            Command::Remove => "remove",
            Command::Format => "format",
            Command::SetDate => "set_date",
            Command::SetTime => "set_time",
            Command::SetInterval => "set_interval",
            Command::SetAppend => "set_append",
            Command::CheckAdc => "checkadc",
            Command::Test => "test",
        }
    }

    /// Whether the device answers with the generic `OK`/failure reply
    pub fn expects_ack(&self) -> bool {
        !matches!(self, Command::Dump | Command::CheckAdc | Command::Test)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = PicoLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PicoLogError::InvalidInput(format!("unknown command {:?}", s)))
    }
}

/// Positive reply to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

/// Any reply other than `OK`, kept verbatim for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub response: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response)
    }
}

/// Decoded generic reply
pub type Reply = Result<Ack, Failure>;

/// Encode a command and its parameter as one request line (without newline)
pub fn encode(command: Command, param: u32) -> String {
    format!("{} {}", command.as_str(), param)
}

/// Decode a generic reply line
pub fn decode(line: &str) -> Reply {
    let trimmed = line.trim();
    if trimmed == ACK_TOKEN {
        Ok(Ack)
    } else {
        Err(Failure {
            response: trimmed.to_string(),
        })
    }
}

/// Turn a failed reply into an error that names the command
pub fn failure_error(command: Command, failure: Failure) -> PicoLogError {
    PicoLogError::CommandFailed {
        command: command.to_string(),
        response: failure.response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(Command::Dump, NO_PARAM), "dump 0");
        assert_eq!(encode(Command::SetInterval, 15), "set_interval 15");
        assert_eq!(encode(Command::Test, PROBE_PARAM), "test 12345");
        assert_eq!(encode(Command::SetDate, 20220101), "set_date 20220101");
    }

    #[test]
    fn test_decode_ack() {
        assert_eq!(decode("OK"), Ok(Ack));
        assert_eq!(decode("  OK\r\n"), Ok(Ack));
    }

    #[test]
    fn test_decode_failure() {
        assert_eq!(
            decode("error: no data file"),
            Err(Failure {
                response: "error: no data file".to_string()
            })
        );
        assert!(decode("ok").is_err());
        assert!(decode("OK OK").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn test_command_names_roundtrip() {
        for command in Command::ALL {
            assert_eq!(command.as_str().parse::<Command>().unwrap(), command);
        }
        assert!("reboot".parse::<Command>().is_err());
    }

    #[test]
    fn test_failure_error_names_command() {
        let err = failure_error(
            Command::Remove,
            Failure {
                response: "error: mount failed".to_string(),
            },
        );
        assert!(err.is_command_failure());
        assert!(err.to_string().starts_with("remove failed"));
    }

    #[test]
    fn test_expects_ack() {
        assert!(Command::Sample.expects_ack());
        assert!(!Command::Dump.expects_ack());
        assert!(!Command::CheckAdc.expects_ack());
    }
}
