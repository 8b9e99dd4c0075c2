//! Device settings entered by the operator
//!
//! The logger stores its start date, sample interval and append mode in
//! flash. These helpers turn operator input into the integer parameters the
//! `set_*` commands expect.

use crate::error::{PicoLogError, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Shortest sample interval the logger accepts, in seconds
pub const MIN_INTERVAL_SECONDS: u32 = 5;

/// Longest sample interval the logger accepts (24 h), in seconds
pub const MAX_INTERVAL_SECONDS: u32 = 86_400;

/// Format the operator types a start date in
pub const START_INPUT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// A sample interval after clamping to the supported range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSetting {
    /// Interval sent to the device
    pub seconds: u32,
    /// Set when the requested value had to be changed
    pub clamped: Option<IntervalClamp>,
}

/// Which bound an interval was clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClamp {
    /// Raised to [`MIN_INTERVAL_SECONDS`]
    Minimum,
    /// Lowered to [`MAX_INTERVAL_SECONDS`]
    Maximum,
}

impl IntervalSetting {
    /// Clamp a raw number of seconds into 5 s .. 24 h
    pub fn from_seconds(seconds: u64) -> Self {
        if seconds < MIN_INTERVAL_SECONDS as u64 {
            Self {
                seconds: MIN_INTERVAL_SECONDS,
                clamped: Some(IntervalClamp::Minimum),
            }
        } else if seconds > MAX_INTERVAL_SECONDS as u64 {
            Self {
                seconds: MAX_INTERVAL_SECONDS,
                clamped: Some(IntervalClamp::Maximum),
            }
        } else {
            Self {
                seconds: seconds as u32,
                clamped: None,
            }
        }
    }

    /// Warning text for the operator when the value was clamped
    pub fn warning(&self) -> Option<&'static str> {
        match self.clamped {
            Some(IntervalClamp::Minimum) => Some("warning: interval set to 5 s"),
            Some(IntervalClamp::Maximum) => Some("warning: interval set to 24 h"),
            None => None,
        }
    }
}

impl FromStr for IntervalSetting {
    type Err = PicoLogError;

    /// Parse `HH:MM:SS`; hours may exceed 23 and are clamped like any other value
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(PicoLogError::InvalidInput(format!(
                "interval {:?} is not HH:MM:SS",
                s
            )));
        }

        let mut fields = [0u64; 3];
        for (field, part) in fields.iter_mut().zip(&parts) {
            *field = part.trim().parse().map_err(|_| {
                PicoLogError::InvalidInput(format!("interval {:?} is not HH:MM:SS", s))
            })?;
        }

        let seconds = fields[0]
            .saturating_mul(3600)
            .saturating_add(fields[1].saturating_mul(60))
            .saturating_add(fields[2]);
        Ok(Self::from_seconds(seconds))
    }
}

/// Whether new samples extend the stored ones or replace them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendMode {
    /// Old samples are discarded when sampling starts
    #[default]
    Off,
    /// Samples are appended to the existing ones
    On,
}

impl AppendMode {
    /// Parameter of the `set_append` command
    pub fn param(self) -> u32 {
        match self {
            AppendMode::Off => 0,
            AppendMode::On => 1,
        }
    }
}

impl FromStr for AppendMode {
    type Err = PicoLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(AppendMode::On),
            "OFF" => Ok(AppendMode::Off),
            _ => Err(PicoLogError::InvalidInput(format!(
                "append mode {:?} is neither ON nor OFF",
                s
            ))),
        }
    }
}

impl fmt::Display for AppendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendMode::Off => write!(f, "OFF"),
            AppendMode::On => write!(f, "ON"),
        }
    }
}

/// Parse an operator-entered start date (`dd.mm.yyyy HH:MM:SS`)
pub fn parse_start(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), START_INPUT_FORMAT)
        .map_err(|e| PicoLogError::InvalidInput(format!("{:?} is not valid: {}", input, e)))
}

/// Current local time with sub-second precision dropped
pub fn now_start() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Encode a start date as the `(YYYYMMDD, HHMMSS)` parameters of `set_date`/`set_time`
pub fn start_params(start: &NaiveDateTime) -> (u32, u32) {
    let date = start.year() as u32 * 10_000 + start.month() * 100 + start.day();
    let time = start.hour() * 10_000 + start.minute() * 100 + start.second();
    (date, time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_interval_parse() {
        let setting: IntervalSetting = "00:01:30".parse().unwrap();
        assert_eq!(setting.seconds, 90);
        assert!(setting.clamped.is_none());
        assert!(setting.warning().is_none());
    }

    #[test]
    fn test_interval_clamping() {
        let low: IntervalSetting = "00:00:01".parse().unwrap();
        assert_eq!(low.seconds, MIN_INTERVAL_SECONDS);
        assert_eq!(low.clamped, Some(IntervalClamp::Minimum));

        let high: IntervalSetting = "25:00:00".parse().unwrap();
        assert_eq!(high.seconds, MAX_INTERVAL_SECONDS);
        assert_eq!(high.warning(), Some("warning: interval set to 24 h"));

        let edge: IntervalSetting = "24:00:00".parse().unwrap();
        assert_eq!(edge.seconds, MAX_INTERVAL_SECONDS);
        assert!(edge.clamped.is_none());
    }

    #[test]
    fn test_interval_rejects_bad_input() {
        assert!("90".parse::<IntervalSetting>().is_err());
        assert!("00:aa:00".parse::<IntervalSetting>().is_err());
        assert!("1:2:3:4".parse::<IntervalSetting>().is_err());
    }

    #[test]
    fn test_append_mode() {
        assert_eq!("on".parse::<AppendMode>().unwrap(), AppendMode::On);
        assert_eq!(" OFF ".parse::<AppendMode>().unwrap(), AppendMode::Off);
        assert!("yes".parse::<AppendMode>().is_err());
        assert_eq!(AppendMode::On.param(), 1);
        assert_eq!(AppendMode::Off.param(), 0);
    }

    #[test]
    fn test_start_params() {
        let start = parse_start("07.11.2022 13:05:09").unwrap();
        assert_eq!(
            start,
            NaiveDate::from_ymd_opt(2022, 11, 7)
                .unwrap()
                .and_hms_opt(13, 5, 9)
                .unwrap()
        );
        assert_eq!(start_params(&start), (20221107, 130509));
    }

    #[test]
    fn test_start_rejects_bad_input() {
        assert!(parse_start("2022-11-07 13:05:09").is_err());
        assert!(parse_start("31.02.2022 00:00:00").is_err());
    }

    #[test]
    fn test_now_has_whole_seconds() {
        assert_eq!(now_start().nanosecond(), 0);
    }
}
