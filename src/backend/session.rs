//! Device session
//!
//! A [`DeviceSession`] owns the line transport to one logger and exposes the
//! operator actions as methods. It keeps no other state, so every action is
//! independent of the ones before it.

use crate::backend::codec::{
    decode, encode, Command, Failure, Reply, NO_PARAM, PROBE_PARAM,
};
use crate::backend::transport::LineTransport;
use crate::config::{start_params, AppendMode, IntervalSetting};
use crate::dump::{perform_dump, DumpOptions, DumpSummary};
use crate::dump::parser::parse_hex_token;
use crate::error::{PicoLogError, Result, ResultExt};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// An open conversation with one logger
#[derive(Debug)]
pub struct DeviceSession<T: LineTransport> {
    transport: T,
}

impl<T: LineTransport> DeviceSession<T> {
    /// Wrap a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send the connectivity probe to flush stale bytes on both sides
    ///
    /// The echo is not checked. A silent device is only worth a warning; the
    /// next real command reports the problem.
    pub fn probe(&mut self) -> Result<()> {
        match self.transport.request(&encode(Command::Test, PROBE_PARAM)) {
            Ok(echo) => {
                tracing::debug!("Probe answered: {}", echo);
                Ok(())
            }
            Err(e) if e.is_timeout() => {
                tracing::warn!("Probe got no answer: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Send one command and decode the generic reply
    ///
    /// The outer error is a transport problem; the inner one means the device
    /// answered with something other than `OK`.
    pub fn send(&mut self, command: Command, param: u32) -> Result<Reply> {
        let line = self
            .transport
            .request(&encode(command, param))
            .with_context(|| format!("{} {}", command, param))?;
        let reply = decode(&line);
        match &reply {
            Ok(_) => tracing::debug!("{} {} -> OK", command, param),
            Err(Failure { response }) => {
                tracing::warn!("{} {} -> {:?}", command, param, response)
            }
        }
        Ok(reply)
    }

    /// Start a sampling session
    ///
    /// After acknowledging, the logger stops answering until it is reset.
    pub fn start_sampling(&mut self) -> Result<Reply> {
        self.send(Command::Sample, NO_PARAM)
    }

    /// Delete stored samples, keeping settings
    pub fn remove_samples(&mut self) -> Result<Reply> {
        self.send(Command::Remove, NO_PARAM)
    }

    /// Wipe the flash and restore default settings
    pub fn format_flash(&mut self) -> Result<Reply> {
        self.send(Command::Format, NO_PARAM)
    }

    /// Set the start date and time of the next session
    ///
    /// Both halves are always sent; the first failure is reported.
    pub fn set_start(&mut self, start: &NaiveDateTime) -> Result<Reply> {
        let (date, time) = start_params(start);
        let date_reply = self.send(Command::SetDate, date)?;
        let time_reply = self.send(Command::SetTime, time)?;
        Ok(date_reply.and(time_reply))
    }

    /// Set the sample interval, clamped to 5 s .. 24 h
    pub fn set_interval(&mut self, seconds: u64) -> Result<(IntervalSetting, Reply)> {
        let setting = IntervalSetting::from_seconds(seconds);
        if let Some(warning) = setting.warning() {
            tracing::warn!("{} (requested {} s)", warning, seconds);
        }
        let reply = self.send(Command::SetInterval, setting.seconds)?;
        Ok((setting, reply))
    }

    /// Choose whether the next session appends to stored samples
    pub fn set_append(&mut self, mode: AppendMode) -> Result<Reply> {
        self.send(Command::SetAppend, mode.param())
    }

    /// Take one ADC reading
    pub fn read_adc(&mut self) -> Result<u32> {
        let line = self
            .transport
            .request(&encode(Command::CheckAdc, NO_PARAM))
            .context("checkadc")?;
        let reading = line.trim();
        parse_hex_token(reading).map_err(|reason| PicoLogError::CommandFailed {
            command: Command::CheckAdc.to_string(),
            response: format!("{} ({})", reading, reason),
        })
    }

    /// Dump all stored samples into the file at `path`
    ///
    /// The file is created (and truncated) before the device is asked for
    /// anything, so an unwritable destination never starts a transfer. The
    /// file is flushed and closed on every exit path.
    pub fn dump_to_file<F>(
        &mut self,
        path: impl AsRef<Path>,
        options: DumpOptions,
        progress: F,
    ) -> Result<DumpSummary>
    where
        F: FnMut(usize),
    {
        let path = path.as_ref();
        let file = File::create(path).context("can't write dump file")?;
        tracing::debug!("Dumping into {}", path.display());
        perform_dump(&mut self.transport, BufWriter::new(file), options, progress)
    }
}
