//! Dump Receiver
//!
//! Drives the two-phase dump exchange with the logger:
//!
//! 1. Send `dump 0`.
//! 2. Read data lines until a blank line ends the data block, appending each
//!    one verbatim to the destination and reporting progress.
//! 3. Read exactly one trailer line and append it after a blank separator.
//!
//! Nothing is rolled back on failure. A timeout leaves the lines already
//! written in place; re-running the dump truncates and rewrites the file.

use crate::backend::codec::{encode, failure_error, Command, Failure, NO_PARAM};
use crate::backend::transport::LineTransport;
use crate::dump::parser::DATA_PREFIX;
use crate::dump::writer::DumpWriter;
use crate::error::{PicoLogError, Result};
use std::io::Write;

/// Prefix of the firmware's refusal to dump (no flash file, mount failure)
const DEVICE_ERROR_PREFIX: &str = "error:";

/// How the receiver decides the data block is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpOptions {
    /// Also accept an idle timeout after at least one line as end of block
    ///
    /// Older firmware never sends the blank terminator; it emits the
    /// trailer directly after the data and goes quiet.
    pub idle_ends_block: bool,
}

impl DumpOptions {
    /// Options for firmware that ends the block by going quiet
    pub fn legacy_firmware() -> Self {
        Self {
            idle_ends_block: true,
        }
    }
}

/// What ended the data block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The designated blank line
    BlankLine,
    /// The device went quiet (only with [`DumpOptions::idle_ends_block`])
    Idle,
}

/// Outcome of a completed dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpSummary {
    /// Data lines written to the destination
    pub data_lines: usize,
    /// The trailer line as received
    pub trailer: String,
    /// What ended the data block
    pub terminated_by: Terminator,
}

/// Receives one dump from a transport into a destination
pub struct DumpReceiver<'t, T: LineTransport + ?Sized> {
    transport: &'t mut T,
    options: DumpOptions,
}

impl<'t, T: LineTransport + ?Sized> DumpReceiver<'t, T> {
    /// Create a receiver borrowing the session's transport
    pub fn new(transport: &'t mut T, options: DumpOptions) -> Self {
        Self { transport, options }
    }

    /// Run the exchange, writing into `dest`
    ///
    /// `progress` is called with the running data line count after each line.
    pub fn receive<W, F>(&mut self, dest: W, mut progress: F) -> Result<DumpSummary>
    where
        W: Write,
        F: FnMut(usize),
    {
        let mut writer = DumpWriter::new(dest);

        self.transport.write_line(&encode(Command::Dump, NO_PARAM))?;
        tracing::debug!("Dump requested");

        let mut last_line: Option<String> = None;
        let terminated_by = loop {
            match self.transport.read_line() {
                Ok(line) if line.trim().is_empty() => break Terminator::BlankLine,
                Ok(line) if last_line.is_none() && line.starts_with(DEVICE_ERROR_PREFIX) => {
                    return Err(failure_error(Command::Dump, Failure { response: line }));
                }
                Ok(line) => {
                    writer.write_data_line(&line)?;
                    progress(writer.data_lines());
                    tracing::trace!("Dump line {}: {}", writer.data_lines(), line);
                    last_line = Some(line);
                }
                Err(e) if e.is_timeout() && self.options.idle_ends_block && last_line.is_some() => {
                    tracing::debug!("Device idle after {} lines", writer.data_lines());
                    break Terminator::Idle;
                }
                Err(e) if e.is_timeout() => {
                    let lines = writer.data_lines();
                    return Err(abort(
                        &mut writer,
                        PicoLogError::Timeout(format!(
                            "data block not terminated after {} lines",
                            lines
                        )),
                    ));
                }
                Err(e) => return Err(abort(&mut writer, e)),
            }
        };

        // Old firmware sent the trailer as the last line of the block; it is
        // already in the file and the parser picks it up from there.
        if terminated_by == Terminator::Idle {
            if let Some(line) = last_line.filter(|l| !l.starts_with(DATA_PREFIX)) {
                let data_lines = writer.data_lines().saturating_sub(1);
                writer.finish()?;
                tracing::info!(
                    "Dump complete: {} data lines, trailer {:?} inside block",
                    data_lines,
                    line
                );
                return Ok(DumpSummary {
                    data_lines,
                    trailer: line,
                    terminated_by,
                });
            }
        }

        let trailer = match self.transport.read_line() {
            Ok(line) => line,
            Err(e) if e.is_timeout() => {
                let lines = writer.data_lines();
                return Err(abort(
                    &mut writer,
                    PicoLogError::Timeout(format!("no trailer after {} data lines", lines)),
                ));
            }
            Err(e) => return Err(abort(&mut writer, e)),
        };
        writer.write_trailer(&trailer)?;
        let data_lines = writer.data_lines();
        writer.finish()?;

        tracing::info!("Dump complete: {} data lines, trailer {:?}", data_lines, trailer);
        Ok(DumpSummary {
            data_lines,
            trailer,
            terminated_by,
        })
    }
}

/// Keep what was received so far and hand back the error that ended the dump
///
/// A failing flush is only logged; the caller needs the original error.
fn abort<W: Write>(writer: &mut DumpWriter<W>, error: PicoLogError) -> PicoLogError {
    if let Err(flush_error) = writer.flush() {
        tracing::warn!("Partial dump not flushed: {}", flush_error);
    }
    error
}

/// Run a dump over `transport` into `dest`
pub fn perform_dump<T, W, F>(
    transport: &mut T,
    dest: W,
    options: DumpOptions,
    progress: F,
) -> Result<DumpSummary>
where
    T: LineTransport + ?Sized,
    W: Write,
    F: FnMut(usize),
{
    DumpReceiver::new(transport, options).receive(dest, progress)
}
