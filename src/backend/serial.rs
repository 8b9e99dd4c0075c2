//! Serial port implementation of the line transport
//!
//! The logger enumerates as a USB CDC serial device running at 115200 8N1.
//! Reads accumulate bytes until `\n`; the configured timeout bounds the wait
//! for one complete line, not for each byte.

use crate::backend::transport::{LineTransport, TransportStats};
use crate::config::SerialConfig;
use crate::error::{PicoLogError, Result};
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Longest line accepted before the read is abandoned
const MAX_LINE_LEN: usize = 64 * 1024;

/// Upper bound of a single blocking read on the port
const READ_POLL: Duration = Duration::from_millis(50);

/// Line transport over a serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    port_name: String,
    timeout: Duration,
    /// Bytes read past the last newline, kept for the next read
    pending: Vec<u8>,
    stats: TransportStats,
}

impl SerialTransport {
    /// Open the configured port
    ///
    /// A failure here is a transport failure: the process cannot talk to the
    /// logger at all.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let timeout = config.timeout();
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout.min(READ_POLL))
            .open()
            .map_err(|e| PicoLogError::Transport(format!("no port {}: {}", config.port, e)))?;

        tracing::info!(
            "Opened {} at {} baud (timeout {} ms)",
            config.port,
            config.baud_rate,
            config.timeout_ms
        );

        Ok(Self {
            port,
            port_name: config.port.clone(),
            timeout,
            pending: Vec::new(),
            stats: TransportStats::default(),
        })
    }

    /// Name of the open port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn take_pending_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let rest = self.pending.split_off(pos + 1);
        let raw = std::mem::replace(&mut self.pending, rest);
        Some(String::from_utf8_lossy(&raw).trim().to_string())
    }
}

impl LineTransport for SerialTransport {
    fn write_line(&mut self, line: &str) -> Result<()> {
        tracing::debug!("-> {}", line);
        let framed = format!("{}\n", line);
        self.port
            .write_all(framed.as_bytes())
            .map_err(|e| PicoLogError::Transport(format!("write to {}: {}", self.port_name, e)))?;
        self.port
            .flush()
            .map_err(|e| PicoLogError::Transport(format!("flush {}: {}", self.port_name, e)))?;
        self.stats.record_sent();
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 256];

        loop {
            if let Some(line) = self.take_pending_line() {
                tracing::trace!("<- {}", line);
                self.stats.record_received(&line);
                return Ok(line);
            }

            if Instant::now() >= deadline {
                self.stats.record_timeout();
                return Err(PicoLogError::Timeout(format!(
                    "no line from {} within {} ms",
                    self.port_name,
                    self.timeout.as_millis()
                )));
            }

            if self.pending.len() > MAX_LINE_LEN {
                self.pending.clear();
                return Err(PicoLogError::Transport(format!(
                    "line from {} exceeds {} bytes",
                    self.port_name, MAX_LINE_LEN
                )));
            }

            match self.port.read(&mut buf) {
                Ok(0) => continue,
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(ref e) if e.kind() == ErrorKind::TimedOut => continue,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(PicoLogError::Transport(format!(
                        "read from {}: {}",
                        self.port_name, e
                    )))
                }
            }
        }
    }

    fn stats(&self) -> TransportStats {
        self.stats.clone()
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port_name", &self.port_name)
            .field("timeout", &self.timeout)
            .field("pending", &self.pending.len())
            .finish()
    }
}
