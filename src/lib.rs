//! # picolog: host tool for the picoLog light logger
//!
//! The picoLog is a Raspberry Pi Pico that samples a light sensor into its
//! flash. This crate talks to it over USB serial, pulls the samples into a
//! dump file and turns that file into a plotted brightness curve.
//!
//! ## Architecture
//!
//! - **Backend**: Line transport, command codec and a [`DeviceSession`] per port
//! - **Dump**: The two-phase dump exchange and the dump file parser
//! - **Analysis**: Block averaging onto a fixed time grid, statistics, CSV export
//! - **Frontend**: An eframe/egui_plot window for one averaged series
//!
//! ## Configuration
//!
//! Settings are read from `picolog.toml` in the platform config directory
//! (`dirs-next`), for example `~/.config/picolog/picolog.toml` on Linux.
//!
//! ## Example
//!
//! ```ignore
//! use picolog::{
//!     analysis::reduce,
//!     backend::{DeviceSession, SerialTransport},
//!     config::AppConfig,
//!     dump::{parse_dump_file, DumpOptions},
//! };
//!
//! fn main() -> picolog::Result<()> {
//!     let config = AppConfig::load_or_default(None);
//!
//!     let mut session = DeviceSession::new(SerialTransport::open(&config.serial)?);
//!     session.probe()?;
//!     session.dump_to_file(&config.dump.path, DumpOptions::default(), |n| print!("\r{}", n))?;
//!
//!     let series = parse_dump_file(&config.dump.path)?;
//!     let averaged = reduce(&series, config.plot.averaging_factor)?;
//!     picolog::frontend::show_plot(&averaged, &config.plot, "picoLog")
//! }
//! ```

pub mod analysis;
pub mod backend;
pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod frontend;
pub mod types;

// Re-export commonly used types
pub use backend::{DeviceSession, LineTransport, ScriptedTransport, SerialTransport};
pub use config::AppConfig;
pub use error::{PicoLogError, Result, ResultExt};
pub use types::{AveragedPoint, AveragedSeries, DumpTrailer, SampleSeries};
