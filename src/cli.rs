//! Argument parsing for running from the command line

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "picolog", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,
    /// Serial port of the logger
    #[clap(short, long, value_parser)]
    pub port: Option<String>,
    /// Baud rate
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub baud: Option<u32>,
    /// Per-line read timeout in milliseconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,
    /// Dump file to write and visualize
    #[clap(short, long, value_parser)]
    pub dump_file: Option<PathBuf>,
    /// Play device replies from this file instead of opening the serial port
    #[clap(long, value_parser)]
    pub replay: Option<PathBuf>,
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start sampling; the logger stays busy until it is reset
    Sample,
    /// Copy all stored samples into the dump file
    Dump {
        /// Accept a quiet device as end of data (firmware without blank terminator)
        #[clap(long)]
        idle_ends_block: bool,
    },
    /// Plot the dump file
    Visualize {
        /// Raw samples per plotted point
        #[clap(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        average: Option<u64>,
        /// Print statistics only, open no window
        #[clap(long)]
        no_window: bool,
        /// Also write the averaged series as CSV
        #[clap(long, value_parser)]
        csv: Option<PathBuf>,
        /// Fail if the trailer word count disagrees with the data
        #[clap(long)]
        strict: bool,
    },
    /// Delete stored samples, keep settings
    Remove {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
    /// Wipe the flash and restore default settings
    Format {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
    /// Show some ADC readings
    Adc {
        /// Number of readings
        #[clap(short, long, default_value_t = 8)]
        count: usize,
        /// Pause between readings in milliseconds
        #[clap(long, default_value_t = 1000)]
        delay_ms: u64,
    },
    /// Set start date and time of sampling (dd.mm.yyyy HH:MM:SS, default now)
    SetDate {
        #[clap(value_parser)]
        datetime: Option<String>,
    },
    /// Set the sample interval (HH:MM:SS, 5 s .. 24 h)
    SetInterval {
        #[clap(value_parser)]
        interval: String,
    },
    /// Append new samples to stored ones (ON) or discard them (OFF)
    SetAppend {
        #[clap(value_parser)]
        mode: String,
    },
}

impl Args {
    /// Apply command line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.serial.timeout_ms = timeout_ms;
        }
        if let Some(path) = &self.dump_file {
            config.dump.path = path.clone();
        }
        match &self.command {
            Commands::Dump { idle_ends_block } if *idle_ends_block => {
                config.dump.idle_ends_block = true;
            }
            Commands::Visualize {
                average, strict, ..
            } => {
                if let Some(average) = average {
                    config.plot.averaging_factor = *average as usize;
                }
                if *strict {
                    config.dump.strict_word_count = true;
                }
            }
            _ => {}
        }
    }
}

/// Match verbosity filter with tracing subscriber log levels
pub fn convert_filter(filter: log::LevelFilter) -> tracing_subscriber::filter::LevelFilter {
    match filter {
        log::LevelFilter::Off => tracing_subscriber::filter::LevelFilter::OFF,
        log::LevelFilter::Error => tracing_subscriber::filter::LevelFilter::ERROR,
        log::LevelFilter::Warn => tracing_subscriber::filter::LevelFilter::WARN,
        log::LevelFilter::Info => tracing_subscriber::filter::LevelFilter::INFO,
        log::LevelFilter::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
        log::LevelFilter::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
    }
}

/// Ask a Y/N question; anything but `y`/`Y` is a no
pub fn confirm<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    writeln!(output, "{}", question)?;
    write!(output, "Y or N: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Separator printed after the `index`-th (0-based) ADC reading, four per line
pub fn adc_separator(index: usize) -> &'static str {
    if (index + 1) % 4 == 0 {
        "\n"
    } else {
        " "
    }
}
