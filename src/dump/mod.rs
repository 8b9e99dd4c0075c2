//! Dump handling
//!
//! A dump is the transfer of every stored sample from the logger to the host,
//! persisted as a plain text file:
//!
//! - [`receiver`] - Runs the `dump 0` exchange and writes the file
//! - [`parser`] - Reads a dump file back into a [`SampleSeries`](crate::types::SampleSeries)
//! - [`writer`] - The file layout shared by both sides

pub mod parser;
pub mod receiver;
pub mod writer;

pub use parser::{
    parse_dump_file, parse_hex_token, parse_trailer, DumpParser, LineClass, LineClassifier,
    ParseOptions,
};
pub use receiver::{perform_dump, DumpOptions, DumpReceiver, DumpSummary, Terminator};
pub use writer::{format_data_line, DumpWriter, FIRMWARE_WORDS_PER_LINE};
