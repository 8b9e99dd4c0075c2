//! Backend module for talking to the logger
//!
//! Everything here is synchronous and single-threaded: exactly one
//! request/response exchange is in flight at a time.
//!
//! # Components
//!
//! - [`LineTransport`] - Line-oriented channel to the device (trait)
//! - [`SerialTransport`] - The channel over a USB CDC serial port
//! - [`ScriptedTransport`] - Replays canned replies for tests and dry runs
//! - [`codec`] - Command encoding and generic reply decoding
//! - [`DeviceSession`] - Operator actions on one open transport
//!
//! # Example
//!
//! ```ignore
//! use picolog::backend::{DeviceSession, SerialTransport};
//! use picolog::config::AppConfig;
//!
//! let config = AppConfig::default();
//! let mut session = DeviceSession::new(SerialTransport::open(&config.serial)?);
//! session.probe()?;
//!
//! match session.start_sampling()? {
//!     Ok(_) => println!("OK"),
//!     Err(failure) => println!("{}", failure),
//! }
//! ```

pub mod codec;
pub mod scripted;
pub mod serial;
pub mod session;
pub mod transport;

pub use codec::{Ack, Command, Failure, Reply};
pub use scripted::{ScriptedReply, ScriptedTransport};
pub use serial::SerialTransport;
pub use session::DeviceSession;
pub use transport::{LineTransport, TransportStats};
