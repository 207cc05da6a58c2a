//! Transport layer module for the Teleinfo protocol
//!
//! This crate turns a collaborator-provided byte stream (typically an already
//! configured serial port at 1200 baud, 7E1) into delimiter-terminated lines.
//! Opening and configuring the device is left to the caller.

pub mod stream;

pub use stream::{
    LineSettings, LineSource, LineTransport, DEFAULT_DELIMITER, DEFAULT_MAX_LINE_LENGTH,
};
pub use teleinfo_core::{TeleinfoError, TeleinfoResult};
