//! Session layer module for the Teleinfo protocol
//!
//! This crate assembles transport lines into frames delimited by STX/ETX and
//! folds the measurements they carry into a [`Snapshot`](teleinfo_core::Snapshot).
//!
//! Line handling:
//! - the first line after the stream is handed over is discarded
//! - lines outside a frame are ignored until one carries STX
//! - inside a frame, a line carrying ETX closes it, any other line is decoded
//!   as `LABEL VALUE [CHECKSUM]`
//! - undecodable and malformed lines are logged and skipped
//!
//! The per-group checksum character is consumed but not verified.

pub mod frame;

pub use frame::*;
pub use teleinfo_core::{TeleinfoError, TeleinfoResult};
