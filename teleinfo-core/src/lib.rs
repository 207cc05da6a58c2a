//! Core types and utilities for the Teleinfo protocol
//!
//! This crate provides the error type, the measurement snapshot, the label
//! catalogue and the sensor configuration shared by the rest of the workspace.

pub mod config;
pub mod error;
pub mod label;
pub mod snapshot;

pub use config::{SensorConfig, DEFAULT_NAME, DEFAULT_PRIMARY_LABEL};
pub use error::{TeleinfoError, TeleinfoResult};
pub use label::{KnownLabel, Unit};
pub use snapshot::{Measurement, Snapshot};
