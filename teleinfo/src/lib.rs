//! Teleinfo - Rust implementation of the French Teleinfo metering protocol
//!
//! Smart meters emit Teleinfo frames on a user accessible serial port: lines
//! of `LABEL VALUE CHECKSUM` enclosed between STX and ETX, giving the tariff
//! period, instantaneous current, apparent power and the energy indices.
//! This library decodes that stream into a last-known-good [`Snapshot`].
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `teleinfo-core`: Errors, snapshot, label catalogue, configuration
//! - `teleinfo-transport`: Line-oriented access to an open byte stream
//! - `teleinfo-session`: Frame reader state machine and field decoder
//! - `teleinfo-client`: Sensor task, update notification and shutdown
//!
//! Opening and configuring the serial port (1200 baud, 7 data bits, even
//! parity, 1 stop bit, RTS/CTS) is left to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use teleinfo::{LineTransport, SensorConfig, Snapshot, TeleinfoSensor};
//!
//! # async fn run(port: tokio::io::DuplexStream) -> teleinfo::TeleinfoResult<()> {
//! let mut sensor = TeleinfoSensor::new(SensorConfig::default());
//! sensor
//!     .start(LineTransport::new(port), |snapshot: &Snapshot| {
//!         println!("PAPP = {:?}", snapshot.get("PAPP"));
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use teleinfo_core::{
    KnownLabel, Measurement, SensorConfig, Snapshot, TeleinfoError, TeleinfoResult, Unit,
};

// Re-export transport API
pub use teleinfo_transport::{LineSettings, LineSource, LineTransport};

// Re-export client API
pub use teleinfo_client::{SensorDescriptor, SensorState, TeleinfoSensor, UpdateListener};

// Re-export session layer
pub mod session {
    pub use teleinfo_session::*;
}
