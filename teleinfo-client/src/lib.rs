//! Teleinfo sensor
//!
//! This crate runs the frame reader in a long-lived task and exposes what a
//! host automation framework needs from it: the last published snapshot, the
//! primary counter, a per-frame update callback, a cooperative shutdown and a
//! plain descriptor of the sensor entity.

pub mod descriptor;
pub mod listener;
pub mod sensor;

pub use descriptor::{SensorDescriptor, ATTRIBUTION, ATTRIBUTION_KEY};
pub use listener::UpdateListener;
pub use sensor::{SensorState, TeleinfoSensor};
