//! Sensor entity descriptor
//!
//! Static properties a host framework displays for the sensor. The primary
//! counter is the `BASE` energy index, hence the energy/Wh metadata.

use serde::Serialize;
use std::collections::BTreeMap;
use teleinfo_core::{SensorConfig, Snapshot};

/// Attribution text attached to the sensor attributes
pub const ATTRIBUTION: &str = "Provided by EDF Teleinfo.";

/// Attribute key carrying [`ATTRIBUTION`]
pub const ATTRIBUTION_KEY: &str = "attribution";

/// Plain description of the sensor entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorDescriptor {
    pub name: String,
    pub unique_id: String,
    pub unit_of_measurement: &'static str,
    pub icon: &'static str,
    pub device_class: &'static str,
    pub state_class: &'static str,
    pub attribution: &'static str,
    /// Updates are pushed on every frame
    pub should_poll: bool,
}

impl SensorDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_id: format!("teleinfo-{}", name.to_lowercase()),
            name,
            unit_of_measurement: "Wh",
            icon: "mdi:counter",
            device_class: "energy",
            state_class: "total_increasing",
            attribution: ATTRIBUTION,
            should_poll: false,
        }
    }

    pub fn from_config(config: &SensorConfig) -> Self {
        Self::new(config.name.clone())
    }

    /// Extra state attributes: every snapshot field plus the attribution
    pub fn attributes(&self, snapshot: &Snapshot) -> BTreeMap<String, String> {
        let mut attributes = snapshot.fields().clone();
        attributes.insert(ATTRIBUTION_KEY.to_string(), self.attribution.to_string());
        attributes
    }
}
