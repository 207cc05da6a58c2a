//! Sensor configuration

use serde::{Deserialize, Serialize};

/// Default sensor name
pub const DEFAULT_NAME: &str = "Serial Teleinfo Sensor";

/// Label whose value drives the primary counter
pub const DEFAULT_PRIMARY_LABEL: &str = "BASE";

/// Configuration of a Teleinfo sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Display name, also used to derive the unique id
    pub name: String,
    /// Label parsed into the primary counter
    pub primary_label: String,
    /// Drop the first line read after the stream is handed over
    ///
    /// Serial drivers tend to emit a partial line on open.
    pub discard_first_line: bool,
}

impl SensorConfig {
    /// Create a configuration with default parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_primary_label(mut self, label: impl Into<String>) -> Self {
        self.primary_label = label.into();
        self
    }

    pub fn with_discard_first_line(mut self, discard: bool) -> Self {
        self.discard_first_line = discard;
        self
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            primary_label: DEFAULT_PRIMARY_LABEL.to_string(),
            discard_first_line: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.name, "Serial Teleinfo Sensor");
        assert_eq!(config.primary_label, "BASE");
        assert!(config.discard_first_line);
    }

    #[test]
    fn test_builder() {
        let config = SensorConfig::new("Téléinfo")
            .with_primary_label("HCHC")
            .with_discard_first_line(false);
        assert_eq!(config.name, "Téléinfo");
        assert_eq!(config.primary_label, "HCHC");
        assert!(!config.discard_first_line);
    }
}
