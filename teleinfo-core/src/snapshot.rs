//! Last-known-good measurement snapshot
//!
//! A [`Snapshot`] maps every label seen during the session to its latest raw
//! value. Values are kept verbatim (leading zeros included); a label that is
//! not re-sent in a later frame keeps its previous value, so the key set only
//! ever grows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One decoded `LABEL VALUE` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub label: String,
    pub value: String,
}

impl Measurement {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Latest value of every label plus the primary counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    fields: BTreeMap<String, String>,
    primary_counter: Option<u64>,
}

impl Snapshot {
    /// Create an empty snapshot with no primary counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value stored for a label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    /// Insert or overwrite a label, returning the previous value
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(label.into(), value.into())
    }

    /// All fields, ordered by label
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Last successfully parsed primary counter, if any
    pub fn primary_counter(&self) -> Option<u64> {
        self.primary_counter
    }

    pub fn set_primary_counter(&mut self, value: u64) {
        self.primary_counter = Some(value);
    }

    /// Parse a stored value as an unsigned integer
    ///
    /// The stored string is left untouched; `None` is returned when the label
    /// is unknown or its value is not numeric.
    pub fn numeric(&self, label: &str) -> Option<u64> {
        self.get(label).and_then(|v| v.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites() {
        let mut snapshot = Snapshot::new();
        assert_eq!(snapshot.insert("PAPP", "00420"), None);
        assert_eq!(snapshot.insert("PAPP", "00510"), Some("00420".to_string()));
        assert_eq!(snapshot.get("PAPP"), Some("00510"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_values_kept_verbatim() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("IINST", "003");
        assert_eq!(snapshot.get("IINST"), Some("003"));
        assert_eq!(snapshot.numeric("IINST"), Some(3));
    }

    #[test]
    fn test_numeric_rejects_text() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("PTEC", "HC..");
        assert_eq!(snapshot.numeric("PTEC"), None);
        assert_eq!(snapshot.numeric("MISSING"), None);
    }

    #[test]
    fn test_primary_counter_unset_by_default() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.primary_counter(), None);
        snapshot.set_primary_counter(12345);
        assert_eq!(snapshot.primary_counter(), Some(12345));
    }
}
