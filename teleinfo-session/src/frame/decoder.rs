//! Teleinfo field decoder
//!
//! Interior lines have the form `LABEL VALUE [CHECKSUM]`. The checksum is a
//! single printable character and may itself be a space, so lines are split
//! on whitespace runs rather than trimmed and split on a single separator:
//! a blank checksum then simply disappears instead of leaking into the value.

use teleinfo_core::{DEFAULT_PRIMARY_LABEL, Measurement, Snapshot, TeleinfoError, TeleinfoResult};

/// Decodes measurement lines and folds them into a snapshot
#[derive(Debug, Clone)]
pub struct FieldDecoder {
    snapshot: Snapshot,
    primary_label: String,
}

impl FieldDecoder {
    /// Create a decoder tracking `BASE` as the primary counter
    pub fn new() -> Self {
        Self::with_primary_label(DEFAULT_PRIMARY_LABEL)
    }

    pub fn with_primary_label(label: impl Into<String>) -> Self {
        Self {
            snapshot: Snapshot::new(),
            primary_label: label.into(),
        }
    }

    /// Resume from a previously published snapshot
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Split a measurement line into label and value
    ///
    /// Tokens past the second one (the checksum) are discarded.
    ///
    /// # Arguments
    /// * `line` - An interior frame line, CR and LF already removed
    ///
    /// # Returns
    /// The first two whitespace-separated tokens as a [`Measurement`]
    ///
    /// # Errors
    /// `MalformedLine` if the line holds fewer than two tokens.
    pub fn decode_line(line: &str) -> TeleinfoResult<Measurement> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(label), Some(value)) => Ok(Measurement::new(label, value)),
            _ => Err(TeleinfoError::MalformedLine(line.to_string())),
        }
    }

    /// Store a measurement in the snapshot
    ///
    /// The raw value is always stored. For the primary label the value is
    /// also parsed into the primary counter.
    ///
    /// # Arguments
    /// * `measurement` - A label/value pair from [`FieldDecoder::decode_line`]
    ///
    /// # Errors
    /// `InvalidCounter` if the primary label's value is not a non-negative
    /// integer. The string is stored anyway and the previous counter is kept.
    ///
    /// # Why unsigned?
    /// Index counters only ever grow from zero. A signed or fractional value
    /// on the primary label means the line was corrupted in transit.
    pub fn apply(&mut self, measurement: Measurement) -> TeleinfoResult<()> {
        let Measurement { label, value } = measurement;

        let counter = if label == self.primary_label {
            Some(value.parse::<u64>().map_err(|_| TeleinfoError::InvalidCounter {
                label: label.clone(),
                value: value.clone(),
            }))
        } else {
            None
        };

        self.snapshot.insert(label, value);

        match counter {
            Some(Ok(counter)) => {
                self.snapshot.set_primary_counter(counter);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn primary_label(&self) -> &str {
        &self.primary_label
    }
}

impl Default for FieldDecoder {
    fn default() -> Self {
        Self::new()
    }
}
