//! Frame reader statistics collection

/// Frame reader statistics
///
/// Per-line errors never leave the reader; these counters are how a caller
/// observes them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderStatistics {
    /// Lines read from the transport, warm-up line included
    pub lines_read: u64,
    /// Lines dropped while searching for a frame start
    pub ignored_lines: u64,
    /// Frames closed by an ETX line
    pub frames_completed: u64,
    /// Measurements stored in the snapshot
    pub measurements_applied: u64,
    /// Lines dropped before decoding: not valid ASCII, or over the length limit
    pub decode_errors: u64,
    /// Interior lines with fewer than two tokens
    pub malformed_lines: u64,
    /// Primary label values that did not parse as an integer
    pub invalid_counters: u64,
}

impl ReaderStatistics {
    /// Create new statistics with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all statistics counters
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn increment_lines_read(&mut self) {
        self.lines_read += 1;
    }

    pub fn increment_ignored_lines(&mut self) {
        self.ignored_lines += 1;
    }

    pub fn increment_frames_completed(&mut self) {
        self.frames_completed += 1;
    }

    pub fn increment_measurements_applied(&mut self) {
        self.measurements_applied += 1;
    }

    pub fn increment_decode_errors(&mut self) {
        self.decode_errors += 1;
    }

    pub fn increment_malformed_lines(&mut self) {
        self.malformed_lines += 1;
    }

    pub fn increment_invalid_counters(&mut self) {
        self.invalid_counters += 1;
    }

    /// Get error rate as a percentage of lines read
    ///
    /// Returns 0.0 if no lines have been read.
    pub fn error_rate(&self) -> f64 {
        let total_errors = self.decode_errors + self.malformed_lines + self.invalid_counters;
        if self.lines_read == 0 {
            0.0
        } else {
            (total_errors as f64 / self.lines_read as f64) * 100.0
        }
    }
}
