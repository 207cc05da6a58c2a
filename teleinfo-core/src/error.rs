use thiserror::Error;

/// Main error type for Teleinfo operations
#[derive(Error, Debug)]
pub enum TeleinfoError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Malformed line: {0:?}")]
    MalformedLine(String),

    #[error("Invalid counter value for {label}: {value:?}")]
    InvalidCounter { label: String, value: String },

    #[error("Stream closed")]
    StreamClosed,

    #[error("Timeout")]
    Timeout,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl TeleinfoError {
    /// Check whether the error only concerns a single line
    ///
    /// Per-line errors are logged and skipped by the reader. Anything else
    /// terminates the reading task.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TeleinfoError::Decode(_)
                | TeleinfoError::MalformedLine(_)
                | TeleinfoError::InvalidCounter { .. }
        )
    }
}

/// Result type alias for Teleinfo operations
pub type TeleinfoResult<T> = Result<T, TeleinfoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_line_errors_are_recoverable() {
        assert!(TeleinfoError::Decode("bad byte".into()).is_recoverable());
        assert!(TeleinfoError::MalformedLine("PTEC".into()).is_recoverable());
        assert!(
            TeleinfoError::InvalidCounter {
                label: "BASE".into(),
                value: "abc".into(),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_stream_errors_are_fatal() {
        assert!(!TeleinfoError::StreamClosed.is_recoverable());
        assert!(!TeleinfoError::Timeout.is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        assert!(!TeleinfoError::from(io).is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = TeleinfoError::InvalidCounter {
            label: "BASE".into(),
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "Invalid counter value for BASE: \"abc\"");
        assert_eq!(TeleinfoError::StreamClosed.to_string(), "Stream closed");
    }
}
