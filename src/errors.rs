//! Error types for budgetsim
//!
//! Budget expiry is never an error: it is reported as a run outcome.
//! Everything here is either a configuration problem or misuse of the
//! sequencer state machine.

use thiserror::Error;

/// Main error type for the simulator
#[derive(Error, Debug)]
pub enum SimError {
    /// Step or sequencer configuration rejected before running
    #[error("Invalid configuration for '{subject}': {reason}")]
    InvalidConfig { subject: String, reason: String },

    /// Sequencer state machine errors
    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    /// Scenario file loading errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Logging subscriber could not be installed
    #[error("Logging error: {0}")]
    LoggingError(String),

    /// Report serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid_config(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = SimError::invalid_config("pricing", "weight must be in (0, 1], got 1.5");
        let msg = err.to_string();
        assert!(msg.contains("pricing"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = SimError::InvalidTransition {
            from: "Completed".to_string(),
            to: "Running".to_string(),
            reason: "configure the sequencer again before rerunning".to_string(),
        };
        assert!(err.to_string().contains("Completed"));
        assert!(err.to_string().contains("Running"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimError = io.into();
        assert!(matches!(err, SimError::IoError(_)));
    }
}
