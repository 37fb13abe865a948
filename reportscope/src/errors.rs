//! Error types for reportscope.
//!
//! Only construction and configuration can fail. Scope mutation, lifecycle
//! hooks and event capture never return errors to the host application.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for reportscope operations.
#[derive(Debug, Error)]
pub enum ReportScopeError {
    /// The collector DSN could not be parsed.
    #[error("{0}")]
    InvalidDsn(#[from] InvalidDsnError),

    /// A configuration option has an unusable value.
    #[error("Invalid option '{name}': {reason}")]
    InvalidOption {
        /// The option name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The logging subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportScopeError {
    /// Creates an invalid option error.
    #[must_use]
    pub fn invalid_option(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        let kind = match self {
            Self::InvalidDsn(err) => {
                map.insert("reason".to_string(), serde_json::json!(err.reason));
                "InvalidDsn"
            }
            Self::InvalidOption { name, reason } => {
                map.insert("name".to_string(), serde_json::json!(name));
                map.insert("reason".to_string(), serde_json::json!(reason));
                "InvalidOption"
            }
            Self::Logging(_) => "Logging",
            Self::Serialization(_) => "Serialization",
            Self::Io(_) => "Io",
        };

        map.insert("type".to_string(), serde_json::json!(kind));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a DSN string is malformed.
///
/// The offending DSN is never echoed back since it carries the public key.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("Invalid DSN: {reason}")]
pub struct InvalidDsnError {
    /// What is wrong with the DSN.
    pub reason: String,
}

impl InvalidDsnError {
    /// Creates a new invalid DSN error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T, E = ReportScopeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dsn_message_hides_input() {
        let err = ReportScopeError::from(InvalidDsnError::new("missing public key"));
        assert_eq!(err.to_string(), "Invalid DSN: missing public key");
    }

    #[test]
    fn test_invalid_option_to_dict() {
        let err = ReportScopeError::invalid_option("sample_rate", "must be within 0.0..=1.0");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "InvalidOption");
        assert_eq!(dict.get("name").unwrap(), "sample_rate");
        assert!(dict
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap()
            .contains("sample_rate"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReportScopeError = io.into();
        assert!(matches!(err, ReportScopeError::Io(_)));
        assert_eq!(err.to_dict().get("type").unwrap(), "Io");
    }
}
