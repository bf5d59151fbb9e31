//! Error types for the TapDesk client core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole client core.
///
/// Errors are `Clone` because a single in-flight node computation can be
/// awaited by several readers, and every one of them receives the failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskError {
    /// A backend read (roles, groups, cloud function, user record) failed.
    #[error("Upstream query '{query}' failed: {message}")]
    UpstreamQueryFailed { query: String, message: String },

    /// Credentials or session token were rejected by the backend.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeskError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UpstreamQueryFailed error
    pub fn upstream(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamQueryFailed {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a failed backend query
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamQueryFailed { .. })
    }

    /// Check if this is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DeskError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Transport failures surface as failed upstream queries; the URL is the
/// only query context reqwest keeps.
impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        let query = err
            .url()
            .map(|url| url.path().to_string())
            .unwrap_or_else(|| "http".to_string());
        Self::UpstreamQueryFailed {
            query,
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DeskError>`.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = DeskError::upstream("roles", "connection reset");
        assert!(err.is_upstream());
        assert_eq!(
            err.to_string(),
            "Upstream query 'roles' failed: connection reset"
        );
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DeskError = io.into();
        match err {
            DeskError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_errors_are_cloneable_and_comparable() {
        let err = DeskError::config("app_id is empty");
        assert_eq!(err.clone(), err);
        assert!(err.is_config());
    }
}
