//! Error types for the TestOps session manager.

use thiserror::Error;

use crate::session::SessionPurpose;
use crate::workflow::WorkflowStage;

/// A shared error type for the TestOps crates.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestOpsError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A session-scoped operation was called while no session is active
    #[error("No active session")]
    NoActiveSession,

    /// The requested stage change is not part of the pipeline for this purpose
    #[error("Invalid workflow transition for {purpose} session: {from} -> {to}")]
    InvalidTransition {
        purpose: SessionPurpose,
        from: WorkflowStage,
        to: WorkflowStage,
    },

    /// A stage needs an output that an earlier stage has not produced yet
    #[error("Missing workflow data: {0}")]
    MissingWorkflowData(&'static str),

    /// A gateway response arrived after the active session changed
    #[error("Discarded stale response for session '{session_id}'")]
    StaleResponse { session_id: String },

    /// Storage error (key/value adapter, file system)
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote AI gateway error
    #[error("Gateway error: {message}")]
    Gateway {
        status: Option<u16>,
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TestOpsError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
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

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Check if this is a gateway error
    pub fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TestOpsError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TestOpsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TestOpsError>`.
pub type Result<T> = std::result::Result<T, TestOpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: TestOpsError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(err.is_storage());
        assert!(err.to_string().contains("PermissionDenied"));
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let parse = serde_json::from_str::<Vec<u32>>("{not json").unwrap_err();
        let err: TestOpsError = parse.into();
        assert!(matches!(err, TestOpsError::Serialization { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = TestOpsError::InvalidTransition {
            purpose: SessionPurpose::Ui,
            from: WorkflowStage::Review,
            to: WorkflowStage::Redact,
        };
        assert_eq!(
            err.to_string(),
            "Invalid workflow transition for ui session: review -> redact"
        );
    }
}
