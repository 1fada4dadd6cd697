use testops_core::TestOpsError;
use thiserror::Error;

/// Failures talking to the AI gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never got a response (DNS, refused, timeout).
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// A response arrived but its body could not be read.
    #[error("Failed to read gateway response: {0}")]
    Body(String),

    /// Non-2xx response.
    #[error("Gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A local attachment could not be read.
    #[error("Failed to read attachment {path}: {message}")]
    Attachment { path: String, message: String },
}

impl GatewayError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<GatewayError> for TestOpsError {
    fn from(err: GatewayError) -> Self {
        TestOpsError::Gateway {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}
