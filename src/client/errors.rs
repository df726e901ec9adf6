//! # Client Errors

use thiserror::Error;

/// Result type for index client calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures reported by the index client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
