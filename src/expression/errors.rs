//! # Expression Errors

use thiserror::Error;

/// Result type for expression serialization
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("Failed to serialize expression: {0}")]
    Serialization(String),

    #[error("Failed to deserialize expression: {0}")]
    Deserialization(String),
}
