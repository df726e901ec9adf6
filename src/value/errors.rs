//! # Value Errors

use thiserror::Error;

use super::types::ExprType;

/// Result type for value construction
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised while materializing typed values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("Cannot convert {raw} to {ty} for field '{field}'")]
    InvalidValue {
        field: String,
        ty: ExprType,
        raw: String,
    },

    #[error("Unknown field type: {0}")]
    UnknownType(String),

    #[error("Document source is not an object: {0}")]
    NotAnObject(String),
}

impl ValueError {
    pub fn invalid(field: impl Into<String>, ty: ExprType, raw: &serde_json::Value) -> Self {
        ValueError::InvalidValue {
            field: field.into(),
            ty,
            raw: raw.to_string(),
        }
    }
}
