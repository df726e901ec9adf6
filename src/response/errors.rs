//! # Decode Errors

use thiserror::Error;

/// Result type for reply decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reply shape does not match the compiled parsers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Reply has no aggregations section")]
    MissingAggregations,

    #[error("Aggregations section is not an object: {0}")]
    MalformedAggregations(String),

    #[error("Bucket '{name}' is not an object: {raw}")]
    NotAnObject { name: String, raw: String },

    #[error("Bucket '{name}' has no field '{field}'")]
    MissingField { name: String, field: String },

    #[error("Field '{field}' of bucket '{name}' is not numeric: {raw}")]
    NonNumeric {
        name: String,
        field: String,
        raw: String,
    },
}
