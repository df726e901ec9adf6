//! # Filter Errors

use thiserror::Error;

use crate::expression::ExpressionError;

/// Result type for filter compilation
pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unsupported filter condition: {0}")]
    UnsupportedCondition(String),

    #[error(transparent)]
    Expression(#[from] ExpressionError),
}
