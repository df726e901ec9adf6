//! # Aggregation Errors
//!
//! Every variant is a compile-time failure: it surfaces before any request
//! reaches the index and is never retried.

use thiserror::Error;

use crate::expression::ExpressionError;
use crate::filter::FilterError;

/// Result type for aggregation compilation
pub type AggregationResult<T> = Result<T, AggregationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("unsupported aggregator {0}")]
    UnsupportedAggregateFunction(String),

    #[error("metric aggregation doesn't support expression {0}")]
    UnsupportedExpressionInMetric(String),

    #[error("aggregation {0} has no argument")]
    MissingAggregateArgument(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),
}
