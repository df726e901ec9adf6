//! Metric argument resolution
//!
//! A bare field reference is pushed down as a field path. A function
//! expression goes to the index as a serialized script. Nothing else can sit
//! in metric position.

use std::sync::Arc;

use crate::expression::{ExpressionSerializer, ScalarExpr};
use crate::filter::exact_field_path;

use super::errors::{AggregationError, AggregationResult};
use super::node::MetricSource;

#[derive(Clone)]
pub struct AggregationBuilderHelper {
    serializer: Arc<dyn ExpressionSerializer>,
}

impl AggregationBuilderHelper {
    pub fn new(serializer: Arc<dyn ExpressionSerializer>) -> Self {
        Self { serializer }
    }

    /// Resolves an argument to exactly one of field path or script.
    pub fn build(&self, expr: &ScalarExpr) -> AggregationResult<MetricSource> {
        match expr {
            ScalarExpr::Reference { attr, ty } => {
                Ok(MetricSource::Field(exact_field_path(attr, *ty)))
            }
            ScalarExpr::Function { .. } => Ok(MetricSource::Script(self.serializer.script(expr)?)),
            other => Err(AggregationError::UnsupportedExpressionInMetric(other.to_string())),
        }
    }
}
