//! Aggregation compiler
//!
//! Maps named aggregate expressions onto native metric aggregations and the
//! matching response parsers.
//!
//! # Invariants
//!
//! - Output order equals declaration order
//! - A filter-wrapped node always comes with a filter-wrapped parser
//! - A metric node reads from exactly one of field path or script

mod errors;
mod helper;
mod metric;
mod named;
mod node;

pub use errors::{AggregationError, AggregationResult};
pub use helper::AggregationBuilderHelper;
pub use metric::{
    CompiledAggregation, CompiledAggregations, MetricAggregationBuilder, DOCUMENT_IDENTITY_FIELD,
};
pub use named::{AggregateFunctionKind, NamedAggregate};
pub use node::{
    AggregationNode, AggregationRequest, FilterAggregation, MetricAggregation, MetricKind,
    MetricSource, EXTENDED_STATS_SIGMA,
};
