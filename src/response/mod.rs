//! Response parser tree
//!
//! Decoders that stay structurally isomorphic to the aggregation request the
//! compiler built. Every filter-wrapped request node has a `Filter` parser,
//! and every bucket is looked up by the aggregate's output name.

mod errors;
mod parser;
mod response;

pub use errors::{DecodeError, DecodeResult};
pub use parser::{MetricParser, StatsSelector};
pub use response::AggregationResponseParser;
