//! Aggregation response parser
//!
//! Applies every metric parser to the reply's `aggregations` section and
//! assembles a single row whose columns follow parser order.

use serde_json::Value;

use crate::value::ResultRow;

use super::errors::{DecodeError, DecodeResult};
use super::parser::MetricParser;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResponseParser {
    parsers: Vec<MetricParser>,
}

impl AggregationResponseParser {
    pub fn new(parsers: Vec<MetricParser>) -> Self {
        Self { parsers }
    }

    pub fn parsers(&self) -> &[MetricParser] {
        &self.parsers
    }

    /// Decodes the `aggregations` section of a reply into one row.
    ///
    /// `None` means the reply carried no aggregations at all, which is a
    /// shape failure rather than an empty result.
    pub fn parse(&self, aggregations: Option<&Value>) -> DecodeResult<ResultRow> {
        let buckets = match aggregations {
            None => return Err(DecodeError::MissingAggregations),
            Some(Value::Object(buckets)) => buckets,
            Some(other) => return Err(DecodeError::MalformedAggregations(other.to_string())),
        };

        let mut row = ResultRow::new();
        for parser in &self.parsers {
            row.push(parser.name(), parser.parse(buckets)?);
        }
        Ok(row)
    }
}
