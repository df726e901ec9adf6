//! Metric parsers
//!
//! Each parser mirrors one compiled aggregation node and pulls its scalar
//! result back out of the `aggregations` section of a reply.

use std::fmt;

use serde_json::{Map, Value};

use crate::value::ExprValue;

use super::errors::{DecodeError, DecodeResult};

/// Field of an extended statistics bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSelector {
    VariancePopulation,
    VarianceSampling,
    StdDeviationPopulation,
    StdDeviationSampling,
}

impl StatsSelector {
    /// Name of the statistic field in the reply bucket
    pub fn field_name(&self) -> &'static str {
        match self {
            StatsSelector::VariancePopulation => "variance_population",
            StatsSelector::VarianceSampling => "variance_sampling",
            StatsSelector::StdDeviationPopulation => "std_deviation_population",
            StatsSelector::StdDeviationSampling => "std_deviation_sampling",
        }
    }
}

/// Decoder for one aggregation result
#[derive(Debug, Clone, PartialEq)]
pub enum MetricParser {
    /// Reads the `value` of a single-value metric bucket
    SingleValue { name: String },
    /// Reads one statistic from an extended statistics bucket
    Stats {
        name: String,
        selector: StatsSelector,
    },
    /// Unwraps a filter bucket, then delegates to the inner parser
    Filter {
        name: String,
        inner: Box<MetricParser>,
    },
}

impl MetricParser {
    pub fn single_value(name: impl Into<String>) -> Self {
        MetricParser::SingleValue { name: name.into() }
    }

    pub fn stats(name: impl Into<String>, selector: StatsSelector) -> Self {
        MetricParser::Stats {
            name: name.into(),
            selector,
        }
    }

    pub fn filter(name: impl Into<String>, inner: MetricParser) -> Self {
        MetricParser::Filter {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    /// Output name of the parsed value
    pub fn name(&self) -> &str {
        match self {
            MetricParser::SingleValue { name }
            | MetricParser::Stats { name, .. }
            | MetricParser::Filter { name, .. } => name,
        }
    }

    /// Extracts this parser's value from a map of buckets keyed by name.
    ///
    /// A missing bucket yields null; a bucket of the wrong shape is an error.
    pub fn parse(&self, buckets: &Map<String, Value>) -> DecodeResult<ExprValue> {
        let name = self.name();
        let bucket = match buckets.get(name) {
            None | Some(Value::Null) => return Ok(ExprValue::Null),
            Some(Value::Object(bucket)) => bucket,
            Some(other) => {
                return Err(DecodeError::NotAnObject {
                    name: name.to_string(),
                    raw: other.to_string(),
                })
            }
        };

        match self {
            MetricParser::SingleValue { .. } => read_number(name, bucket, "value"),
            MetricParser::Stats { selector, .. } => {
                read_number(name, bucket, selector.field_name())
            }
            MetricParser::Filter { inner, .. } => inner.parse(bucket),
        }
    }
}

impl fmt::Display for MetricParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricParser::SingleValue { name } => write!(f, "single_value({})", name),
            MetricParser::Stats { name, selector } => {
                write!(f, "stats({}, {})", name, selector.field_name())
            }
            MetricParser::Filter { name, inner } => write!(f, "filter({}, {})", name, inner),
        }
    }
}

fn read_number(name: &str, bucket: &Map<String, Value>, field: &str) -> DecodeResult<ExprValue> {
    match bucket.get(field) {
        None => Err(DecodeError::MissingField {
            name: name.to_string(),
            field: field.to_string(),
        }),
        Some(Value::Null) => Ok(ExprValue::Null),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(ExprValue::Long(i)),
            None => n.as_f64().map(ExprValue::Double).ok_or_else(|| DecodeError::NonNumeric {
                name: name.to_string(),
                field: field.to_string(),
                raw: n.to_string(),
            }),
        },
        Some(other) => Err(DecodeError::NonNumeric {
            name: name.to_string(),
            field: field.to_string(),
            raw: other.to_string(),
        }),
    }
}
