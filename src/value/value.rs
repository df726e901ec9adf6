//! Typed values produced by a scan

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use super::row::ResultRow;
use super::types::ExprType;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Null,
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Tuple(ResultRow),
    Collection(Vec<ExprValue>),
}

impl ExprValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ExprValue::Null)
    }

    /// Returns the type this value carries
    pub fn expr_type(&self) -> ExprType {
        match self {
            ExprValue::Null => ExprType::Unknown,
            ExprValue::Integer(_) => ExprType::Integer,
            ExprValue::Long(_) => ExprType::Long,
            ExprValue::Float(_) => ExprType::Float,
            ExprValue::Double(_) => ExprType::Double,
            ExprValue::Boolean(_) => ExprType::Boolean,
            ExprValue::String(_) => ExprType::String,
            ExprValue::Date(_) => ExprType::Date,
            ExprValue::Timestamp(_) => ExprType::Timestamp,
            ExprValue::Tuple(_) => ExprType::Struct,
            ExprValue::Collection(_) => ExprType::Array,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExprValue::Integer(v) => Some(*v as f64),
            ExprValue::Long(v) => Some(*v as f64),
            ExprValue::Float(v) => Some(*v as f64),
            ExprValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExprValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as JSON for output
    pub fn to_json(&self) -> Value {
        match self {
            ExprValue::Null => Value::Null,
            ExprValue::Integer(v) => json!(v),
            ExprValue::Long(v) => json!(v),
            ExprValue::Float(v) => json!(v),
            ExprValue::Double(v) => json!(v),
            ExprValue::Boolean(v) => json!(v),
            ExprValue::String(v) => json!(v),
            ExprValue::Date(d) => json!(d.format(DATE_FORMAT).to_string()),
            ExprValue::Timestamp(ts) => json!(ts.format(TIMESTAMP_FORMAT).to_string()),
            ExprValue::Tuple(row) => row.to_json(),
            ExprValue::Collection(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl fmt::Display for ExprValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprValue::Null => write!(f, "NULL"),
            ExprValue::String(s) => write!(f, "\"{}\"", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<f64> for ExprValue {
    fn from(v: f64) -> Self {
        ExprValue::Double(v)
    }
}

impl From<i64> for ExprValue {
    fn from(v: i64) -> Self {
        ExprValue::Long(v)
    }
}

impl From<&str> for ExprValue {
    fn from(v: &str) -> Self {
        ExprValue::String(v.to_string())
    }
}
