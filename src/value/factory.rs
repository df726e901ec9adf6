//! Value factory
//!
//! Converts raw document values into typed values using the declared field
//! type mapping. Fields missing from the mapping are typed from the raw JSON.
//! Nested objects resolve their children through dotted paths (`a.b`).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::errors::{ValueError, ValueResult};
use super::row::ResultRow;
use super::types::ExprType;
use super::value::ExprValue;

/// Declared field path → type mapping
pub type TypeMapping = BTreeMap<String, ExprType>;

/// Converts one raw value into a typed value
pub trait ValueFactory {
    /// Constructs a value of the declared type from a raw JSON value.
    ///
    /// `path` is the dotted field path, used for nested lookups and errors.
    fn construct(
        &self,
        path: &str,
        ty: ExprType,
        raw: &Value,
        mapping: &TypeMapping,
    ) -> ValueResult<ExprValue>;

    /// Materializes a whole document source as one row, in source field order.
    fn construct_row(&self, source: &Value, mapping: &TypeMapping) -> ValueResult<ResultRow> {
        let fields = source
            .as_object()
            .ok_or_else(|| ValueError::NotAnObject(source.to_string()))?;

        let mut row = ResultRow::new();
        for (name, raw) in fields {
            let ty = mapping
                .get(name)
                .copied()
                .unwrap_or_else(|| ExprType::infer(raw));
            row.push(name.clone(), self.construct(name, ty, raw, mapping)?);
        }
        Ok(row)
    }
}

/// Default factory for JSON document sources
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueFactory;

impl JsonValueFactory {
    pub fn new() -> Self {
        Self
    }

    fn number(path: &str, ty: ExprType, raw: &Value) -> ValueResult<f64> {
        match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ValueError::invalid(path, ty, raw))
    }

    fn integral(path: &str, ty: ExprType, raw: &Value) -> ValueResult<i64> {
        match raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ValueError::invalid(path, ty, raw))
    }

    fn timestamp(path: &str, raw: &Value) -> ValueResult<NaiveDateTime> {
        let parsed = match raw {
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.naive_utc()),
            Value::String(s) => parse_timestamp(s),
            _ => None,
        };
        parsed.ok_or_else(|| ValueError::invalid(path, ExprType::Timestamp, raw))
    }

    fn tuple(&self, path: &str, raw: &Value, mapping: &TypeMapping) -> ValueResult<ExprValue> {
        let fields = raw
            .as_object()
            .ok_or_else(|| ValueError::invalid(path, ExprType::Struct, raw))?;

        let mut row = ResultRow::new();
        for (name, child) in fields {
            let child_path = format!("{}.{}", path, name);
            let ty = mapping
                .get(&child_path)
                .copied()
                .unwrap_or_else(|| ExprType::infer(child));
            row.push(name.clone(), self.construct(&child_path, ty, child, mapping)?);
        }
        Ok(ExprValue::Tuple(row))
    }
}

impl ValueFactory for JsonValueFactory {
    fn construct(
        &self,
        path: &str,
        ty: ExprType,
        raw: &Value,
        mapping: &TypeMapping,
    ) -> ValueResult<ExprValue> {
        if raw.is_null() {
            return Ok(ExprValue::Null);
        }

        // A multi-valued field keeps its declared element type
        if let Value::Array(items) = raw {
            let element_ty = match ty {
                ExprType::Array => None,
                other => Some(other),
            };
            return items
                .iter()
                .map(|item| {
                    let item_ty = element_ty.unwrap_or_else(|| ExprType::infer(item));
                    self.construct(path, item_ty, item, mapping)
                })
                .collect::<ValueResult<Vec<_>>>()
                .map(ExprValue::Collection);
        }

        match ty {
            ExprType::Integer => {
                let v = Self::integral(path, ty, raw)?;
                i32::try_from(v)
                    .map(ExprValue::Integer)
                    .map_err(|_| ValueError::invalid(path, ty, raw))
            }
            ExprType::Long => Self::integral(path, ty, raw).map(ExprValue::Long),
            ExprType::Float => Self::number(path, ty, raw).map(|v| ExprValue::Float(v as f32)),
            ExprType::Double => Self::number(path, ty, raw).map(ExprValue::Double),
            ExprType::Boolean => match raw {
                Value::Bool(b) => Ok(ExprValue::Boolean(*b)),
                Value::String(s) if s == "true" || s == "false" => {
                    Ok(ExprValue::Boolean(s == "true"))
                }
                _ => Err(ValueError::invalid(path, ty, raw)),
            },
            ExprType::String | ExprType::Text => match raw {
                Value::String(s) => Ok(ExprValue::String(s.clone())),
                Value::Number(_) | Value::Bool(_) => Ok(ExprValue::String(raw.to_string())),
                _ => Err(ValueError::invalid(path, ty, raw)),
            },
            ExprType::Timestamp => Self::timestamp(path, raw).map(ExprValue::Timestamp),
            ExprType::Date => Self::timestamp(path, raw).map(|ts| ExprValue::Date(ts.date())),
            ExprType::Struct => self.tuple(path, raw, mapping),
            ExprType::Array | ExprType::Unknown => {
                let inferred = ExprType::infer(raw);
                if inferred == ExprType::Array || inferred == ExprType::Unknown {
                    return Err(ValueError::invalid(path, ty, raw));
                }
                self.construct(path, inferred, raw, mapping)
            }
        }
    }
}

/// Parses the timestamp formats an index commonly stores.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
