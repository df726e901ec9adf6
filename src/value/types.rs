//! Declared field types
//!
//! The closed set of types a field mapping can declare for a document field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ValueError;

/// Type declared for a document field in the index mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExprType {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    /// Analysed text; exact-match operations go through its `.keyword` subfield
    Text,
    Date,
    Timestamp,
    Struct,
    Array,
    Unknown,
}

impl ExprType {
    /// Returns the canonical type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExprType::Integer => "INTEGER",
            ExprType::Long => "LONG",
            ExprType::Float => "FLOAT",
            ExprType::Double => "DOUBLE",
            ExprType::Boolean => "BOOLEAN",
            ExprType::String => "STRING",
            ExprType::Text => "TEXT",
            ExprType::Date => "DATE",
            ExprType::Timestamp => "TIMESTAMP",
            ExprType::Struct => "STRUCT",
            ExprType::Array => "ARRAY",
            ExprType::Unknown => "UNKNOWN",
        }
    }

    /// Returns true for the numeric types
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ExprType::Integer | ExprType::Long | ExprType::Float | ExprType::Double
        )
    }

    /// Infers a type from a raw JSON value when no mapping is declared.
    pub fn infer(raw: &Value) -> Self {
        match raw {
            Value::Null => ExprType::Unknown,
            Value::Bool(_) => ExprType::Boolean,
            Value::Number(n) if n.is_i64() => ExprType::Long,
            Value::Number(_) => ExprType::Double,
            Value::String(_) => ExprType::String,
            Value::Array(_) => ExprType::Array,
            Value::Object(_) => ExprType::Struct,
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExprType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTEGER" => Ok(ExprType::Integer),
            "LONG" => Ok(ExprType::Long),
            "FLOAT" => Ok(ExprType::Float),
            "DOUBLE" => Ok(ExprType::Double),
            "BOOLEAN" => Ok(ExprType::Boolean),
            "STRING" | "KEYWORD" => Ok(ExprType::String),
            "TEXT" => Ok(ExprType::Text),
            "DATE" => Ok(ExprType::Date),
            "TIMESTAMP" => Ok(ExprType::Timestamp),
            "STRUCT" | "OBJECT" => Ok(ExprType::Struct),
            "ARRAY" | "NESTED" => Ok(ExprType::Array),
            "UNKNOWN" => Ok(ExprType::Unknown),
            other => Err(ValueError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_from_json() {
        assert_eq!(ExprType::infer(&json!(1)), ExprType::Long);
        assert_eq!(ExprType::infer(&json!(1.5)), ExprType::Double);
        assert_eq!(ExprType::infer(&json!(i64::MAX)), ExprType::Long);
        assert_eq!(ExprType::infer(&json!(u64::MAX)), ExprType::Double);
        assert_eq!(ExprType::infer(&json!("a")), ExprType::String);
        assert_eq!(ExprType::infer(&json!({"a": 1})), ExprType::Struct);
        assert_eq!(ExprType::infer(&json!(null)), ExprType::Unknown);
    }

    #[test]
    fn test_parse_mapping_names() {
        assert_eq!("keyword".parse::<ExprType>().unwrap(), ExprType::String);
        assert_eq!("Timestamp".parse::<ExprType>().unwrap(), ExprType::Timestamp);
        assert!("geo_point".parse::<ExprType>().is_err());
    }
}
