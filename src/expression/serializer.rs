//! Expression serialization boundary
//!
//! Expressions that cannot be pushed down as a field reference travel to the
//! index as an opaque script payload. Compilers only ever hand expressions to
//! a serializer and embed the returned string; they never look inside it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use super::ast::ScalarExpr;
use super::errors::{ExpressionError, ExpressionResult};

/// Script language the index registers for serialized expressions
pub const DEFAULT_SCRIPT_LANG: &str = "opensearch_query_expression";

/// Turns an expression into a payload the index can evaluate per document
pub trait ExpressionSerializer {
    fn serialize(&self, expr: &ScalarExpr) -> ExpressionResult<String>;

    fn deserialize(&self, payload: &str) -> ExpressionResult<ScalarExpr>;

    /// Script language tag emitted next to the payload
    fn script_lang(&self) -> &str {
        DEFAULT_SCRIPT_LANG
    }

    /// Builds the native script object for an expression
    fn script(&self, expr: &ScalarExpr) -> ExpressionResult<Value> {
        Ok(json!({
            "source": self.serialize(expr)?,
            "lang": self.script_lang(),
        }))
    }
}

/// Base64-encoded JSON serializer
#[derive(Debug, Clone)]
pub struct JsonExpressionSerializer {
    lang: String,
}

impl JsonExpressionSerializer {
    pub fn new() -> Self {
        Self::with_lang(DEFAULT_SCRIPT_LANG)
    }

    pub fn with_lang(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl Default for JsonExpressionSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionSerializer for JsonExpressionSerializer {
    fn serialize(&self, expr: &ScalarExpr) -> ExpressionResult<String> {
        let bytes = serde_json::to_vec(expr)
            .map_err(|e| ExpressionError::Serialization(e.to_string()))?;
        Ok(STANDARD.encode(bytes))
    }

    fn deserialize(&self, payload: &str) -> ExpressionResult<ScalarExpr> {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| ExpressionError::Deserialization(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ExpressionError::Deserialization(e.to_string()))
    }

    fn script_lang(&self) -> &str {
        &self.lang
    }
}
