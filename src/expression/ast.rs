//! Scalar expression tree
//!
//! The pushdown layer only needs to tell references, literals, aliases and
//! function calls apart; evaluation happens inside the index through the
//! serialized payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::ExprType;

/// A scalar expression consumed by the compilers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalarExpr {
    /// Reference to a document field
    Reference {
        attr: String,
        #[serde(rename = "type", default = "unknown_type")]
        ty: ExprType,
    },
    /// Constant value
    Literal { value: Value },
    /// Aliased expression
    Named { name: String, expr: Box<ScalarExpr> },
    /// Function or operator application
    Function { name: String, args: Vec<ScalarExpr> },
}

fn unknown_type() -> ExprType {
    ExprType::Unknown
}

const INFIX_OPERATORS: [&str; 8] = ["=", "!=", ">", ">=", "<", "<=", "and", "or"];

impl ScalarExpr {
    pub fn reference(attr: impl Into<String>, ty: ExprType) -> Self {
        ScalarExpr::Reference {
            attr: attr.into(),
            ty,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        ScalarExpr::Literal {
            value: value.into(),
        }
    }

    pub fn named(name: impl Into<String>, expr: ScalarExpr) -> Self {
        ScalarExpr::Named {
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<ScalarExpr>) -> Self {
        ScalarExpr::Function {
            name: name.into(),
            args,
        }
    }

    pub fn eq(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("=", vec![left, right])
    }

    pub fn ne(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("!=", vec![left, right])
    }

    pub fn gt(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function(">", vec![left, right])
    }

    pub fn gte(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function(">=", vec![left, right])
    }

    pub fn lt(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("<", vec![left, right])
    }

    pub fn lte(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("<=", vec![left, right])
    }

    pub fn and(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("and", vec![left, right])
    }

    pub fn or(left: ScalarExpr, right: ScalarExpr) -> Self {
        Self::function("or", vec![left, right])
    }

    pub fn not(inner: ScalarExpr) -> Self {
        Self::function("not", vec![inner])
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, ScalarExpr::Literal { .. })
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, ScalarExpr::Reference { .. })
    }
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::Reference { attr, .. } => write!(f, "{}", attr),
            ScalarExpr::Literal { value } => match value {
                Value::String(s) => write!(f, "\"{}\"", s),
                other => write!(f, "{}", other),
            },
            ScalarExpr::Named { name, .. } => write!(f, "{}", name),
            ScalarExpr::Function { name, args }
                if args.len() == 2 && INFIX_OPERATORS.contains(&name.as_str()) =>
            {
                write!(f, "{} {} {}", args[0], name, args[1])
            }
            ScalarExpr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
