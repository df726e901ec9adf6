//! Scalar expressions and the serialization boundary
//!
//! Expressions arrive from the plan layer already analysed. The compilers
//! either reference a field natively or ship the expression as a script.

mod ast;
mod errors;
mod serializer;

pub use ast::ScalarExpr;
pub use errors::{ExpressionError, ExpressionResult};
pub use serializer::{ExpressionSerializer, JsonExpressionSerializer, DEFAULT_SCRIPT_LANG};
