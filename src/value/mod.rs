//! Typed values and the value factory
//!
//! Raw document values coming back from the index are converted into
//! `ExprValue`s according to the declared field type mapping.

mod errors;
mod factory;
mod row;
mod types;
mod value;

pub use errors::{ValueError, ValueResult};
pub use factory::{JsonValueFactory, TypeMapping, ValueFactory};
pub use row::ResultRow;
pub use types::ExprType;
pub use value::ExprValue;
