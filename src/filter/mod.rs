//! Filter compilation
//!
//! Used for row-level filters pushed onto a scan and for the per-aggregate
//! FILTER clause of a filter bucket.

mod builder;
mod errors;

pub(crate) use builder::exact_field_path;
pub use builder::{FilterCompiler, FilterQueryBuilder};
pub use errors::{FilterError, FilterResult};
