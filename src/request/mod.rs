//! Search request construction
//!
//! `ScanRequest` accumulates pushdown decisions; `SortKey` describes one
//! native sort clause.

mod request;
mod sort;

pub use request::ScanRequest;
pub use sort::{NullOrder, SortDirection, SortKey, DOC_ORDER_FIELD};
