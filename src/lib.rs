//! docscan - query pushdown onto a document search index
//!
//! Compiles filters, sorts, windows, projections and metric aggregations of
//! a query plan into one native search request, and decodes the reply back
//! into typed rows through a pull-based scan operator.

pub mod aggregation;
pub mod cli;
pub mod client;
pub mod config;
pub mod expression;
pub mod filter;
pub mod observability;
pub mod request;
pub mod response;
pub mod scan;
pub mod value;
