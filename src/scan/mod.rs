//! Index scan operator
//!
//! Pull-based operator that owns one search request:
//!
//! ```text
//! CREATED --open--> OPENED --last row--> EXHAUSTED
//!    \                 \                    \
//!     +------close------+--------close-------+--> CLOSED
//! ```
//!
//! # Invariants
//!
//! - Pushdowns are only accepted in CREATED
//! - At most one aggregation pushdown per scan
//! - `open` issues exactly one remote call per attempt
//! - A failed `open` exposes no rows and leaves the scan in CREATED
//! - `close` is idempotent and never fails

mod errors;
mod explain;
mod scan;
mod state;

pub use errors::{CompileCause, ScanError, ScanErrorCode, ScanResult, Severity};
pub use explain::ExplainScan;
pub use scan::IndexScan;
pub use state::ScanState;
