//! Observable scan lifecycle events

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Scan operator created for an index
    ScanCreated,
    /// Filter ANDed onto the request
    ScanFilterPushed,
    /// Aggregations compiled and attached
    ScanAggregationPushed,
    /// No sort pushed; document-order tie-break applied
    ScanDefaultSort,
    /// Request sent and result buffered
    ScanOpen,
    /// Request failed; nothing buffered
    ScanOpenFailed,
    /// Call made in the wrong lifecycle state
    ScanSequencingViolation,
    /// Scan closed
    ScanClosed,
    /// Server-side cleanup failed during close
    ScanCleanupFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ScanCreated => "SCAN_CREATED",
            Event::ScanFilterPushed => "SCAN_FILTER_PUSHED",
            Event::ScanAggregationPushed => "SCAN_AGGREGATION_PUSHED",
            Event::ScanDefaultSort => "SCAN_DEFAULT_SORT",
            Event::ScanOpen => "SCAN_OPEN",
            Event::ScanOpenFailed => "SCAN_OPEN_FAILED",
            Event::ScanSequencingViolation => "SCAN_SEQUENCING_VIOLATION",
            Event::ScanClosed => "SCAN_CLOSED",
            Event::ScanCleanupFailed => "SCAN_CLEANUP_FAILED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
