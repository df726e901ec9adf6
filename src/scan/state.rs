//! Scan lifecycle state
//!
//! CREATED → OPENED → EXHAUSTED, CREATED → FAILED when a reply cannot be
//! decoded, and CLOSED from anywhere.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Accepting pushdowns; nothing sent yet
    Created,
    /// Request executed, rows buffered
    Opened,
    /// Every buffered row has been handed out
    Exhausted,
    /// Request executed but its reply could not be decoded
    Failed,
    /// Terminal
    Closed,
}

impl ScanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::Created => "CREATED",
            ScanState::Opened => "OPENED",
            ScanState::Exhausted => "EXHAUSTED",
            ScanState::Failed => "FAILED",
            ScanState::Closed => "CLOSED",
        }
    }

    /// Pushdowns and open are only valid before execution
    pub fn accepts_pushdown(&self) -> bool {
        matches!(self, ScanState::Created)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
