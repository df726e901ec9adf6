//! Scan error types
//!
//! Error codes:
//! - SCAN_COMPILE_FAILED (ERROR)
//! - SCAN_REMOTE_EXECUTION_FAILED (ERROR)
//! - SCAN_DECODE_SHAPE_MISMATCH (ERROR)
//! - SCAN_SEQUENCING_VIOLATION (FATAL)

use std::fmt;

use crate::aggregation::AggregationError;
use crate::client::ClientError;
use crate::filter::FilterError;
use crate::response::DecodeError;
use crate::value::ValueError;

use super::state::ScanState;

/// Severity levels for scan errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The call failed; the caller may report it and move on
    Error,
    /// Programming error in the caller
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorCode {
    /// Filter or aggregation could not be compiled
    CompileFailed,
    /// The index call did not complete
    RemoteExecutionFailure,
    /// Reply shape does not match what the request asked for
    DecodeShapeMismatch,
    /// Call made in the wrong lifecycle state
    SequencingViolation,
}

impl ScanErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ScanErrorCode::CompileFailed => "SCAN_COMPILE_FAILED",
            ScanErrorCode::RemoteExecutionFailure => "SCAN_REMOTE_EXECUTION_FAILED",
            ScanErrorCode::DecodeShapeMismatch => "SCAN_DECODE_SHAPE_MISMATCH",
            ScanErrorCode::SequencingViolation => "SCAN_SEQUENCING_VIOLATION",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ScanErrorCode::SequencingViolation => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ScanErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compile-time cause, kept for callers that match on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileCause {
    Aggregation(AggregationError),
    Filter(FilterError),
}

#[derive(Debug, Clone)]
pub struct ScanError {
    code: ScanErrorCode,
    message: String,
    compile_cause: Option<CompileCause>,
}

impl ScanError {
    fn new(code: ScanErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            compile_cause: None,
        }
    }

    pub fn remote_execution(err: &ClientError) -> Self {
        Self::new(ScanErrorCode::RemoteExecutionFailure, err.to_string())
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::new(ScanErrorCode::DecodeShapeMismatch, reason)
    }

    pub fn sequencing(operation: &str, state: ScanState) -> Self {
        Self::new(
            ScanErrorCode::SequencingViolation,
            format!("{} is not allowed in state {}", operation, state),
        )
    }

    pub fn exhausted() -> Self {
        Self::new(
            ScanErrorCode::SequencingViolation,
            "next_row called on an exhausted scan",
        )
    }

    pub fn code(&self) -> ScanErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn compile_cause(&self) -> Option<&CompileCause> {
        self.compile_cause.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<AggregationError> for ScanError {
    fn from(err: AggregationError) -> Self {
        Self {
            code: ScanErrorCode::CompileFailed,
            message: err.to_string(),
            compile_cause: Some(CompileCause::Aggregation(err)),
        }
    }
}

impl From<FilterError> for ScanError {
    fn from(err: FilterError) -> Self {
        Self {
            code: ScanErrorCode::CompileFailed,
            message: err.to_string(),
            compile_cause: Some(CompileCause::Filter(err)),
        }
    }
}

impl From<DecodeError> for ScanError {
    fn from(err: DecodeError) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<ValueError> for ScanError {
    fn from(err: ValueError) -> Self {
        Self::decode(err.to_string())
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ScanError {}

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ScanErrorCode::CompileFailed.code(), "SCAN_COMPILE_FAILED");
        assert_eq!(
            ScanErrorCode::RemoteExecutionFailure.code(),
            "SCAN_REMOTE_EXECUTION_FAILED"
        );
        assert_eq!(
            ScanErrorCode::DecodeShapeMismatch.code(),
            "SCAN_DECODE_SHAPE_MISMATCH"
        );
        assert_eq!(
            ScanErrorCode::SequencingViolation.code(),
            "SCAN_SEQUENCING_VIOLATION"
        );
    }

    #[test]
    fn test_sequencing_is_fatal() {
        let err = ScanError::sequencing("push_down_sort", ScanState::Opened);
        assert!(err.is_fatal());
        assert!(err.message().contains("OPENED"));
    }

    #[test]
    fn test_compile_cause_preserved() {
        let err: ScanError = AggregationError::UnsupportedAggregateFunction("median".into()).into();
        assert_eq!(err.code(), ScanErrorCode::CompileFailed);
        assert!(!err.is_fatal());
        assert_eq!(
            err.compile_cause(),
            Some(&CompileCause::Aggregation(
                AggregationError::UnsupportedAggregateFunction("median".into())
            ))
        );
    }

    #[test]
    fn test_error_display() {
        let err = ScanError::remote_execution(&ClientError::Unreachable("refused".into()));
        let display = err.to_string();
        assert!(display.contains("SCAN_REMOTE_EXECUTION_FAILED"));
        assert!(display.contains("ERROR"));
        assert!(display.contains("refused"));
    }
}
