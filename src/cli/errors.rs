//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::aggregation::AggregationError;
use crate::client::ClientError;
use crate::config::ConfigError;
use crate::scan::ScanError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Settings file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Plan file could not be read or turned into a scan
    PlanError,
    /// Reply file is not a search reply
    ReplyError,
    /// Scan rejected the plan or failed to execute it
    ScanFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DOCSCAN_CLI_CONFIG_ERROR",
            Self::IoError => "DOCSCAN_CLI_IO_ERROR",
            Self::PlanError => "DOCSCAN_CLI_PLAN_ERROR",
            Self::ReplyError => "DOCSCAN_CLI_REPLY_ERROR",
            Self::ScanFailed => "DOCSCAN_CLI_SCAN_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn plan_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PlanError, msg)
    }

    pub fn reply_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ReplyError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<AggregationError> for CliError {
    fn from(e: AggregationError) -> Self {
        Self::plan_error(e.to_string())
    }
}

impl From<ClientError> for CliError {
    fn from(e: ClientError) -> Self {
        Self::reply_error(e.to_string())
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        Self::new(CliErrorCode::ScanFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
