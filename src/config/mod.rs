//! Scan settings
//!
//! Loaded from a JSON file. Every field has a default, so an empty object is
//! a valid configuration. Values are validated on load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expression::DEFAULT_SCRIPT_LANG;
use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings shared by every scan built from one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Row-limit hint for scans that push down no limit (default 200)
    #[serde(default = "default_query_size_limit")]
    pub query_size_limit: u32,

    /// Script language tag for serialized expressions
    #[serde(default = "default_script_lang")]
    pub script_lang: String,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_query_size_limit() -> u32 {
    200
}
fn default_script_lang() -> String {
    DEFAULT_SCRIPT_LANG.to_string()
}
fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            query_size_limit: default_query_size_limit(),
            script_lang: default_script_lang(),
            log_level: default_log_level(),
        }
    }
}

impl ScanSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let settings: ScanSettings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.query_size_limit == 0 {
            return Err(ConfigError::Invalid("query_size_limit must be > 0".into()));
        }
        if self.script_lang.trim().is_empty() {
            return Err(ConfigError::Invalid("script_lang must not be empty".into()));
        }
        Ok(())
    }
}
