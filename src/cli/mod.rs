//! CLI module for docscan
//!
//! Provides command-line interface for:
//! - explain: print the request a plan file would send
//! - run: execute a plan file against a recorded search reply

mod args;
mod commands;
mod errors;
mod io;
mod plan;

pub use args::{Cli, Command};
pub use commands::{explain, run, run_command, run_plan};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use plan::{PlanAggregate, PlanFile};
