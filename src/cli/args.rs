//! CLI argument definitions using clap
//!
//! Commands:
//! - docscan explain --plan <path> [--config <path>]
//! - docscan run --plan <path> --reply <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docscan - push query plans down to a document index
#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the request a plan would send
    Explain {
        /// Path to the plan file
        #[arg(long)]
        plan: PathBuf,

        /// Path to the scan settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a plan against a recorded search reply
    Run {
        /// Path to the plan file
        #[arg(long)]
        plan: PathBuf,

        /// Path to the recorded search reply
        #[arg(long)]
        reply: PathBuf,

        /// Path to the scan settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
