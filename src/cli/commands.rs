//! CLI command implementations
//!
//! Both commands build the scan from a plan file the same way, so `explain`
//! prints exactly the request `run` executes.

use std::io::{self, Write};
use std::path::Path;

use crate::client::ReplayClient;
use crate::config::ScanSettings;
use crate::observability::Logger;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_row, write_text};
use super::plan::PlanFile;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Explain { plan, config } => explain(&plan, config.as_deref()),
        Command::Run {
            plan,
            reply,
            config,
        } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run_plan(&plan, &reply, config.as_deref(), &mut out)
        }
    }
}

/// Print the request a plan would send
pub fn explain(plan_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let plan = PlanFile::load(plan_path)?;

    let client = ReplayClient::new(Default::default());
    let scan = plan.build_scan(&client, &settings)?;
    write_text(&scan.explain())
}

/// Run a plan against a recorded reply, writing one JSON line per row
pub fn run_plan<W: Write>(
    plan_path: &Path,
    reply_path: &Path,
    config_path: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let settings = load_settings(config_path)?;
    let plan = PlanFile::load(plan_path)?;
    let client = ReplayClient::from_json(&read_json_file(reply_path)?)
        .map_err(|e| CliError::reply_error(format!("{}: {}", reply_path.display(), e)))?;

    let mut scan = plan.build_scan(&client, &settings)?;
    scan.open()?;
    while scan.has_next() {
        let row = scan.next_row()?;
        write_row(out, &row)?;
    }
    scan.close();
    out.flush()?;
    Ok(())
}

fn load_settings(path: Option<&Path>) -> CliResult<ScanSettings> {
    let settings = match path {
        Some(path) => ScanSettings::load(path)?,
        None => ScanSettings::default(),
    };
    Logger::set_min_severity(settings.log_level);
    Ok(settings)
}
