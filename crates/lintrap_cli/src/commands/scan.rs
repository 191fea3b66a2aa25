//! Scan command implementation

use clap::ArgMatches;
use lintrap_core::{Application, LintrapError, Runner};
use tracing::info;

use crate::cli::{Cli, formatter_requests};

/// Lints the selected files and reports through the requested formatters.
///
/// Returns whether any lint counts as a failure.
pub fn run_scan(
    app: &mut Application,
    cli: &Cli,
    matches: &ArgMatches,
) -> Result<bool, LintrapError> {
    let options = super::run_options(cli)?;
    let config = app.load_configuration(&options)?;
    let formatter = app.load_formatters(&formatter_requests(matches), &config, cli.debug)?;

    let report = Runner::new(app, &config, &formatter).run(&options)?;

    if report.has_failures() {
        info!("Failures were reported");
    } else if report.has_warnings() {
        info!("Warnings were reported");
    }
    Ok(report.has_failures())
}
