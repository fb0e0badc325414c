//! `resteasy check`: compare the registry with the storage on disk.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{ResteasyError, Result};

/// Execute the `check` command.
pub fn execute(cli: &Cli, deep: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    let report = vault.verify_health(deep)?;

    output::print_health_report(&report);

    if report.is_healthy() {
        Ok(())
    } else {
        Err(ResteasyError::CommandFailed(format!(
            "vault health check found {} issue(s)",
            report.issues.len()
        )))
    }
}
