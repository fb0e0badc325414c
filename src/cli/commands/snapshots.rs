//! `resteasy snapshots`: list a repository's snapshots.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `snapshots` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = open_vault(cli)?;
    let result = vault.list_snapshots(name)?;
    output::engine_output(&result);
    Ok(())
}
