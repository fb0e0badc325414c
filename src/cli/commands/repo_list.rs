//! `resteasy repo list`: show all registered repositories.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `repo list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    output::print_repositories_table(vault.config()?);
    Ok(())
}
