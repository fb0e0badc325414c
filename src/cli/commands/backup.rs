//! `resteasy backup`: snapshot a repository's paths.

use crate::cli::output;
use crate::cli::{audit, open_vault, Cli};
use crate::errors::Result;

/// Execute the `backup` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = open_vault(cli)?;

    let result = match vault.backup_repository(name) {
        Ok(result) => result,
        Err(e) => {
            audit(vault.root_dir(), "backup", Some(name), Some("failed"));
            return Err(e);
        }
    };
    output::engine_output(&result);

    audit(vault.root_dir(), "backup", Some(name), None);

    output::success(&format!("Backed up repository '{name}'"));

    Ok(())
}
