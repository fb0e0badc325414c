//! `resteasy repo remove`: delete a repository and its storage.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{audit, open_vault, Cli};
use crate::errors::{ResteasyError, Result};

/// Execute the `repo remove` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let mut vault = open_vault(cli)?;

    // Fail on unknown names before asking anything.
    vault.repository(name)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete repository '{name}' and all of its snapshots? This cannot be undone"
            ))
            .default(false)
            .interact()
            .map_err(|e| ResteasyError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if let Err(e) = vault.remove_repository(name) {
        audit(vault.root_dir(), "repo-remove", Some(name), Some("failed"));
        return Err(e);
    }

    audit(vault.root_dir(), "repo-remove", Some(name), None);

    output::success(&format!("Deleted repository '{name}'"));

    Ok(())
}
