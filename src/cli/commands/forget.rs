//! `resteasy forget`: apply the retention policy to a repository.

use crate::cli::output;
use crate::cli::{audit, open_vault, Cli};
use crate::errors::Result;

/// Execute the `forget` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = open_vault(cli)?;
    let keep = vault
        .config()?
        .effective_max_snapshots(name)
        .unwrap_or_default();

    let result = match vault.forget_snapshots(name) {
        Ok(result) => result,
        Err(e) => {
            audit(vault.root_dir(), "forget", Some(name), Some("failed"));
            return Err(e);
        }
    };
    output::engine_output(&result);

    audit(
        vault.root_dir(),
        "forget",
        Some(name),
        Some(&format!("keep_last={keep}")),
    );

    output::success(&format!(
        "Kept the {keep} most recent snapshots of '{name}'"
    ));

    Ok(())
}
