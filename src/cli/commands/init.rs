//! `resteasy init`: create a new vault.

use crate::cli::output;
use crate::cli::{audit, load_settings, prompt_new_password, vault_manager, Cli};
use crate::errors::Result;

/// Execute the `init` command.
pub fn execute(cli: &Cli, password_prompt: bool, max_snapshots: Option<u32>) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut vault = vault_manager(cli, &settings)?;

    // 1. Either ask for a password or let the vault generate one.
    let password = if password_prompt {
        Some(prompt_new_password()?)
    } else {
        None
    };

    // 2. Create the directory layout and the config file.
    let max_snapshots = max_snapshots.unwrap_or(settings.max_snapshots);
    vault.create(password.as_deref().map(String::as_str), Some(max_snapshots))?;

    // 3. Audit log.
    audit(
        vault.root_dir(),
        "init",
        None,
        Some(&format!("max_snapshots={max_snapshots}")),
    );

    output::success(&format!("Vault created at {}", vault.root_dir().display()));
    if password.is_none() {
        output::info(&format!(
            "A random vault password was generated and stored in {}",
            vault.config_path().display()
        ));
    }

    // 4. Show helpful tips.
    output::tip("Run `resteasy repo add <NAME> <PATH>...` to add a repository.");
    output::tip("Run `resteasy backup <NAME>` to back it up.");

    Ok(())
}
