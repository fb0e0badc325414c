//! `resteasy repo add`: register a repository and initialize its storage.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{absolutize, audit, open_vault, Cli};
use crate::errors::Result;
use crate::vault::RepositoryConfig;

/// Execute the `repo add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    paths: &[PathBuf],
    max_snapshots: Option<u32>,
) -> Result<()> {
    let mut vault = open_vault(cli)?;

    let mut repo = RepositoryConfig::new(absolutize(paths)?);
    if let Some(keep) = max_snapshots {
        repo = repo.with_max_snapshots(keep);
    }
    let path_count = repo.backup_paths.len();

    let result = match vault.add_repository(name, repo) {
        Ok(result) => result,
        Err(e) => {
            audit(vault.root_dir(), "repo-add", Some(name), Some("failed"));
            return Err(e);
        }
    };
    output::engine_output(&result);

    audit(
        vault.root_dir(),
        "repo-add",
        Some(name),
        Some(&format!("{path_count} path(s)")),
    );

    output::success(&format!(
        "Repository '{name}' created at {}",
        vault.storage_path(name).display()
    ));
    output::tip(&format!("Run `resteasy backup {name}` to take the first snapshot."));

    Ok(())
}
