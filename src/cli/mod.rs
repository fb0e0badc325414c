//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::engine::Restic;
use crate::errors::{ResteasyError, Result};
use crate::vault::VaultManager;

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the log filter (e.g. `resteasy=debug`).
const LOG_ENV: &str = "RESTEASY_LOG";

/// RestEasy CLI: a vault of restic backup repositories.
#[derive(Parser)]
#[command(
    name = "resteasy",
    about = "Vault manager for restic backup repositories",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: <data dir>/resteasy)
    #[arg(long, env = "RESTEASY_VAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,

    /// Settings file (default: <config dir>/resteasy/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new vault
    Init {
        /// Choose the vault password instead of generating one
        #[arg(long)]
        password_prompt: bool,

        /// Number of snapshots to keep per repository
        #[arg(long)]
        max_snapshots: Option<u32>,
    },

    /// Manage repositories (add, remove, list)
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },

    /// Back up a repository's paths
    Backup {
        /// Repository name
        name: String,
    },

    /// Apply the retention policy to a repository
    Forget {
        /// Repository name
        name: String,
    },

    /// List a repository's snapshots
    Snapshots {
        /// Repository name
        name: String,
    },

    /// Check that the registry matches the storage on disk
    Check {
        /// Also run restic's own check on every repository
        #[arg(long)]
        deep: bool,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Repo subcommands for registry management.
#[derive(clap::Subcommand)]
pub enum RepoAction {
    /// Register a repository and initialize its storage
    Add {
        /// Repository name
        name: String,

        /// Files or directories to back up
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Override the vault's retention default for this repository
        #[arg(long)]
        max_snapshots: Option<u32>,
    },

    /// Delete a repository and all of its snapshots
    Remove {
        /// Repository name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List registered repositories
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the global `tracing` subscriber.
///
/// The filter comes from `RESTEASY_LOG` (default: `warn`); `--verbose`
/// forces `debug`. Logs go to stderr so command output stays clean.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    // Already installed (e.g. in tests): keep the existing one.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Load settings from `--settings`, else the default settings file.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.settings {
        Some(path) => Settings::load(path),
        None => match Settings::default_path() {
            Some(path) => Settings::load(&path),
            None => Ok(Settings::default()),
        },
    }
}

/// Build an unloaded vault manager from the CLI arguments and settings.
pub fn vault_manager(cli: &Cli, settings: &Settings) -> Result<VaultManager<Restic>> {
    let root = match &cli.vault_dir {
        Some(dir) => dir.clone(),
        None => settings.vault_dir()?,
    };
    let engine = Restic::new(settings.restic_binary.clone());
    Ok(VaultManager::new(root, engine).with_password_len(settings.password_length))
}

/// Build a vault manager and load the existing vault.
pub fn open_vault(cli: &Cli) -> Result<VaultManager<Restic>> {
    let settings = load_settings(cli)?;
    let mut vault = vault_manager(cli, &settings)?;
    vault.load()?;
    Ok(vault)
}

/// Record an operation in the vault's audit log, if compiled in.
pub fn audit(vault_root: &Path, op: &str, repository: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(vault_root, op, repository, details);

    // Suppress unused variable warnings when the audit log is off.
    #[cfg(not(feature = "audit-log"))]
    let _ = (vault_root, op, repository, details);
}

/// Prompt for a new vault password with confirmation.
///
/// Respects `RESTEASY_PASSWORD` for scripted/CI usage.
/// Enforces a minimum password length.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("RESTEASY_PASSWORD") {
        if !pw.is_empty() {
            check_password_len(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| ResteasyError::CommandFailed(format!("password prompt: {e}")))?;

        if check_password_len(&password).is_err() {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn check_password_len(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ResteasyError::InvalidArgument(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Make backup paths absolute against the current directory, so later
/// backups run from anywhere still find them.
pub fn absolutize(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir()?;
    Ok(paths.iter().map(|p| cwd.join(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_repo_add() {
        let cli = Cli::try_parse_from([
            "resteasy",
            "--vault-dir",
            "/tmp/vault",
            "repo",
            "add",
            "docs",
            "/home/me/docs",
            "/home/me/notes",
        ])
        .unwrap();

        assert_eq!(cli.vault_dir, Some(PathBuf::from("/tmp/vault")));
        match cli.command {
            Commands::Repo {
                action:
                    RepoAction::Add {
                        name,
                        paths,
                        max_snapshots,
                    },
            } => {
                assert_eq!(name, "docs");
                assert_eq!(paths.len(), 2);
                assert!(max_snapshots.is_none());
            }
            _ => panic!("expected repo add"),
        }
    }

    #[test]
    fn repo_add_requires_a_path() {
        assert!(Cli::try_parse_from(["resteasy", "repo", "add", "docs"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resteasy", "check", "--deep", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check { deep: true }));
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(check_password_len("short").is_err());
        assert!(check_password_len("long-enough").is_ok());
    }

    #[test]
    fn absolutize_keeps_absolute_paths() {
        let cwd = std::env::current_dir().unwrap();
        let out = absolutize(&[PathBuf::from("/etc"), PathBuf::from("rel")]).unwrap();
        assert_eq!(out[0], PathBuf::from("/etc"));
        assert_eq!(out[1], cwd.join("rel"));
    }

    #[test]
    fn vault_dir_flag_wins_over_settings() {
        let cli = Cli::try_parse_from(["resteasy", "--vault-dir", "/a", "repo", "list"]).unwrap();
        let settings = Settings {
            vault_dir: Some(PathBuf::from("/b")),
            ..Settings::default()
        };
        let vault = vault_manager(&cli, &settings).unwrap();
        assert_eq!(vault.root_dir(), Path::new("/a"));
    }
}
