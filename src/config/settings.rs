use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ResteasyError, Result};

/// Shortest generated vault password the settings may ask for.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Tool-level configuration, loaded from `settings.toml`.
///
/// Every field has a sensible default so RestEasy works out-of-the-box
/// without any settings file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// restic binary to run (a bare name is looked up in `PATH`).
    #[serde(default = "default_restic_binary")]
    pub restic_binary: PathBuf,

    /// Vault root to use when `--vault-dir` is not given.
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,

    /// Length of passwords generated by `init` (default: 16).
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Retention default for new vaults (default: 5).
    #[serde(default = "default_max_snapshots")]
    pub max_snapshots: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_restic_binary() -> PathBuf {
    PathBuf::from(crate::engine::restic::DEFAULT_BINARY)
}

fn default_password_length() -> usize {
    crate::vault::password::DEFAULT_PASSWORD_LEN
}

fn default_max_snapshots() -> u32 {
    crate::vault::DEFAULT_MAX_SNAPSHOTS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            restic_binary: default_restic_binary(),
            vault_dir: None,
            password_length: default_password_length(),
            max_snapshots: default_max_snapshots(),
        }
    }
}

impl Settings {
    /// Name of the directory RestEasy uses under the platform dirs.
    const APP_DIR: &'static str = "resteasy";

    /// Name of the settings file.
    const FILE_NAME: &'static str = "settings.toml";

    /// Default settings file: `<config dir>/resteasy/settings.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load settings from `path`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ResteasyError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        settings.validate(path)?;
        Ok(settings)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.password_length < MIN_PASSWORD_LENGTH {
            return Err(ResteasyError::ConfigError(format!(
                "{}: password_length must be at least {MIN_PASSWORD_LENGTH}",
                path.display()
            )));
        }
        if self.max_snapshots == 0 {
            return Err(ResteasyError::ConfigError(format!(
                "{}: max_snapshots must be at least 1",
                path.display()
            )));
        }
        Ok(())
    }

    /// The vault root to use: the configured one, else
    /// `<data dir>/resteasy`.
    pub fn vault_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.vault_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or_else(|| {
                ResteasyError::ConfigError(
                    "cannot determine a default vault directory, pass --vault-dir".into(),
                )
            })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
