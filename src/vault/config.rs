//! The persisted vault configuration.
//!
//! `config.json` at the vault root holds everything RestEasy knows about a
//! vault:
//!
//! ```text
//! {
//!   "vault_password": "...",
//!   "max_snapshots": 5,
//!   "repositories": {
//!     "docs": { "backup_paths": ["/home/me/docs"] }
//!   }
//! }
//! ```
//!
//! The document is always written in full. Repositories are kept in a
//! `BTreeMap` so the output is sorted by name and stable across saves.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::name::validate_repository_name;
use crate::errors::{ResteasyError, Result};

/// Retention default used when none is given at vault creation.
pub const DEFAULT_MAX_SNAPSHOTS: u32 = 5;

/// Configuration of a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Paths included in every backup, in order. Never empty once registered.
    pub backup_paths: Vec<PathBuf>,

    /// Per-repository retention override. Falls back to the vault default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_snapshots: Option<u32>,
}

impl RepositoryConfig {
    /// Build a repository config from a list of paths.
    ///
    /// Duplicate paths are dropped, keeping the first occurrence.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut backup_paths: Vec<PathBuf> = Vec::new();
        for path in paths {
            let path = path.into();
            if !backup_paths.contains(&path) {
                backup_paths.push(path);
            }
        }

        Self {
            backup_paths,
            max_snapshots: None,
        }
    }

    /// Set a retention override for this repository.
    pub fn with_max_snapshots(mut self, max_snapshots: u32) -> Self {
        self.max_snapshots = Some(max_snapshots);
        self
    }
}

/// The whole vault state as stored in `config.json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Password shared by every repository in the vault.
    pub vault_password: String,

    /// Retention default for repositories without an override.
    pub max_snapshots: u32,

    /// Registry of repositories, keyed by name.
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryConfig>,
}

impl VaultConfig {
    /// Create an empty registry.
    pub fn new(vault_password: String, max_snapshots: u32) -> Self {
        Self {
            vault_password,
            max_snapshots,
            repositories: BTreeMap::new(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ResteasyError::Serialization(format!("vault config: {e}")))
    }

    /// Parse and validate a config document.
    ///
    /// Rejects documents that would break the registry invariants: a zero
    /// retention value, invalid repository names, or repositories without
    /// backup paths.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: VaultConfig =
            serde_json::from_str(json).map_err(|e| ResteasyError::Deserialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_snapshots == 0 {
            return Err(ResteasyError::Deserialization(
                "max_snapshots must be positive".into(),
            ));
        }

        for (name, repo) in &self.repositories {
            validate_repository_name(name)
                .map_err(|e| ResteasyError::Deserialization(e.to_string()))?;
            if repo.backup_paths.is_empty() {
                return Err(ResteasyError::Deserialization(format!(
                    "repository '{name}' has no backup paths"
                )));
            }
            if repo.max_snapshots == Some(0) {
                return Err(ResteasyError::Deserialization(format!(
                    "repository '{name}' has max_snapshots of 0"
                )));
            }
        }

        Ok(())
    }

    /// Retention value that applies to `name`, if it is registered.
    pub fn effective_max_snapshots(&self, name: &str) -> Option<u32> {
        self.repositories
            .get(name)
            .map(|repo| repo.max_snapshots.unwrap_or(self.max_snapshots))
    }
}

// Keep the password out of debug output and logs.
impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("vault_password", &"<redacted>")
            .field("max_snapshots", &self.max_snapshots)
            .field("repositories", &self.repositories)
            .finish()
    }
}

impl Drop for VaultConfig {
    fn drop(&mut self) {
        self.vault_password.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VaultConfig {
        let mut config = VaultConfig::new("hunter2hunter2ab".into(), 5);
        config
            .repositories
            .insert("docs".into(), RepositoryConfig::new(["/tmp/a", "/tmp/b"]));
        config
    }

    #[test]
    fn json_roundtrip_preserves_registry() {
        let config = sample();
        let json = config.to_json().unwrap();
        let restored = VaultConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn serialized_form_uses_documented_field_names() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["vault_password"], "hunter2hunter2ab");
        assert_eq!(value["max_snapshots"], 5);
        assert_eq!(value["repositories"]["docs"]["backup_paths"][0], "/tmp/a");
        assert_eq!(value["repositories"]["docs"]["backup_paths"][1], "/tmp/b");
        // No override stored unless one was set.
        assert!(value["repositories"]["docs"].get("max_snapshots").is_none());
    }

    #[test]
    fn repositories_serialize_sorted() {
        let mut config = VaultConfig::new("pw".into(), 5);
        config
            .repositories
            .insert("zeta".into(), RepositoryConfig::new(["/z"]));
        config
            .repositories
            .insert("alpha".into(), RepositoryConfig::new(["/a"]));
        let json = config.to_json().unwrap();
        assert!(json.find("alpha").unwrap() < json.find("zeta").unwrap());
    }

    #[test]
    fn missing_repositories_field_means_empty_registry() {
        let config =
            VaultConfig::from_json(r#"{"vault_password":"pw","max_snapshots":3}"#).unwrap();
        assert!(config.repositories.is_empty());
        assert_eq!(config.max_snapshots, 3);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"vault_password":"pw","max_snapshots":3,"repositories":{},"extra":1}"#;
        assert!(VaultConfig::from_json(json).is_ok());
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let err = VaultConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ResteasyError::Deserialization(_)));
    }

    #[test]
    fn missing_password_is_deserialization_error() {
        let err = VaultConfig::from_json(r#"{"max_snapshots":3}"#).unwrap_err();
        assert!(matches!(err, ResteasyError::Deserialization(_)));
    }

    #[test]
    fn rejects_zero_retention() {
        let err = VaultConfig::from_json(r#"{"vault_password":"pw","max_snapshots":0}"#)
            .unwrap_err();
        assert!(matches!(err, ResteasyError::Deserialization(_)));
    }

    #[test]
    fn rejects_repository_without_paths() {
        let json = r#"{"vault_password":"pw","max_snapshots":3,
            "repositories":{"docs":{"backup_paths":[]}}}"#;
        let err = VaultConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ResteasyError::Deserialization(_)));
    }

    #[test]
    fn rejects_escaping_repository_name() {
        let json = r#"{"vault_password":"pw","max_snapshots":3,
            "repositories":{"../etc":{"backup_paths":["/tmp"]}}}"#;
        let err = VaultConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ResteasyError::Deserialization(_)));
    }

    #[test]
    fn repository_config_drops_duplicate_paths() {
        let repo = RepositoryConfig::new(["/a", "/b", "/a"]);
        assert_eq!(
            repo.backup_paths,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn effective_max_snapshots_prefers_override() {
        let mut config = sample();
        config.repositories.insert(
            "photos".into(),
            RepositoryConfig::new(["/p"]).with_max_snapshots(12),
        );
        assert_eq!(config.effective_max_snapshots("docs"), Some(5));
        assert_eq!(config.effective_max_snapshots("photos"), Some(12));
        assert_eq!(config.effective_max_snapshots("missing"), None);
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
