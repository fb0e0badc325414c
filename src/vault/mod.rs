//! Vault module: repository registry and its on-disk layout.
//!
//! This module provides:
//! - Repository name validation (`name`)
//! - The persisted `VaultConfig` / `RepositoryConfig` model (`config`)
//! - Password generation for new vaults (`password`)
//! - Health report types (`health`)
//! - `VaultManager`, which creates, loads and mutates a vault (`manager`)

pub mod config;
pub mod health;
pub mod manager;
pub mod name;
pub mod password;

// Re-export the most commonly used items.
pub use config::{RepositoryConfig, VaultConfig, DEFAULT_MAX_SNAPSHOTS};
pub use health::{HealthIssue, HealthReport};
pub use manager::{VaultManager, CONFIG_FILENAME, REPOS_DIRNAME};
pub use name::{is_valid_repository_name, validate_repository_name};
