//! Vault health report types.
//!
//! Produced by [`VaultManager::verify_health`](super::VaultManager::verify_health),
//! which compares the registry against the directories under `repos/`.

use std::fmt;
use std::path::PathBuf;

use crate::engine::EngineOutput;

/// One inconsistency found by a health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthIssue {
    /// The `repos/` directory itself is gone.
    MissingReposDir(PathBuf),

    /// A registered repository has no storage directory.
    MissingStorage(String),

    /// A storage directory exists that no registry entry refers to.
    UnregisteredStorage(String),

    /// Something other than a directory sits in `repos/`.
    StrayEntry(PathBuf),

    /// The engine's own consistency check failed for a repository.
    EngineCheckFailed { name: String, output: EngineOutput },
}

impl fmt::Display for HealthIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReposDir(path) => {
                write!(f, "repository directory {} is missing", path.display())
            }
            Self::MissingStorage(name) => {
                write!(f, "repository '{name}' is registered but has no storage")
            }
            Self::UnregisteredStorage(name) => {
                write!(f, "storage '{name}' exists but is not registered")
            }
            Self::StrayEntry(path) => {
                write!(f, "unexpected non-directory entry {}", path.display())
            }
            Self::EngineCheckFailed { name, output } => {
                write!(f, "engine check failed for '{name}' ({output})")
            }
        }
    }
}

/// Result of a health check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Number of registered repositories inspected.
    pub checked: usize,

    /// Inconsistencies found, in discovery order.
    pub issues: Vec<HealthIssue>,
}

impl HealthReport {
    /// `true` if no issue was found.
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}
