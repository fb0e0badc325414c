use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in RestEasy.
#[derive(Debug, Error)]
pub enum ResteasyError {
    // --- Vault lifecycle errors ---
    #[error("Vault is not loaded; create or load it first")]
    VaultNotLoaded,

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault: {0}")]
    InvalidVault(String),

    #[error("Failed to read vault config: {0}")]
    Deserialization(String),

    // --- Repository errors ---
    #[error("Repository '{0}' not found")]
    RepositoryNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage operation failed: {0}")]
    StorageOperationFailed(String),

    // --- Config errors ---
    #[error("Settings file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for RestEasy results.
pub type Result<T> = std::result::Result<T, ResteasyError>;
