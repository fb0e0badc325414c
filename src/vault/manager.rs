//! Vault lifecycle and repository registry management.
//!
//! `VaultManager` owns a vault root directory and is the only writer of its
//! `config.json` and its `repos/` directory. Every mutating operation
//! touches storage first and only then updates and persists the registry,
//! so a failure part-way never leaves the config describing storage that
//! does not exist (or forgetting storage that does).

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::config::{RepositoryConfig, VaultConfig, DEFAULT_MAX_SNAPSHOTS};
use super::health::{HealthIssue, HealthReport};
use super::name::validate_repository_name;
use super::password::{generate_password, DEFAULT_PASSWORD_LEN};
use crate::engine::{Engine, EngineOutput};
use crate::errors::{ResteasyError, Result};

/// Name of the config file in the vault root.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the directory holding one storage directory per repository.
pub const REPOS_DIRNAME: &str = "repos";

/// Manager for one vault root. Starts unloaded; `create` or `load` it
/// before doing anything else.
pub struct VaultManager<E: Engine> {
    /// Vault root directory.
    root_dir: PathBuf,

    /// Backup engine used for all storage operations.
    engine: E,

    /// Length of passwords generated by `create`.
    password_len: usize,

    /// The loaded config, `None` until `create` or `load` succeeds.
    config: Option<VaultConfig>,
}

impl<E: Engine> VaultManager<E> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an unloaded manager for the vault at `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>, engine: E) -> Self {
        Self {
            root_dir: root_dir.into(),
            engine,
            password_len: DEFAULT_PASSWORD_LEN,
            config: None,
        }
    }

    /// Override the length of generated vault passwords.
    pub fn with_password_len(mut self, len: usize) -> Self {
        self.password_len = len;
        self
    }

    // ------------------------------------------------------------------
    // Vault lifecycle
    // ------------------------------------------------------------------

    /// Create a new vault at the root directory.
    ///
    /// The root directory must not exist yet. The root and `repos/`
    /// directories are created before any config is built; a password is
    /// generated when none is given, and `max_snapshots` defaults to 5.
    pub fn create(&mut self, password: Option<&str>, max_snapshots: Option<u32>) -> Result<()> {
        let max_snapshots = max_snapshots.unwrap_or(DEFAULT_MAX_SNAPSHOTS);
        if max_snapshots == 0 {
            return Err(ResteasyError::InvalidArgument(
                "max_snapshots must be at least 1".into(),
            ));
        }
        if password.is_some_and(str::is_empty) {
            return Err(ResteasyError::InvalidArgument(
                "vault password cannot be empty".into(),
            ));
        }

        // 1. Claim the root directory before anything else.
        if self.root_dir.exists() {
            return Err(ResteasyError::VaultAlreadyExists(self.root_dir.clone()));
        }
        fs::create_dir_all(self.repos_dir())?;

        // 2. Build the empty registry.
        let password = match password {
            Some(pw) => pw.to_string(),
            None => generate_password(self.password_len).to_string(),
        };
        let config = VaultConfig::new(password, max_snapshots);

        // 3. Persist, then mark the vault loaded.
        self.write_config(&config)?;
        self.config = Some(config);

        info!(root = %self.root_dir.display(), max_snapshots, "vault created");
        Ok(())
    }

    /// Load an existing vault from the root directory.
    ///
    /// Checks the directory layout first and fails with `InvalidVault`
    /// before reading anything if a piece is missing.
    pub fn load(&mut self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(ResteasyError::InvalidVault(format!(
                "vault directory {} does not exist",
                self.root_dir.display()
            )));
        }
        let repos_dir = self.repos_dir();
        if !repos_dir.is_dir() {
            return Err(ResteasyError::InvalidVault(format!(
                "repository directory {} is missing",
                repos_dir.display()
            )));
        }
        let config_path = self.config_path();
        if !config_path.is_file() {
            return Err(ResteasyError::InvalidVault(format!(
                "config file {} is missing",
                config_path.display()
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        let config = VaultConfig::from_json(&contents)?;

        debug!(
            root = %self.root_dir.display(),
            repositories = config.repositories.len(),
            "vault loaded"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Write the in-memory config to `config.json`, replacing it entirely.
    pub fn save(&self) -> Result<()> {
        self.write_config(self.loaded()?)
    }

    // ------------------------------------------------------------------
    // Repository operations
    // ------------------------------------------------------------------

    /// Register a new repository and initialize its storage.
    ///
    /// Arguments are checked in order (backup paths given, name valid,
    /// paths exist, name unused) before anything happens. The registry is
    /// only updated after the engine has initialized the storage.
    pub fn add_repository(&mut self, name: &str, repo: RepositoryConfig) -> Result<EngineOutput> {
        let config = self.loaded()?;

        if repo.backup_paths.is_empty() {
            return Err(ResteasyError::InvalidArgument(
                "at least one backup path is required".into(),
            ));
        }
        validate_repository_name(name)?;
        if let Some(missing) = repo.backup_paths.iter().find(|p| !p.exists()) {
            return Err(ResteasyError::InvalidArgument(format!(
                "backup path {} does not exist",
                missing.display()
            )));
        }
        if config.repositories.contains_key(name) {
            return Err(ResteasyError::InvalidArgument(format!(
                "repository '{name}' already exists"
            )));
        }
        if repo.max_snapshots == Some(0) {
            return Err(ResteasyError::InvalidArgument(
                "max_snapshots must be at least 1".into(),
            ));
        }

        let storage = self.storage_path(name);
        info!(repository = name, storage = %storage.display(), "initializing repository storage");
        let output = self.engine.init(&storage, &config.vault_password)?;
        let output = ensure_success(output, || format!("initializing repository '{name}'"))?;

        self.loaded_mut()?.repositories.insert(name.to_string(), repo);
        if let Err(e) = self.save() {
            // Keep memory in line with what is on disk.
            self.loaded_mut()?.repositories.remove(name);
            return Err(e);
        }

        Ok(output)
    }

    /// Run a backup of a registered repository's paths.
    pub fn backup_repository(&self, name: &str) -> Result<EngineOutput> {
        let config = self.loaded()?;
        let repo = registered(config, name)?;
        let storage = self.storage_path(name);

        info!(repository = name, paths = repo.backup_paths.len(), "backing up repository");
        let output = self
            .engine
            .backup(&storage, &config.vault_password, &repo.backup_paths)?;
        ensure_success(output, || format!("backup of repository '{name}'"))
    }

    /// Delete a repository's storage and drop it from the registry.
    ///
    /// Whatever occupies the storage path (directory, file or symlink) is
    /// deleted. The registry entry is only removed once it is gone, so a
    /// failed deletion leaves the vault describing storage that really is
    /// still there.
    pub fn remove_repository(&mut self, name: &str) -> Result<()> {
        registered(self.loaded()?, name)?;

        let storage = self.storage_path(name);
        let delete_failed = |e: std::io::Error| {
            ResteasyError::StorageOperationFailed(format!(
                "failed to delete storage of repository '{name}' at {}: {e}",
                storage.display()
            ))
        };

        // Inspect the entry itself; a dangling symlink still occupies the name.
        match fs::symlink_metadata(&storage) {
            Ok(meta) => {
                info!(repository = name, storage = %storage.display(), "deleting repository storage");
                if meta.is_dir() {
                    fs::remove_dir_all(&storage).map_err(delete_failed)?;
                } else {
                    fs::remove_file(&storage).map_err(delete_failed)?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(repository = name, "repository storage already absent");
            }
            Err(e) => return Err(delete_failed(e)),
        }

        let removed = self.loaded_mut()?.repositories.remove(name);
        if let Err(e) = self.save() {
            if let Some(repo) = removed {
                self.loaded_mut()?.repositories.insert(name.to_string(), repo);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Apply the retention policy to a repository, keeping its most recent
    /// `max_snapshots` snapshots (the repository override, else the vault
    /// default) and pruning the rest.
    pub fn forget_snapshots(&self, name: &str) -> Result<EngineOutput> {
        let config = self.loaded()?;
        let keep_last = config
            .effective_max_snapshots(name)
            .ok_or_else(|| ResteasyError::RepositoryNotFound(name.to_string()))?;
        let storage = self.storage_path(name);

        info!(repository = name, keep_last, "applying retention policy");
        let output = self
            .engine
            .forget(&storage, &config.vault_password, keep_last)?;
        ensure_success(output, || format!("forgetting snapshots of repository '{name}'"))
    }

    /// List the snapshots stored for a repository.
    pub fn list_snapshots(&self, name: &str) -> Result<EngineOutput> {
        let config = self.loaded()?;
        registered(config, name)?;
        let storage = self.storage_path(name);

        let output = self.engine.snapshots(&storage, &config.vault_password)?;
        ensure_success(output, || format!("listing snapshots of repository '{name}'"))
    }

    /// Compare the registry with the storage directories under `repos/`.
    ///
    /// With `deep`, also runs the engine's consistency check on every
    /// registered repository whose storage is present. Never modifies the
    /// vault.
    pub fn verify_health(&self, deep: bool) -> Result<HealthReport> {
        let config = self.loaded()?;
        let repos_dir = self.repos_dir();
        let mut report = HealthReport {
            checked: config.repositories.len(),
            issues: Vec::new(),
        };

        let mut on_disk = BTreeSet::new();
        match fs::read_dir(&repos_dir) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if entry.file_type()?.is_dir() {
                        on_disk.insert(name);
                    } else {
                        report.issues.push(HealthIssue::StrayEntry(entry.path()));
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.issues.push(HealthIssue::MissingReposDir(repos_dir));
            }
            Err(e) => return Err(e.into()),
        }

        for name in config.repositories.keys() {
            if !on_disk.contains(name) {
                report.issues.push(HealthIssue::MissingStorage(name.clone()));
            }
        }
        for name in &on_disk {
            if !config.repositories.contains_key(name) {
                report
                    .issues
                    .push(HealthIssue::UnregisteredStorage(name.clone()));
            }
        }

        if deep {
            for name in config.repositories.keys().filter(|n| on_disk.contains(*n)) {
                let output = self
                    .engine
                    .check(&self.storage_path(name), &config.vault_password)?;
                if !output.success {
                    report.issues.push(HealthIssue::EngineCheckFailed {
                        name: name.clone(),
                        output,
                    });
                }
            }
        }

        if !report.is_healthy() {
            warn!(issues = report.issues.len(), "vault health check found issues");
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns `true` once `create` or `load` has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// The loaded vault config.
    pub fn config(&self) -> Result<&VaultConfig> {
        self.loaded()
    }

    /// Config of a registered repository.
    pub fn repository(&self, name: &str) -> Result<&RepositoryConfig> {
        registered(self.loaded()?, name)
    }

    /// Names of all registered repositories, sorted.
    pub fn repository_names(&self) -> Result<Vec<String>> {
        Ok(self.loaded()?.repositories.keys().cloned().collect())
    }

    /// The vault root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// `<root>/repos`
    pub fn repos_dir(&self) -> PathBuf {
        self.root_dir.join(REPOS_DIRNAME)
    }

    /// `<root>/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.root_dir.join(CONFIG_FILENAME)
    }

    /// Storage location of the repository called `name`.
    pub fn storage_path(&self, name: &str) -> PathBuf {
        self.repos_dir().join(name)
    }

    /// The engine this manager delegates to.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn loaded(&self) -> Result<&VaultConfig> {
        self.config.as_ref().ok_or(ResteasyError::VaultNotLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut VaultConfig> {
        self.config.as_mut().ok_or(ResteasyError::VaultNotLoaded)
    }

    /// Write `config` to disk via temp file + rename in the vault root.
    fn write_config(&self, config: &VaultConfig) -> Result<()> {
        let json = config.to_json()?;
        let path = self.config_path();
        let tmp_path = self.root_dir.join(format!(".{CONFIG_FILENAME}.tmp"));

        if let Err(e) = write_private(&tmp_path, json.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &path))
        {
            // Never leave a stray copy of the password behind.
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!(path = %path.display(), "vault config saved");
        Ok(())
    }
}

/// Create `path` owner-only and write `contents` to it.
///
/// On unix the mode is set at creation, so the bytes are never readable
/// by other users. A leftover file from an interrupted write is replaced
/// rather than reused, since its mode cannot be trusted.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)?
    };

    #[cfg(not(unix))]
    let mut file = fs::File::create(path)?;

    file.write_all(contents)?;
    file.sync_all()
}

/// Look up a registered repository or fail with `RepositoryNotFound`.
fn registered<'a>(config: &'a VaultConfig, name: &str) -> Result<&'a RepositoryConfig> {
    config
        .repositories
        .get(name)
        .ok_or_else(|| ResteasyError::RepositoryNotFound(name.to_string()))
}

/// Turn an engine-reported failure into `StorageOperationFailed`.
fn ensure_success(output: EngineOutput, what: impl FnOnce() -> String) -> Result<EngineOutput> {
    if output.success {
        Ok(output)
    } else {
        warn!(exit_code = ?output.exit_code, "engine reported failure");
        Err(ResteasyError::StorageOperationFailed(format!(
            "{} failed with {output}",
            what()
        )))
    }
}
