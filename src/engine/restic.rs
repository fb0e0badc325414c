//! restic subprocess wrapper.
//!
//! Each call runs `restic -r <storage> <subcommand> ...` to completion and
//! captures its output. The password is handed over through the
//! `RESTIC_PASSWORD` environment variable so it never shows up in the
//! process list.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Engine, EngineOutput};
use crate::errors::{ResteasyError, Result};

/// Default name of the restic binary, resolved through `PATH`.
pub const DEFAULT_BINARY: &str = "restic";

/// Variables restic consults for the password or repository. Cleared so
/// the values RestEasy passes always win.
const OVERRIDDEN_ENV: &[&str] = &[
    "RESTIC_PASSWORD_FILE",
    "RESTIC_PASSWORD_COMMAND",
    "RESTIC_REPOSITORY",
    "RESTIC_REPOSITORY_FILE",
];

/// [`Engine`] implementation backed by the restic CLI.
#[derive(Debug, Clone)]
pub struct Restic {
    binary: PathBuf,
}

impl Restic {
    /// Use the restic binary at `binary` (a bare name is looked up in `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Path of the binary this wrapper runs.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn run(&self, storage: &Path, password: &str, args: Vec<OsString>) -> Result<EngineOutput> {
        debug!(
            binary = %self.binary.display(),
            storage = %storage.display(),
            args = ?args,
            "running restic"
        );

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-r").arg(storage).args(&args);
        for var in OVERRIDDEN_ENV {
            cmd.env_remove(var);
        }
        cmd.env("RESTIC_PASSWORD", password).stdin(Stdio::null());

        let output = cmd.output().map_err(|e| {
            ResteasyError::StorageOperationFailed(format!(
                "failed to run {}: {e}",
                self.binary.display()
            ))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = combine_output(&stdout, &stderr);

        debug!(exit_code = ?output.status.code(), "restic finished");

        Ok(EngineOutput {
            success: output.status.success(),
            output: combined,
            exit_code: output.status.code(),
        })
    }
}

impl Default for Restic {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl Engine for Restic {
    fn init(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.run(storage, password, vec!["init".into()])
    }

    fn backup(&self, storage: &Path, password: &str, paths: &[PathBuf]) -> Result<EngineOutput> {
        let mut args: Vec<OsString> = vec!["backup".into(), "--".into()];
        args.extend(paths.iter().map(|p| p.as_os_str().to_os_string()));
        self.run(storage, password, args)
    }

    fn forget(&self, storage: &Path, password: &str, keep_last: u32) -> Result<EngineOutput> {
        self.run(
            storage,
            password,
            vec![
                "forget".into(),
                "--keep-last".into(),
                keep_last.to_string().into(),
                "--prune".into(),
            ],
        )
    }

    fn snapshots(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.run(storage, password, vec!["snapshots".into()])
    }

    fn check(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.run(storage, password, vec!["check".into()])
    }
}

/// Join stdout and stderr, dropping trailing newlines from each.
fn combine_output(stdout: &str, stderr: &str) -> String {
    let stdout = stdout.trim_end();
    let stderr = stderr.trim_end();
    match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => format!("{stdout}\n{stderr}"),
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (true, true) => String::new(),
    }
}
