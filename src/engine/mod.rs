//! Backup engine boundary.
//!
//! RestEasy never stores backup data itself. Every storage operation is
//! delegated to an [`Engine`], normally the [`Restic`] subprocess wrapper.
//! The vault manager is the only caller.

pub mod restic;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::Result;

pub use restic::Restic;

/// Structured result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// Whether the engine reported success.
    pub success: bool,

    /// Captured stdout followed by stderr.
    pub output: String,

    /// Process exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl EngineOutput {
    /// A successful result with the given output.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            exit_code: Some(0),
        }
    }

    /// A failed result with the given output and exit code.
    pub fn failed(output: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            output: output.into(),
            exit_code,
        }
    }
}

impl fmt::Display for EngineOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "exit code {code}")?,
            None => write!(f, "terminated by signal")?,
        }
        let output = self.output.trim();
        if !output.is_empty() {
            write!(f, ": {output}")?;
        }
        Ok(())
    }
}

/// Operations the vault needs from a content-addressed backup engine.
///
/// Calls are blocking. An `Err` means the engine could not be run at all;
/// an engine that ran and failed returns `Ok` with `success == false`.
pub trait Engine {
    /// Initialize empty storage at `storage`.
    fn init(&self, storage: &Path, password: &str) -> Result<EngineOutput>;

    /// Back up `paths` into the storage at `storage`.
    fn backup(&self, storage: &Path, password: &str, paths: &[PathBuf]) -> Result<EngineOutput>;

    /// Drop all but the `keep_last` most recent snapshots and prune data.
    fn forget(&self, storage: &Path, password: &str, keep_last: u32) -> Result<EngineOutput>;

    /// List the snapshots held in the storage.
    fn snapshots(&self, storage: &Path, password: &str) -> Result<EngineOutput>;

    /// Verify the storage's internal consistency.
    fn check(&self, storage: &Path, password: &str) -> Result<EngineOutput>;
}
