//! Shared test helpers: a recording stand-in for restic.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use resteasy::engine::{Engine, EngineOutput};
use resteasy::errors::Result;

/// One recorded engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init(PathBuf),
    Backup(PathBuf, Vec<PathBuf>),
    Forget(PathBuf, u32),
    Snapshots(PathBuf),
    Check(PathBuf),
}

/// Engine that records calls and fakes restic's on-disk effects.
///
/// `init` creates the storage directory the way restic does; the
/// `fail_*` switches make the matching call report failure.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: RefCell<Vec<Call>>,
    pub passwords: RefCell<Vec<String>>,
    pub fail_init: Cell<bool>,
    pub fail_backup: Cell<bool>,
    pub fail_check: Cell<bool>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call, password: &str) {
        self.calls.borrow_mut().push(call);
        self.passwords.borrow_mut().push(password.to_string());
    }
}

impl Engine for FakeEngine {
    fn init(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.record(Call::Init(storage.to_path_buf()), password);
        if self.fail_init.get() {
            return Ok(EngineOutput::failed(
                "Fatal: create repository failed",
                Some(1),
            ));
        }
        fs::create_dir_all(storage.join("data"))?;
        fs::write(storage.join("config"), b"fake restic config")?;
        Ok(EngineOutput::ok(format!(
            "created restic repository at {}",
            storage.display()
        )))
    }

    fn backup(&self, storage: &Path, password: &str, paths: &[PathBuf]) -> Result<EngineOutput> {
        self.record(Call::Backup(storage.to_path_buf(), paths.to_vec()), password);
        if self.fail_backup.get() {
            return Ok(EngineOutput::failed("Fatal: unable to open repository", Some(1)));
        }
        Ok(EngineOutput::ok("snapshot 1a2b3c4d saved"))
    }

    fn forget(&self, storage: &Path, password: &str, keep_last: u32) -> Result<EngineOutput> {
        self.record(Call::Forget(storage.to_path_buf(), keep_last), password);
        Ok(EngineOutput::ok(format!("keep {keep_last} snapshots")))
    }

    fn snapshots(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.record(Call::Snapshots(storage.to_path_buf()), password);
        Ok(EngineOutput::ok("ID        Time\n1a2b3c4d  2026-01-01 10:00:00"))
    }

    fn check(&self, storage: &Path, password: &str) -> Result<EngineOutput> {
        self.record(Call::Check(storage.to_path_buf()), password);
        if self.fail_check.get() {
            return Ok(EngineOutput::failed("error: pack 0123 damaged", Some(1)));
        }
        Ok(EngineOutput::ok("no errors were found"))
    }
}
