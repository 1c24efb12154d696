//! Shared test utilities.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

use anyhow::{anyhow, Result};

use crate::git::RepositoryQuery;

/// Global lock so tests touching the process environment don't interfere.
static ENV_TEST_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Sets environment variables for the duration of a test and restores them on drop.
pub(crate) struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
    vars: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub(crate) fn new() -> Self {
        let lock = ENV_TEST_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Self {
            _lock: lock,
            vars: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        env::set_var(key, value);
    }

    pub(crate) fn remove(&mut self, key: &str) {
        let original = env::var(key).ok();
        self.vars.push((key.to_string(), original));
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Restore in reverse order
        for (key, original_value) in self.vars.drain(..).rev() {
            match original_value {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

/// Repository query with canned answers.
///
/// `None` makes the corresponding query fail the way a missing repository would.
pub(crate) struct FakeRepository {
    pub(crate) metadata_dir: Option<PathBuf>,
    pub(crate) branch: Option<String>,
}

impl FakeRepository {
    pub(crate) fn new(metadata_dir: impl Into<PathBuf>, branch: &str) -> Self {
        Self {
            metadata_dir: Some(metadata_dir.into()),
            branch: Some(branch.to_string()),
        }
    }

    pub(crate) fn broken() -> Self {
        Self {
            metadata_dir: None,
            branch: None,
        }
    }
}

impl RepositoryQuery for FakeRepository {
    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| anyhow!("fatal: not a git repository"))
    }

    fn metadata_dir(&self) -> Result<PathBuf> {
        self.metadata_dir
            .clone()
            .ok_or_else(|| anyhow!("fatal: not a git repository"))
    }
}
