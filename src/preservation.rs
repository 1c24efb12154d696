//! Save-on-failure wrapper around commit message validation.
//!
//! A validation that fails leaves the message in the cache so the next
//! `git commit` can offer it again. A validation that passes clears whatever
//! an earlier failure left behind, so an old message is never resurrected
//! for an unrelated commit.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cache::{CacheError, MessageCache};
use crate::git::{RepositoryIdentity, RepositoryQuery};

/// A commit message bound to the repository and branch it was written for.
///
/// Root and branch are captured once, at construction, so a validator that
/// changes the working directory does not move the cache entry.
#[derive(Debug, Clone)]
pub struct MessagePreservation {
    message: String,
    identity: RepositoryIdentity,
    cache: MessageCache,
}

impl MessagePreservation {
    /// Captures the current repository root and branch for `message`.
    pub fn new(
        message: impl Into<String>,
        query: &dyn RepositoryQuery,
        cache: MessageCache,
    ) -> Self {
        Self::with_identity(message, RepositoryIdentity::detect(query), cache)
    }

    /// Uses an already known root and branch.
    pub fn with_identity(
        message: impl Into<String>,
        identity: RepositoryIdentity,
        cache: MessageCache,
    ) -> Self {
        Self {
            message: message.into(),
            identity,
            cache,
        }
    }

    /// The message being protected.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Root and branch the message is cached under.
    pub fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    /// Runs `validate`, saving the message if it fails and clearing the cache if it passes.
    ///
    /// A validation error is returned unchanged after the message is saved.
    /// If saving fails too, the save error is returned with the validation
    /// error as context.
    pub fn run<T>(&self, validate: impl FnOnce() -> Result<T>) -> Result<T> {
        match validate() {
            Ok(value) => {
                self.clear()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(save_err) = self.preserve() {
                    return Err(anyhow::Error::new(save_err)
                        .context(format!("Commit message not preserved after: {err:#}")));
                }
                Err(err)
            }
        }
    }

    /// Returns a guard that saves the message unless [`PreservationGuard::finish`] is called.
    pub fn guard(&self) -> PreservationGuard<'_> {
        PreservationGuard {
            preservation: self,
            finished: false,
        }
    }

    fn preserve(&self) -> Result<(), CacheError> {
        self.cache.save(&self.message, &self.identity)?;
        info!("Your original commit message:\n\n{}\n", self.message);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.cache
            .remove(&self.identity)
            .context("Failed to clear stale commit message cache")?;
        Ok(())
    }
}

/// Drop-based form of [`MessagePreservation::run`].
///
/// Leaving scope without calling [`finish`](Self::finish), whether by an
/// early `?` return or a panic, saves the message.
#[must_use = "dropping the guard immediately saves the message"]
pub struct PreservationGuard<'a> {
    preservation: &'a MessagePreservation,
    finished: bool,
}

impl PreservationGuard<'_> {
    /// Marks the protected block as successful and clears any stale cache entry.
    pub fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.preservation.clear()
    }
}

impl Drop for PreservationGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.preservation.preserve() {
            warn!("{:#}", anyhow::Error::new(err));
        }
    }
}
