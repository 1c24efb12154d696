//! Restore command: prepare-commit-msg hook that reuses a saved message.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::cache::MessageCache;
use crate::git::{GitRepository, RepositoryIdentity, RepositoryQuery};

/// Commit message source git reports when only the template is present.
const TEMPLATE_SOURCE: &str = "template";

/// Restore command options.
#[derive(Parser)]
pub struct RestoreCommand {
    /// File holding the commit message being prepared.
    #[arg(value_name = "MESSAGE_FILE")]
    pub message_file: PathBuf,

    /// Source of the message: message, template, merge, squash or commit.
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Commit object name, given with `commit` sources.
    #[arg(value_name = "SHA")]
    pub sha: Option<String>,
}

impl RestoreCommand {
    /// Executes the restore command.
    pub fn execute(self) -> Result<()> {
        let cache = MessageCache::from_env()?;
        self.execute_with(&cache, &GitRepository::open())?;
        Ok(())
    }

    /// Executes against a given cache and repository.
    ///
    /// Returns whether a cached message was written into the message file.
    pub fn execute_with(&self, cache: &MessageCache, query: &dyn RepositoryQuery) -> Result<bool> {
        if let Some(source) = self.source.as_deref() {
            if source != TEMPLATE_SOURCE {
                debug!("Leaving {source} commit message untouched");
                return Ok(false);
            }
        }

        let identity = RepositoryIdentity::detect(query);
        let cached = cache.read(&identity);
        if cached.trim().is_empty() {
            return Ok(false);
        }

        let existing = match fs::read_to_string(&self.message_file) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!(
                        "Failed to read commit message file: {}",
                        self.message_file.display()
                    )
                })
            }
        };

        let separator = if cached.ends_with('\n') { "" } else { "\n" };
        let restored = format!("{cached}{separator}{existing}");
        fs::write(&self.message_file, restored).with_context(|| {
            format!(
                "Failed to write commit message file: {}",
                self.message_file.display()
            )
        })?;

        info!(
            "Restored your previous commit message from {}",
            cache.path_for(&identity).display()
        );
        Ok(true)
    }
}
