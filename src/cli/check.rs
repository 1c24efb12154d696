//! Check command: runs a validator with save-on-failure protection.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use clap::Parser;
use thiserror::Error;
use tracing::debug;

use crate::cache::MessageCache;
use crate::git::{GitRepository, RepositoryQuery};
use crate::preservation::MessagePreservation;

/// Check command options.
#[derive(Parser)]
pub struct CheckCommand {
    /// File holding the commit message (as passed to the commit-msg hook).
    #[arg(value_name = "MESSAGE_FILE")]
    pub message_file: PathBuf,

    /// Validator command; the message file path is appended as its last argument.
    #[arg(last = true, required = true, value_name = "VALIDATOR")]
    pub validator: Vec<String>,
}

/// Validator outcomes that count as a rejected message.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The validator could not be started.
    #[error("Failed to run validator `{command}`")]
    Spawn {
        /// Program that failed to start.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The validator rejected the message.
    #[error("Validator `{command}` rejected the commit message ({status})")]
    Rejected {
        /// Program that rejected the message.
        command: String,
        /// Its exit status.
        status: ExitStatus,
    },
}

impl CheckCommand {
    /// Executes the check command.
    pub fn execute(self) -> Result<()> {
        let cache = MessageCache::from_env()?;
        self.execute_with(cache, &GitRepository::open())
    }

    /// Executes against a given cache and repository.
    pub fn execute_with(&self, cache: MessageCache, query: &dyn RepositoryQuery) -> Result<()> {
        let message = fs::read_to_string(&self.message_file).with_context(|| {
            format!(
                "Failed to read commit message file: {}",
                self.message_file.display()
            )
        })?;

        let preservation = MessagePreservation::new(message, query, cache);
        preservation.run(|| Ok(run_validator(&self.validator, &self.message_file)?))
    }
}

fn run_validator(validator: &[String], message_file: &Path) -> Result<(), ValidationError> {
    let (program, args) = validator.split_first().ok_or_else(|| ValidationError::Spawn {
        command: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty validator"),
    })?;

    debug!("Running validator {program} {args:?} {}", message_file.display());
    let status = Command::new(program)
        .args(args)
        .arg(message_file)
        .status()
        .map_err(|source| ValidationError::Spawn {
            command: program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ValidationError::Rejected {
            command: program.clone(),
            status,
        });
    }

    Ok(())
}
