//! CLI interface for precommit-message-preservation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::git::{is_safe_branch, GitRepository, RepositoryIdentity};

pub mod cache;
pub mod check;
pub mod restore;

/// precommit-message-preservation: keeps rejected commit messages for the next attempt.
#[derive(Parser)]
#[command(name = "precommit-message-preservation")]
#[command(
    about = "Keeps a rejected commit message so the next commit can reuse it",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Runs a commit message validator, saving the message if it fails (commit-msg hook).
    Check(check::CheckCommand),
    /// Puts a previously saved message back into the commit message file (prepare-commit-msg hook).
    Restore(restore::RestoreCommand),
    /// Saves a commit message file to the cache.
    Save(cache::SaveCommand),
    /// Prints the cached message.
    Show(cache::ShowCommand),
    /// Deletes the cached message.
    Clear(cache::ClearCommand),
    /// Prints the cache file path.
    Path(cache::PathCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check(check_cmd) => check_cmd.execute(),
            Commands::Restore(restore_cmd) => restore_cmd.execute(),
            Commands::Save(save_cmd) => save_cmd.execute(),
            Commands::Show(show_cmd) => show_cmd.execute(),
            Commands::Clear(clear_cmd) => clear_cmd.execute(),
            Commands::Path(path_cmd) => path_cmd.execute(),
        }
    }
}

/// Repository and branch selection shared by the cache commands.
#[derive(Parser, Debug, Default)]
pub struct TargetArgs {
    /// Repository root (detected from the current directory by default).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Branch name (detected from HEAD by default).
    #[arg(long, value_name = "BRANCH", value_parser = parse_branch)]
    pub branch: Option<String>,
}

fn parse_branch(branch: &str) -> std::result::Result<String, String> {
    if is_safe_branch(branch) {
        Ok(branch.to_string())
    } else {
        Err("branch must be non-empty and free of `.`, `..` and empty path segments".to_string())
    }
}

impl TargetArgs {
    /// Resolves the identity, detecting whatever was not given. The root is normalized.
    pub fn identity(&self) -> Result<RepositoryIdentity> {
        let root = self
            .root
            .as_deref()
            .map(|root| {
                std::path::absolute(root)
                    .with_context(|| format!("Invalid repository root: {}", root.display()))
            })
            .transpose()?;

        Ok(RepositoryIdentity::resolve(
            root,
            self.branch.clone(),
            &GitRepository::open(),
        ))
    }
}
