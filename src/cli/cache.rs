//! Direct cache commands: save, show, clear and path.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cache::MessageCache;
use crate::cli::TargetArgs;

/// Save command options.
#[derive(Parser)]
pub struct SaveCommand {
    /// File holding the commit message to save.
    #[arg(value_name = "MESSAGE_FILE")]
    pub message_file: PathBuf,

    /// Repository and branch to save for.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Repository and branch to show.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Clear command options.
#[derive(Parser)]
pub struct ClearCommand {
    /// Repository and branch to clear.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Path command options.
#[derive(Parser)]
pub struct PathCommand {
    /// Repository and branch to locate.
    #[command(flatten)]
    pub target: TargetArgs,
}

impl SaveCommand {
    /// Executes the save command.
    pub fn execute(self) -> Result<()> {
        let message = fs::read_to_string(&self.message_file).with_context(|| {
            format!(
                "Failed to read commit message file: {}",
                self.message_file.display()
            )
        })?;

        let identity = self.target.identity()?;
        let path = MessageCache::from_env()?.save(&message, &identity)?;
        println!("{}", path.display());
        Ok(())
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let identity = self.target.identity()?;
        print!("{}", MessageCache::from_env()?.read(&identity));
        Ok(())
    }
}

impl ClearCommand {
    /// Executes the clear command.
    pub fn execute(self) -> Result<()> {
        let identity = self.target.identity()?;
        let cache = MessageCache::from_env()?;
        if cache.remove(&identity)? {
            println!("🗑️  Removed {}", cache.path_for(&identity).display());
        } else {
            println!("No cached message for {}", identity.branch);
        }
        Ok(())
    }
}

impl PathCommand {
    /// Executes the path command.
    pub fn execute(self) -> Result<()> {
        let identity = self.target.identity()?;
        println!("{}", MessageCache::from_env()?.path_for(&identity).display());
        Ok(())
    }
}
