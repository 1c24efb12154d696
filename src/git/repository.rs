//! Git repository queries

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use git2::Repository;

/// Prefix of local branch references.
const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// The two questions asked of the version control system.
///
/// Kept behind a trait so callers and tests can substitute their own answers.
pub trait RepositoryQuery {
    /// Name of the checked out branch.
    fn current_branch(&self) -> Result<String>;

    /// Path of the repository metadata directory (`.git`).
    fn metadata_dir(&self) -> Result<PathBuf>;
}

/// Git repository located by walking up from a starting directory
pub struct GitRepository {
    start: PathBuf,
}

impl GitRepository {
    /// Discover the repository containing the current directory
    pub fn open() -> Self {
        Self::open_at(".")
    }

    /// Discover the repository containing the specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            start: path.as_ref().to_path_buf(),
        }
    }

    fn discover(&self) -> Result<Repository> {
        Repository::discover(&self.start)
            .with_context(|| format!("Not in a git repository: {}", self.start.display()))
    }
}

impl RepositoryQuery for GitRepository {
    /// Reads HEAD's symbolic target, so an unborn branch still has a name.
    fn current_branch(&self) -> Result<String> {
        let repo = self.discover()?;
        let head = repo
            .find_reference("HEAD")
            .context("Failed to get HEAD reference")?;

        let Some(target) = head.symbolic_target() else {
            bail!("Repository is in detached HEAD state");
        };

        match target.strip_prefix(LOCAL_BRANCH_PREFIX) {
            Some(name) => Ok(name.trim().to_string()),
            None => bail!("HEAD points outside local branches: {}", target),
        }
    }

    /// Returns git's own directory for this checkout.
    ///
    /// In a linked worktree this is `.git/worktrees/<name>` of the main
    /// repository, and in a submodule `.git/modules/<name>` of the
    /// superproject, so its parent is not the working tree there. Every
    /// linked worktree therefore shares one cache directory per branch.
    fn metadata_dir(&self) -> Result<PathBuf> {
        let repo = self.discover()?;
        Ok(repo.path().to_path_buf())
    }
}
