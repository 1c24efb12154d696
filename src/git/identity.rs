//! Repository identity detection with fallbacks.

use std::env;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::git::RepositoryQuery;

/// Branch name used when the checked out branch cannot be determined.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// The (repository root, branch) pair a cached message belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryIdentity {
    /// Absolute path of the repository root.
    pub root: PathBuf,
    /// Checked out branch name.
    pub branch: String,
}

impl RepositoryIdentity {
    /// Creates an identity from known values. The root is normalized lexically.
    pub fn new(root: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            root: normalize_root(&root.into()),
            branch: branch.into(),
        }
    }

    /// Detects both root and branch.
    pub fn detect(query: &dyn RepositoryQuery) -> Self {
        Self::resolve(None, None, query)
    }

    /// Fills in whichever of root and branch was not given.
    pub fn resolve(
        root: Option<PathBuf>,
        branch: Option<String>,
        query: &dyn RepositoryQuery,
    ) -> Self {
        let root = root.unwrap_or_else(|| detect_root(query));
        let branch = branch.unwrap_or_else(|| detect_branch(query));
        Self::new(root, branch)
    }
}

/// Drops `.` components and trailing separators and resolves `..` without touching the filesystem.
///
/// `/work/project/`, `/work/project/sub/..` and `/work/project` all become
/// `/work/project`, so they share one cache entry.
pub fn normalize_root(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => {
                    normalized.push(Component::ParentDir);
                }
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Whether `branch` can name a cache file below the repository's cache directory.
///
/// Rejects empty names and anything with `.`/`..` segments or a leading `/`.
pub fn is_safe_branch(branch: &str) -> bool {
    !branch.is_empty()
        && Path::new(branch)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        && !branch.split('/').any(|segment| segment.is_empty() || segment == ".")
}

/// Returns the repository root, or the current directory outside a repository.
pub fn detect_root(query: &dyn RepositoryQuery) -> PathBuf {
    match query.metadata_dir() {
        Ok(metadata_dir) => {
            let parent = metadata_dir.parent().unwrap_or(Path::new(""));
            normalize_root(&absolute(parent))
        }
        Err(err) => {
            warn!("Failed to locate the git directory: {err:#}");
            normalize_root(&absolute(Path::new("")))
        }
    }
}

/// Returns the checked out branch, or [`UNKNOWN_BRANCH`].
pub fn detect_branch(query: &dyn RepositoryQuery) -> String {
    match query.current_branch() {
        Ok(branch) if is_safe_branch(branch.trim()) => branch.trim().to_string(),
        Ok(branch) if branch.trim().is_empty() => {
            warn!("Failed to get the git branch: no branch is checked out");
            UNKNOWN_BRANCH.to_string()
        }
        Ok(branch) => {
            warn!("Ignoring unusable branch name {branch:?}");
            UNKNOWN_BRANCH.to_string()
        }
        Err(err) => {
            warn!("Failed to get the git branch: {err:#}");
            UNKNOWN_BRANCH.to_string()
        }
    }
}

/// Resolves `path` against the current directory; an empty path is the current directory.
fn absolute(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    std::path::absolute(path)
        .or_else(|_| env::current_dir().map(|cwd| cwd.join(path)))
        .unwrap_or_else(|_| path.to_path_buf())
}
