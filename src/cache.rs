//! Commit message cache.
//!
//! One plain text file per (repository root, branch) under the user cache
//! directory:
//!
//! ```text
//! <cache_root>/precommit-message-preservation/<repo-basename>-<hash8>/<branch>.txt
//! ```
//!
//! The hash is the first eight hex characters of the SHA-256 of the absolute
//! root path, so two checkouts named alike never share a directory.

pub mod error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

pub use error::CacheError;

use crate::git::{
    is_safe_branch, normalize_root, GitRepository, RepositoryIdentity, UNKNOWN_BRANCH,
};
use crate::message::sanitize;
use crate::utils::settings::get_env_var;

/// Directory under the cache root that holds every cached message.
pub const CACHE_DIR_NAME: &str = "precommit-message-preservation";

/// Number of hex characters of the root hash used in directory names.
const ROOT_HASH_LEN: usize = 8;

/// Returns the user cache root: `$XDG_CACHE_HOME`, else `$HOME/.cache`.
pub fn cache_root() -> Result<PathBuf, CacheError> {
    if let Ok(xdg_cache_home) = get_env_var("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(xdg_cache_home));
    }

    let home = get_env_var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .ok_or(CacheError::NoCacheRoot)?;

    Ok(home.join(".cache"))
}

/// Location of cached commit messages.
#[derive(Debug, Clone)]
pub struct MessageCache {
    dir: PathBuf,
}

impl MessageCache {
    /// Creates a cache below the given cache root.
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_root.as_ref().join(CACHE_DIR_NAME),
        }
    }

    /// Creates a cache below the cache root configured in the environment.
    pub fn from_env() -> Result<Self, CacheError> {
        Ok(Self::new(cache_root()?))
    }

    /// Returns the cache file for a repository and branch.
    ///
    /// A branch that could escape the repository's directory is filed under
    /// [`UNKNOWN_BRANCH`].
    pub fn path_for(&self, identity: &RepositoryIdentity) -> PathBuf {
        let branch = if is_safe_branch(&identity.branch) {
            identity.branch.as_str()
        } else {
            warn!("Ignoring unusable branch name {:?}", identity.branch);
            UNKNOWN_BRANCH
        };
        self.dir
            .join(repository_dir_name(&identity.root))
            .join(format!("{branch}.txt"))
    }

    /// Returns the cached message, or an empty string when there is none.
    pub fn read(&self, identity: &RepositoryIdentity) -> String {
        let path = self.path_for(identity);
        match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                debug!("Ignoring unreadable message cache {}: {err}", path.display());
                String::new()
            }
        }
    }

    /// Sanitizes and stores a message, replacing any earlier one.
    pub fn save(
        &self,
        message: &str,
        identity: &RepositoryIdentity,
    ) -> Result<PathBuf, CacheError> {
        let path = self.path_for(identity);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        info!("Saving your commit message to {}", path.display());
        info!("It will be used automatically on your next commit");

        fs::write(&path, sanitize(message)).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Deletes the cached message. Returns whether a file was removed.
    pub fn remove(&self, identity: &RepositoryIdentity) -> Result<bool, CacheError> {
        let path = self.path_for(identity);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed commit message cache file at {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Remove { path, source }),
        }
    }
}

/// `<basename>-<hash8>` for a repository root.
fn repository_dir_name(root: &Path) -> String {
    let root = normalize_root(root);
    let basename = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = hex::encode(Sha256::digest(root.to_string_lossy().as_bytes()));
    format!("{basename}-{}", &digest[..ROOT_HASH_LEN])
}

fn resolve_identity(root: Option<&Path>, branch: Option<&str>) -> RepositoryIdentity {
    RepositoryIdentity::resolve(
        root.map(Path::to_path_buf),
        branch.map(str::to_string),
        &GitRepository::open(),
    )
}

/// Returns the cache file path, detecting root and branch when not given.
pub fn cache_file_path(root: Option<&Path>, branch: Option<&str>) -> Result<PathBuf, CacheError> {
    let identity = resolve_identity(root, branch);
    Ok(MessageCache::from_env()?.path_for(&identity))
}

/// Returns the last rejected message for a repository and branch, or an empty string.
pub fn get_cached_message(root: Option<&Path>, branch: Option<&str>) -> String {
    let identity = resolve_identity(root, branch);
    match MessageCache::from_env() {
        Ok(cache) => cache.read(&identity),
        Err(err) => {
            warn!("{err}");
            String::new()
        }
    }
}

/// Caches a message for a repository and branch.
pub fn save_commit_message(
    message: &str,
    root: Option<&Path>,
    branch: Option<&str>,
) -> Result<PathBuf, CacheError> {
    let identity = resolve_identity(root, branch);
    MessageCache::from_env()?.save(message, &identity)
}

/// Removes the cached message for a repository and branch, if any.
pub fn remove_message_cache(
    root: Option<&Path>,
    branch: Option<&str>,
) -> Result<bool, CacheError> {
    let identity = resolve_identity(root, branch);
    MessageCache::from_env()?.remove(&identity)
}
