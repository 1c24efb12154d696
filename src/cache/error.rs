//! Message cache errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failures writing or removing a cached commit message.
///
/// Reads never fail; a missing or unreadable cache file is an empty message.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache directory could not be created.
    #[error("Failed to create cache directory {}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cache file could not be written.
    #[error("Failed to write commit message cache {}", path.display())]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The cache file exists but could not be removed.
    #[error("Failed to remove commit message cache {}", path.display())]
    Remove {
        /// File that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No cache root could be determined from the environment.
    #[error("Cannot determine cache directory: set XDG_CACHE_HOME or HOME")]
    NoCacheRoot,
}
