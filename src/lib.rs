//! # precommit-message-preservation
//!
//! Keeps a commit message that failed validation so the author does not
//! have to retype it.
//!
//! ## Features
//!
//! - Caches rejected messages per repository and branch
//! - Strips comment lines and the `git commit --verbose` diff before saving
//! - Restores the cached message on the next commit attempt
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use precommit_message_preservation::{GitRepository, MessageCache, MessagePreservation};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cache = MessageCache::from_env()?;
//! let preservation = MessagePreservation::new("feat: add x", &GitRepository::open(), cache);
//! preservation.run(|| {
//!     // validate the message; an error here saves it for next time
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cache;
pub mod cli;
pub mod git;
pub mod message;
pub mod preservation;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::cache::{
    cache_file_path, get_cached_message, remove_message_cache, save_commit_message, CacheError,
    MessageCache,
};
pub use crate::cli::Cli;
pub use crate::git::{GitRepository, RepositoryIdentity, RepositoryQuery};
pub use crate::message::{sanitize, strip_comment_lines, strip_verbose_section, VERBOSE_MARKER};
pub use crate::preservation::{MessagePreservation, PreservationGuard};

/// The current version of precommit-message-preservation.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
