//! Git repository detection.

pub mod identity;
pub mod repository;

pub use identity::{
    detect_branch, detect_root, is_safe_branch, normalize_root, RepositoryIdentity, UNKNOWN_BRANCH,
};
pub use repository::{GitRepository, RepositoryQuery};
