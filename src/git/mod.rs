//! Git operations using git2-rs.

pub mod change;
pub mod workspace;

pub use change::{ChangeKind, StagedChange, normalize};
pub use workspace::{GitWorkspace, MAX_DIFF_LENGTH, StagedDiff, VersionControl};
