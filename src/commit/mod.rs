//! Commit message synthesis and dispatch.

pub mod changeset;
pub mod classify;
pub mod dispatch;
pub mod message;
pub mod pipeline;

pub use changeset::{ChangeProfile, ChangeSet, FALLBACK_MODULE};
pub use classify::{Category, CommitType, categorize, classify};
pub use dispatch::{CommitReport, dispatch_commit, subject_line};
pub use message::{CandidateMessage, MessageSource};
pub use pipeline::{Synthesis, synthesize};
