//! cmit - A CLI tool that drafts conventional commit messages for staged changes.
//!
//! # Overview
//!
//! cmit reads the staged changes of a git working tree and drafts a
//! conventional commit message for them. When an AI provider is configured
//! the draft comes from a remote model, otherwise from a deterministic
//! rule-based classifier. The draft is opened in the user's editor and the
//! saved result is committed.

pub mod commit;
pub mod config;
pub mod editor;
pub mod error;
pub mod generate;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{CandidateMessage, ChangeSet, CommitReport, CommitType, MessageSource, Synthesis};
pub use config::{GenerationOptions, Settings};
pub use editor::{EditOutcome, SessionSlot};
pub use error::{AiError, CommitError, ConfigError, GenerateError, GitError};
pub use git::{ChangeKind, StagedChange};
pub use llm::AiProvider;
