//! Error types for cmit modules using thiserror.

use thiserror::Error;

/// Errors from the version-control collaborator.
///
/// The first three variants are request preconditions: when one of them
/// occurs the command aborts before any message is synthesized.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("No git repository found. Run cmit from within a git working tree.")]
    NoRepository(#[source] git2::Error),

    #[error("Repository has no working tree; cmit cannot be used with bare repositories")]
    BareRepository,

    #[error("No staged changes. Stage files with `git add` first.")]
    NothingStaged,

    #[error("Failed to read the index: {0}")]
    Index(#[source] git2::Error),

    #[error("Failed to resolve HEAD: {0}")]
    Head(#[source] git2::Error),

    #[error("Failed to compute staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Git worker thread failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Errors from the commit operation.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Commit message is empty")]
    EmptyMessage,

    #[error("Failed to write tree from index: {0}")]
    WriteTree(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    Signature(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git worker thread failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Errors from remote text generation.
///
/// These never escape the adapter boundary: they are logged, turned into a
/// warning, and the pipeline falls back to rule-based synthesis.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI provider is disabled")]
    ProviderDisabled,

    #[error("No API key configured for {0}")]
    MissingCredential(&'static str),

    #[error("Staged diff is empty, nothing to describe")]
    EmptyDiff,

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} request timed out after {secs} seconds")]
    Timeout { provider: &'static str, secs: u64 },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected response: {reason}")]
    MalformedResponse {
        provider: &'static str,
        reason: String,
    },

    #[error("{0} returned an empty completion")]
    EmptyCompletion(&'static str),
}

/// Errors from configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open git configuration: {0}")]
    Open(#[source] git2::Error),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown AI provider '{0}' (expected none, openai, or gemini)")]
    UnknownProvider(String),
}

/// Errors that end a generate-message request.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("Commit message is {length} characters; the maximum is {limit}")]
    MessageTooLong { limit: usize, length: usize },
}
