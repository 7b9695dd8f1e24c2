//! Hand the final message to the version-control collaborator.

use tracing::{debug, warn};

use crate::error::CommitError;
use crate::git::VersionControl;

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Full commit id.
    pub id: String,
    /// First line of the committed message.
    pub subject: String,
}

impl CommitReport {
    /// Abbreviated commit id for display.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

/// First non-blank line of a message, trimmed.
pub fn subject_line(message: &str) -> &str {
    message
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Commit `message` through `vcs`. No retries; failures are returned as-is.
pub async fn dispatch_commit<V>(vcs: &V, message: &str) -> Result<CommitReport, CommitError>
where
    V: VersionControl + ?Sized,
{
    debug!("Committing message with subject {:?}", subject_line(message));
    match vcs.commit(message).await {
        Ok(report) => {
            debug!("Created commit {}", report.id);
            Ok(report)
        }
        Err(e) => {
            warn!("Commit failed: {e}");
            Err(e)
        }
    }
}
