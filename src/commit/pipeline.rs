//! Message synthesis: try the remote generator, fall back to the classifier.
//!
//! ```text
//! Start ──(disabled / no key)──────────────────────────► Fallback ─► Done
//!   │                                                       ▲
//!   └─► AttemptRemote ──(diff error / empty / failure)──────┘
//!             │
//!             └──(text)──────────────────────────────────────────► Done
//! ```

use tracing::{debug, warn};

use crate::commit::changeset::ChangeSet;
use crate::commit::classify::classify;
use crate::commit::message::{CandidateMessage, MessageSource};
use crate::config::GenerationOptions;
use crate::git::VersionControl;
use crate::llm::{GenerationRequest, RemoteGenerator};

/// Output of synthesis plus any non-fatal warnings for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub message: CandidateMessage,
    pub warnings: Vec<String>,
}

/// Produce a candidate message for `changes`. Never fails.
pub async fn synthesize<V, G>(
    vcs: &V,
    generator: &G,
    changes: &ChangeSet,
    options: &GenerationOptions,
) -> Synthesis
where
    V: VersionControl + ?Sized,
    G: RemoteGenerator + ?Sized,
{
    let mut warnings = Vec::new();

    if options.remote_enabled() {
        if let Some(message) = attempt_remote(vcs, generator, changes, options, &mut warnings).await
        {
            return Synthesis { message, warnings };
        }
    } else {
        debug!(
            "Remote generation disabled (provider={}, key={})",
            options.ai_provider,
            options.api_key.is_some()
        );
    }

    debug!("Using rule-based message for {} file(s)", changes.len());
    Synthesis {
        message: classify(changes, options),
        warnings,
    }
}

async fn attempt_remote<V, G>(
    vcs: &V,
    generator: &G,
    changes: &ChangeSet,
    options: &GenerationOptions,
    warnings: &mut Vec<String>,
) -> Option<CandidateMessage>
where
    V: VersionControl + ?Sized,
    G: RemoteGenerator + ?Sized,
{
    let diff = match vcs.staged_diff().await {
        Ok(diff) => diff,
        Err(e) => {
            warn!("Could not read staged diff: {e}");
            warnings.push(format!(
                "Could not read staged diff ({e}); using rule-based message"
            ));
            return None;
        }
    };

    if diff.is_empty() {
        debug!("Staged diff is empty, skipping remote generation");
        return None;
    }

    let files = changes.file_summaries();
    let request = GenerationRequest {
        provider: options.ai_provider,
        api_key: options.api_key.as_ref(),
        diff: &diff.text,
        diff_truncated: diff.truncated,
        files: &files,
    };

    let text = match generator.generate(&request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Remote generation failed: {e}");
            warnings.push(format!(
                "AI generation failed ({e}); using rule-based message"
            ));
            return None;
        }
    };

    match CandidateMessage::from_generated(&text, MessageSource::Ai) {
        Some(message) => {
            debug!("Using AI message from {}", options.ai_provider);
            Some(message)
        }
        None => {
            warnings.push(format!(
                "{} returned an empty message; using rule-based message",
                options.ai_provider
            ));
            None
        }
    }
}
