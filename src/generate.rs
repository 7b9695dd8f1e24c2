//! The generate-message command: collect, synthesize, review, commit.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::commit::{ChangeSet, CommitReport, Synthesis, dispatch_commit, synthesize};
use crate::config::{GenerationOptions, Settings, SettingsOverrides};
use crate::editor::{EditOutcome, SessionSlot, TerminalSurface, TextEditor, Verdict, validate};
use crate::error::{ConfigError, GenerateError, GitError};
use crate::git::{GitWorkspace, VersionControl};
use crate::llm::{HttpGenerator, RemoteGenerator};

/// Configuration for the generate command, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory to start repository discovery from.
    pub start_dir: PathBuf,
    pub overrides: SettingsOverrides,
    pub dry_run: bool,
    /// Open the editor before committing.
    pub edit: bool,
}

/// How a request finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Committed(CommitReport),
    /// Final message that would have been committed.
    DryRun(String),
    Cancelled,
}

/// Run the full generate-message flow against the repository at `start_dir`.
pub async fn run_generate(config: GenerateConfig) -> Result<GenerateOutcome, GenerateError> {
    let workspace = GitWorkspace::discover(&config.start_dir)?;
    let git_config = workspace
        .open()?
        .config()
        .map_err(ConfigError::Open)?;
    let settings = Settings::resolve(&git_config, config.overrides)?;
    debug!(
        "Resolved settings: provider={}, emojis={}, max_length={:?}",
        settings.ai_provider, settings.use_emojis, settings.max_length
    );

    let generator = HttpGenerator::new(settings.ai_timeout);
    let surface = config.edit.then(TerminalSurface::new);

    generate_with(
        &workspace,
        &generator,
        Some(workspace.workdir()),
        &settings.generation_options(),
        surface,
        config.dry_run,
    )
    .await
}

/// The generate-message flow over explicit collaborators.
///
/// With `surface` set the candidate is reviewed interactively; otherwise it
/// is validated as-is.
pub async fn generate_with<V, G, E>(
    vcs: &V,
    generator: &G,
    root: Option<&Path>,
    options: &GenerationOptions,
    surface: Option<TerminalSurface<E>>,
    dry_run: bool,
) -> Result<GenerateOutcome, GenerateError>
where
    V: VersionControl + ?Sized,
    G: RemoteGenerator + ?Sized,
    E: TextEditor,
{
    let staged = vcs.staged_changes().await?;
    let mut changes = ChangeSet::new(staged).ok_or(GitError::NothingStaged)?;
    if let Some(root) = root {
        changes = changes.with_root(root);
    }

    let Synthesis { message, warnings } = synthesize(vcs, generator, &changes, options).await;
    for warning in &warnings {
        eprintln!("\x1b[33m⚠ {warning}\x1b[0m");
    }
    debug!("Candidate message from {}: {}", message.source, message.subject);

    let final_text = match surface {
        Some(surface) => match review(surface, message.format(), options).await {
            EditOutcome::Saved(text) => text,
            EditOutcome::Cancelled => return Ok(GenerateOutcome::Cancelled),
        },
        None => match validate(&message.format(), options.max_message_length) {
            Verdict::Accept(text) => text,
            Verdict::RejectTooLong { limit, length } => {
                return Err(GenerateError::MessageTooLong { limit, length });
            }
            Verdict::RejectEmpty | Verdict::Cancel => return Ok(GenerateOutcome::Cancelled),
        },
    };

    if dry_run {
        return Ok(GenerateOutcome::DryRun(final_text));
    }

    let report = dispatch_commit(vcs, &final_text).await?;
    Ok(GenerateOutcome::Committed(report))
}

async fn review<E: TextEditor>(
    surface: TerminalSurface<E>,
    candidate: String,
    options: &GenerationOptions,
) -> EditOutcome {
    let mut slot = SessionSlot::new();
    let (pending, endpoint) = slot.open(candidate, options.max_message_length).await;
    let driver = surface.attach(endpoint);

    let outcome = pending.outcome().await;
    if let Err(e) = driver.await {
        warn!("Editor surface task failed: {e}");
    }
    outcome
}
