//! Interactive editing sessions and the single-slot owner that supersedes them.
//!
//! A session talks to its surface over two channels. The session drives the
//! surface with [`SurfaceCommand`]s and listens for [`SurfaceEvent`]s. The
//! surface starts in [`SurfaceCommand::Loading`] and only becomes editable once
//! it receives [`SurfaceCommand::Show`].
//!
//! ```text
//!  open ─► Loading ─► Show ─► (Save ─► validate)* ─► Close ─► outcome
//!                              │   ├─ Accept ────────────┘
//!                              │   ├─ Reject* ─► Reject/Warn ─┐
//!                              │   └─ Cancel ──────────────┐ │
//!                              └─ Cancel / closed / dispose ┴─┴─► Cancelled
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::editor::validate::{Verdict, validate};

/// Instructions sent from the session to its surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Show the surface disabled until content arrives.
    Loading,
    /// Populate the surface and make it editable.
    Show { text: String },
    /// The last save was rejected; re-present `text` with a warning.
    Reject { text: String, warning: String },
    /// The last save was rejected; keep the current text.
    Warn { warning: String },
    /// The session is over.
    Close,
}

/// User actions reported by the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Save(String),
    Cancel,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Validated message with comments stripped.
    Saved(String),
    Cancelled,
}

/// The surface's ends of the session channels.
#[derive(Debug)]
pub struct SurfaceEndpoint {
    pub commands: mpsc::UnboundedReceiver<SurfaceCommand>,
    pub events: mpsc::UnboundedSender<SurfaceEvent>,
}

/// Awaitable result of an open session.
#[derive(Debug)]
pub struct PendingEdit {
    outcome: oneshot::Receiver<EditOutcome>,
}

impl PendingEdit {
    /// Wait until the session is saved, cancelled, closed or superseded.
    pub async fn outcome(self) -> EditOutcome {
        self.outcome.await.unwrap_or(EditOutcome::Cancelled)
    }
}

struct EditorSession {
    id: u64,
    commands: mpsc::UnboundedSender<SurfaceCommand>,
    events: mpsc::UnboundedReceiver<SurfaceEvent>,
    max_length: Option<usize>,
}

impl EditorSession {
    async fn run(
        mut self,
        initial: String,
        mut dispose: oneshot::Receiver<()>,
        outcome: oneshot::Sender<EditOutcome>,
    ) {
        // Give the surface a chance to render the loading state first.
        tokio::task::yield_now().await;
        self.send(SurfaceCommand::Show { text: initial });

        let result = loop {
            tokio::select! {
                biased;
                _ = &mut dispose => {
                    debug!("Editor session {} superseded", self.id);
                    break EditOutcome::Cancelled;
                }
                event = self.events.recv() => match event {
                    None => {
                        debug!("Editor session {} surface closed", self.id);
                        break EditOutcome::Cancelled;
                    }
                    Some(SurfaceEvent::Cancel) => {
                        debug!("Editor session {} cancelled", self.id);
                        break EditOutcome::Cancelled;
                    }
                    Some(SurfaceEvent::Save(text)) => {
                        if let Some(outcome) = self.on_save(text) {
                            break outcome;
                        }
                    }
                },
            }
        };

        self.send(SurfaceCommand::Close);
        if outcome.send(result).is_err() {
            debug!("Editor session {} outcome dropped", self.id);
        }
    }

    /// `None` keeps the session open.
    fn on_save(&self, text: String) -> Option<EditOutcome> {
        let verdict = validate(&text, self.max_length);
        match &verdict {
            Verdict::Accept(message) => Some(EditOutcome::Saved(message.clone())),
            Verdict::Cancel => {
                debug!("Editor session {} saved empty message, cancelling", self.id);
                Some(EditOutcome::Cancelled)
            }
            Verdict::RejectEmpty => {
                self.send(SurfaceCommand::Warn {
                    warning: verdict.warning().unwrap_or_default(),
                });
                None
            }
            Verdict::RejectTooLong { .. } => {
                self.send(SurfaceCommand::Reject {
                    warning: verdict.warning().unwrap_or_default(),
                    text,
                });
                None
            }
        }
    }

    fn send(&self, command: SurfaceCommand) {
        if self.commands.send(command).is_err() {
            debug!("Editor session {} surface already gone", self.id);
        }
    }
}

struct SessionHandle {
    id: u64,
    dispose: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    async fn dispose(self) {
        let _ = self.dispose.send(());
        if let Err(e) = self.task.await {
            warn!("Editor session {} task failed: {e}", self.id);
        }
    }
}

/// Owner of the one live editor session.
#[derive(Default)]
pub struct SessionSlot {
    current: Option<SessionHandle>,
    next_id: u64,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `candidate`, superseding any live one.
    ///
    /// The previous session is fully resolved as cancelled and told to close
    /// before the new surface receives anything.
    pub async fn open(
        &mut self,
        candidate: impl Into<String>,
        max_length: Option<usize>,
    ) -> (PendingEdit, SurfaceEndpoint) {
        self.dispose().await;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (dispose_tx, dispose_rx) = oneshot::channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        self.next_id += 1;
        let id = self.next_id;
        debug!("Opening editor session {id}");

        // Queued before the task exists so it always precedes `Show`.
        let _ = command_tx.send(SurfaceCommand::Loading);

        let session = EditorSession {
            id,
            commands: command_tx,
            events: event_rx,
            max_length,
        };
        let task = tokio::spawn(session.run(candidate.into(), dispose_rx, outcome_tx));

        self.current = Some(SessionHandle {
            id,
            dispose: dispose_tx,
            task,
        });

        (
            PendingEdit {
                outcome: outcome_rx,
            },
            SurfaceEndpoint {
                commands: command_rx,
                events: event_tx,
            },
        )
    }

    /// Cancel the live session, if any, and wait for it to finish.
    pub async fn dispose(&mut self) {
        if let Some(handle) = self.current.take() {
            debug!("Disposing editor session {}", handle.id);
            handle.dispose().await;
        }
    }

    /// Whether a session is installed and still running.
    pub fn is_live(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.task.is_finished())
    }
}
