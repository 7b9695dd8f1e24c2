//! Terminal surface: edits the message in the user's `$VISUAL`/`$EDITOR`.

use std::io;

use dialoguer::Editor;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::editor::session::{SurfaceCommand, SurfaceEndpoint, SurfaceEvent};
use crate::editor::validate::strip_comments;

/// Default heading of the instruction block.
pub const DEFAULT_TITLE: &str = "Edit commit message";

/// Something that can hand a buffer to the user for editing.
pub trait TextEditor: Send + 'static {
    /// `Ok(None)` when the user quit without saving.
    fn edit(&self, text: &str) -> io::Result<Option<String>>;
}

/// The user's configured editor, launched through `dialoguer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExternalEditor;

impl TextEditor for ExternalEditor {
    fn edit(&self, text: &str) -> io::Result<Option<String>> {
        Editor::new()
            .extension(".gitcommit")
            .edit(text)
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Drives one editor session from a blocking thread.
pub struct TerminalSurface<E = ExternalEditor> {
    editor: E,
    title: String,
}

impl TerminalSurface<ExternalEditor> {
    pub fn new() -> Self {
        Self::with_editor(ExternalEditor)
    }
}

impl Default for TerminalSurface<ExternalEditor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TextEditor> TerminalSurface<E> {
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Serve `endpoint` until the session closes.
    pub fn attach(self, endpoint: SurfaceEndpoint) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.serve(endpoint))
    }

    fn serve(&self, mut endpoint: SurfaceEndpoint) {
        let mut current = String::new();

        while let Some(command) = endpoint.commands.blocking_recv() {
            let event = match command {
                SurfaceCommand::Loading => {
                    eprintln!("Preparing commit message...");
                    continue;
                }
                SurfaceCommand::Show { text } => {
                    current = text;
                    self.prompt(&current)
                }
                SurfaceCommand::Reject { text, warning } => {
                    eprintln!("\x1b[33m⚠ {warning}\x1b[0m");
                    // The rejected buffer still holds the previous instruction block.
                    current = strip_comments(&text);
                    self.prompt(&current)
                }
                SurfaceCommand::Warn { warning } => {
                    eprintln!("\x1b[33m⚠ {warning}\x1b[0m");
                    self.prompt(&current)
                }
                SurfaceCommand::Close => break,
            };

            if endpoint.events.send(event).is_err() {
                debug!("Editor session ended before the surface replied");
                break;
            }
        }
    }

    fn prompt(&self, text: &str) -> SurfaceEvent {
        match self.editor.edit(&self.template(text)) {
            Ok(Some(saved)) => SurfaceEvent::Save(saved),
            Ok(None) => SurfaceEvent::Cancel,
            Err(e) => {
                warn!("Could not run editor: {e}");
                eprintln!("\x1b[33m⚠ Could not open editor: {e}\x1b[0m");
                SurfaceEvent::Cancel
            }
        }
    }

    /// `text` followed by the comment-line instruction block.
    pub fn template(&self, text: &str) -> String {
        format!(
            "{}\n\n# {}\n# Lines starting with '#' will be ignored.\n# Save and quit to commit; quit without saving to cancel.\n",
            text.trim_end(),
            self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::editor::session::{EditOutcome, SessionSlot};

    /// Plays back scripted replies and records every buffer it was given.
    #[derive(Clone, Default)]
    struct ScriptedEditor {
        replies: Arc<Mutex<VecDeque<io::Result<Option<String>>>>>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedEditor {
        fn new(replies: Vec<io::Result<Option<String>>>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                seen: Arc::default(),
            }
        }
    }

    impl TextEditor for ScriptedEditor {
        fn edit(&self, text: &str) -> io::Result<Option<String>> {
            self.seen.lock().unwrap().push(text.to_string());
            self.replies.lock().unwrap().pop_front().unwrap_or(Ok(None))
        }
    }

    #[test]
    fn test_template_round_trips_through_stripping() {
        let surface = TerminalSurface::with_editor(ScriptedEditor::default());
        let buffer = surface.template("feat: add x\n\nBody.");
        assert!(buffer.contains("# Edit commit message"));
        assert!(buffer.contains("will be ignored"));
        assert_eq!(strip_comments(&buffer).trim(), "feat: add x\n\nBody.");
    }

    #[tokio::test]
    async fn test_saved_buffer_becomes_outcome() {
        let editor = ScriptedEditor::new(vec![Ok(Some(
            "fix: edited\n# Lines starting with '#' will be ignored.\n".to_string(),
        ))]);
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot.open("fix: original", None).await;

        let surface = TerminalSurface::with_editor(editor.clone()).attach(endpoint);

        assert_eq!(
            pending.outcome().await,
            EditOutcome::Saved("fix: edited".to_string())
        );
        surface.await.unwrap();
        assert!(editor.seen.lock().unwrap()[0].starts_with("fix: original"));
    }

    #[tokio::test]
    async fn test_quit_without_saving_cancels() {
        let editor = ScriptedEditor::new(vec![Ok(None)]);
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot.open("fix: original", None).await;

        let surface = TerminalSurface::with_editor(editor).attach(endpoint);

        assert_eq!(pending.outcome().await, EditOutcome::Cancelled);
        surface.await.unwrap();
    }

    #[tokio::test]
    async fn test_editor_error_cancels() {
        let editor = ScriptedEditor::new(vec![Err(io::Error::other("no editor"))]);
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot.open("fix: original", None).await;

        TerminalSurface::with_editor(editor).attach(endpoint);

        assert_eq!(pending.outcome().await, EditOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_rejected_text_is_reopened() {
        let long = "feat: this subject is far too long";
        let editor = ScriptedEditor::new(vec![
            Ok(Some(long.to_string())),
            Ok(Some("feat: short".to_string())),
        ]);
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot.open("feat: x", Some(12)).await;

        let surface = TerminalSurface::with_editor(editor.clone()).attach(endpoint);

        assert_eq!(
            pending.outcome().await,
            EditOutcome::Saved("feat: short".to_string())
        );
        surface.await.unwrap();

        let seen = editor.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].starts_with(long));
    }

    /// Saves the buffer it was given unchanged, then saves `last`.
    #[derive(Clone)]
    struct EchoingEditor {
        echoes: Arc<Mutex<usize>>,
        last: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl TextEditor for EchoingEditor {
        fn edit(&self, text: &str) -> io::Result<Option<String>> {
            self.seen.lock().unwrap().push(text.to_string());
            let mut echoes = self.echoes.lock().unwrap();
            if *echoes == 0 {
                return Ok(Some(self.last.to_string()));
            }
            *echoes -= 1;
            Ok(Some(text.to_string()))
        }
    }

    #[tokio::test]
    async fn test_repeated_rejections_keep_one_instruction_block() {
        let editor = EchoingEditor {
            echoes: Arc::new(Mutex::new(3)),
            last: "feat: short",
            seen: Arc::default(),
        };
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot
            .open("feat: this subject is far too long", Some(12))
            .await;

        let surface = TerminalSurface::with_editor(editor.clone()).attach(endpoint);

        assert_eq!(
            pending.outcome().await,
            EditOutcome::Saved("feat: short".to_string())
        );
        surface.await.unwrap();

        let seen = editor.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        for buffer in seen.iter() {
            assert_eq!(buffer.matches("# Edit commit message").count(), 1);
            assert_eq!(buffer.matches("will be ignored").count(), 1);
            assert!(buffer.starts_with("feat: this subject is far too long\n\n#"));
        }
    }

    #[tokio::test]
    async fn test_empty_save_reopens_current_text() {
        let editor = ScriptedEditor::new(vec![Ok(Some("# all comments\n".to_string())), Ok(None)]);
        let mut slot = SessionSlot::new();
        let (pending, endpoint) = slot.open("docs: update README.md", None).await;

        let surface = TerminalSurface::with_editor(editor.clone()).attach(endpoint);

        assert_eq!(pending.outcome().await, EditOutcome::Cancelled);
        surface.await.unwrap();

        let seen = editor.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].starts_with("docs: update README.md"));
    }
}
