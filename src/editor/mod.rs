//! Interactive review of the candidate message before it is committed.

pub mod session;
pub mod terminal;
pub mod validate;

pub use session::{
    EditOutcome, PendingEdit, SessionSlot, SurfaceCommand, SurfaceEndpoint, SurfaceEvent,
};
pub use terminal::{ExternalEditor, TerminalSurface, TextEditor};
pub use validate::{Verdict, strip_comments, validate};
