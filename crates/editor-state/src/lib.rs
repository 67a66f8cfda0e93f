//! Editor session on top of [`editor_core::HexBuffer`].
//!
//! The UI talks to an [`Editor`] only through [`Command`]s and reads back a
//! [`Frame`] plus [`EditorEvent`]s. Whether a document is loaded is explicit
//! in [`Session`]; nothing here panics or fails when it is not.
pub mod commands;
pub mod editor;
pub mod errors;
pub mod events;
pub mod frame;
pub mod pipeline;
pub mod search;
pub mod session;

pub use commands::{Caret, Command, Declined, Outcome, Pane};
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use events::EditorEvent;
pub use frame::Frame;
pub use session::Session;
