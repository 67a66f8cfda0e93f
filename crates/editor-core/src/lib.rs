//! Edit-buffer engine of the hex editor.
//!
//! The original file is never written while editing. Every change lives in a
//! sparse [`overlay::Overlay`] keyed by the original byte offset it replaces,
//! and every change is recorded in an [`history::EditLog`] so it can be undone
//! exactly. [`buffer::HexBuffer`] ties both to a scrollable
//! [`view::ViewWindow`] and to the multi-cursor fan-out in [`cursor`].
pub mod buffer;
pub mod config;
pub mod cursor;
pub mod enums;
pub mod errors;
pub mod history;
pub mod overlay;
pub mod view;

pub use buffer::HexBuffer;
pub use config::BufferConfig;
pub use enums::{EditKind, InputMode, Placement};
pub use errors::{BufferError, BufferResult};
