//! Pure text rendering of a byte window.
//!
//! Nothing here knows about files or edits: every function takes the visible
//! bytes and returns the strings the hex pane, the text pane and the two
//! headers display.
pub mod encoding;
pub mod panes;

pub use encoding::TextEncoding;
pub use panes::{tens_count, to_hex, to_text, units_count};

/// Bytes shown on one row of both panes.
pub const BYTES_PER_ROW: usize = 16;
/// Columns one byte occupies in the hex pane (`"XX "`).
pub const HEX_CELL_WIDTH: usize = 3;
/// Columns one row occupies in the text pane (16 chars and a newline).
pub const TEXT_ROW_WIDTH: usize = BYTES_PER_ROW + 1;
