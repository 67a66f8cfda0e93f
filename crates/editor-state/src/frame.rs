/// Snapshot of everything the panes display after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub hex: String,
    pub text: String,
    /// Offset column, one `{row:07x}0` line per row.
    pub offsets: String,
    /// Column header `00 01 … 0f`.
    pub columns: String,
    pub max_scroll: u64,
    pub scroll_row: u64,
    /// Logical size of the document.
    pub size: u64,
    pub caret: crate::commands::Caret,
    pub cursors: Vec<usize>,
    /// View indices where the search pattern starts.
    pub matches: Vec<usize>,
    pub mode: editor_core::InputMode,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Frame {
    #[must_use]
    pub fn capture(
        buffer: &editor_core::HexBuffer,
        caret: crate::commands::Caret,
        matches: &[usize],
        mode: editor_core::InputMode,
    ) -> Self {
        Self {
            hex: buffer.to_hex(),
            text: buffer.to_text(),
            offsets: buffer.tens_count(),
            columns: buffer.units_count(),
            max_scroll: buffer.max_scroll_row(),
            scroll_row: buffer.scroll_row(),
            size: buffer.get_size(),
            caret,
            cursors: buffer.cursors().to_vec(),
            matches: matches.to_vec(),
            mode,
            can_undo: buffer.log().can_undo(),
            can_redo: buffer.log().can_redo(),
        }
    }
}
