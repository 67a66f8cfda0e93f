use editor_core::InputMode;

/// Which pane a caret position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Three columns per byte (`"XX "`).
    Hex,
    /// Seventeen columns per row (sixteen chars and a newline).
    Text,
}

/// Caret positions of both panes, in pane columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caret {
    pub hex: usize,
    pub text: usize,
}

impl Caret {
    #[inline]
    #[must_use]
    pub fn get(&self, pane: Pane) -> usize {
        match pane {
            Pane::Hex => self.hex,
            Pane::Text => self.text,
        }
    }

    #[inline]
    pub fn set(&mut self, pane: Pane, position: usize) {
        match pane {
            Pane::Hex => self.hex = position,
            Pane::Text => self.text = position,
        }
    }
}

/// Everything the UI can ask of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the window to a row; drops every extra cursor.
    Scroll(u64),
    /// A character typed at `position` of `pane`.
    Type { pane: Pane, position: usize, ch: char },
    /// Backspace pressed at `position` of `pane`.
    Backspace { pane: Pane, position: usize },
    /// Add an extra cursor at a hex-pane column.
    OpenCursor(usize),
    ResetCursors,
    Undo,
    Redo,
    SetMode(InputMode),
    /// Highlight every occurrence of a byte pattern in the window, or stop.
    Find(Option<Vec<u8>>),
}

/// Why a command left the document alone. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    NoDocument,
    HistoryExhausted,
    /// The input was not something the pane accepts at that position.
    Ignored,
}

impl std::fmt::Display for Declined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Declined::NoDocument => "no document loaded",
            Declined::HistoryExhausted => "nothing to undo or redo",
            Declined::Ignored => "input ignored",
        };
        f.write_str(reason)
    }
}

/// Result of [`crate::Editor::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(crate::frame::Frame),
    Unchanged(Declined),
}

impl Outcome {
    #[inline]
    #[must_use]
    pub fn frame(&self) -> Option<&crate::frame::Frame> {
        match self {
            Outcome::Changed(frame) => Some(frame),
            Outcome::Unchanged(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }
}
