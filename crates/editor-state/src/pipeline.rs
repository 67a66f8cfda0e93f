/// One stage wrapped around a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Put both carets back where they were before the command ran.
    PreserveCaret,
    /// Rebuild the view window at the current row.
    Refresh,
    /// Re-run the search pattern over the new window.
    Research,
}

/// Ordered stages the editor runs around a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline(&'static [Step]);

impl Pipeline {
    /// Typing and backspace: the command itself moves the caret.
    pub const EDIT: Pipeline = Pipeline(&[Step::Refresh, Step::Research]);
    /// Undo and redo keep the caret where the user left it.
    pub const HISTORY: Pipeline = Pipeline(&[Step::PreserveCaret, Step::Refresh, Step::Research]);
    /// Scrolling, cursors, mode and search changes.
    pub const VIEW: Pipeline = Pipeline(&[Step::Research]);

    #[inline]
    #[must_use]
    pub fn has(&self, step: Step) -> bool {
        self.0.contains(&step)
    }

    #[inline]
    #[must_use]
    pub fn steps(&self) -> &'static [Step] {
        self.0
    }
}
