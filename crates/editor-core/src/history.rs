use crate::enums::EditKind;

/// One reversible primitive applied to the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: EditKind,
    /// Original-file offset of the entry that changed.
    pub anchor: u64,
    /// The entry as it was before this record, `None` if it was absent.
    pub snapshot: Option<Vec<u8>>,
    /// Byte introduced by an insert, or removed by a delete.
    pub byte: u8,
    /// Position of `byte` inside the entry.
    pub shift: usize,
}

/// Records produced by one edit; undone and redone as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub records: Vec<LogRecord>,
}

/// Linear undo/redo history over an [`crate::overlay::Overlay`].
///
/// Any new transaction drops the redo stack: there is no branching history.
#[derive(Debug, Default)]
pub struct EditLog {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
}

impl EditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the records of one edit. An empty batch is not an edit and
    /// leaves both stacks alone.
    pub fn add(&mut self, records: Vec<LogRecord>) {
        if records.is_empty() {
            return;
        }

        // Any new action invalidates the redo stack
        self.redo_stack.clear();
        self.undo_stack.push(Transaction { records });
    }

    /// Reverts the newest transaction. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self, overlay: &mut crate::overlay::Overlay) -> bool {
        let Some(tx) = self.undo_stack.pop() else {
            tracing::debug!("undo: history exhausted");
            return false;
        };

        for record in tx.records.iter().rev() {
            overlay.revert(record);
        }

        self.redo_stack.push(tx);
        true
    }

    /// Re-applies the newest undone transaction. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self, overlay: &mut crate::overlay::Overlay) -> bool {
        let Some(tx) = self.redo_stack.pop() else {
            tracing::debug!("redo: history exhausted");
            return false;
        };

        for record in &tx.records {
            overlay.apply(record);
        }

        self.undo_stack.push(tx);
        true
    }

    #[inline]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

}
