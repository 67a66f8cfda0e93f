use crate::cursor::{Broadcast, ReplayTarget};
use crate::enums::{InputMode, Placement};

const HEX_CELL: usize = renderer::HEX_CELL_WIDTH;
const TEXT_ROW: usize = renderer::TEXT_ROW_WIDTH;

/// One open file and everything pending on it.
///
/// - The original bytes stay memory-mapped and untouched until
///   [`HexBuffer::save_as`] streams them out with the edits applied.
/// - The UI only knows pane columns. The buffer resolves them through the
///   current [`crate::view::ViewWindow`] into anchors and shifts, so an edit
///   can only land on something the window shows (or on the byte right in
///   front of it).
/// - Every public edit refreshes the window before it returns.
#[derive(Debug)]
pub struct HexBuffer {
    base: io::mmap::BaseStore,
    overlay: crate::overlay::Overlay,
    log: crate::history::EditLog,
    view: crate::view::ViewWindow,
    cursors: crate::cursor::CursorSet,
    config: crate::config::BufferConfig,
}

/*

==================================
======== OPEN & SAVE =============
==================================

*/

impl HexBuffer {
    /// Maps `path` and projects the first window.
    ///
    /// # Errors
    ///
    /// - [`crate::BufferError::Config`] if `config` is invalid.
    /// - [`crate::BufferError::Store`] if the file is missing or unreadable.
    pub fn open(
        path: impl AsRef<std::path::Path>,
        config: crate::config::BufferConfig,
    ) -> crate::errors::BufferResult<Self> {
        config.validate()?;
        let base = io::mmap::BaseStore::open(path)?;

        let mut buffer = Self {
            base,
            overlay: crate::overlay::Overlay::new(),
            log: crate::history::EditLog::new(),
            view: crate::view::ViewWindow::default(),
            cursors: crate::cursor::CursorSet::new(),
            config,
        };
        buffer.update_data(0);

        if buffer.is_read_only() {
            tracing::warn!(path = %buffer.path().display(), "empty file opened read-only");
        }

        Ok(buffer)
    }

    /// Streams the logical document into `out`: original bytes up to each
    /// anchor, the entry instead of the anchor byte, then the tail.
    ///
    /// # Errors
    ///
    /// Propagates any write error from `out`.
    pub fn write_data(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        let data = self.base.as_slice();
        let mut cursor = 0usize;

        for (anchor, entry) in self.overlay.iter() {
            let Ok(anchor) = usize::try_from(anchor) else {
                break;
            };

            out.write_all(data.get(cursor..anchor).unwrap_or(&[]))?;
            out.write_all(entry)?;
            cursor = anchor + 1;
        }

        out.write_all(data.get(cursor..).unwrap_or(&[]))
    }

    /// Writes the logical document to `path` atomically. `path` may be the
    /// file this buffer was opened from.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BufferError::Store`] if the destination cannot be
    /// written; the destination is left as it was.
    pub fn save_as(&self, path: impl AsRef<std::path::Path>) -> crate::errors::BufferResult<()> {
        let path = path.as_ref();

        io::atomic::write_atomic(path, |out| self.write_data(out))?;

        tracing::debug!(
            path = %path.display(),
            size = self.get_size(),
            entries = self.overlay.len(),
            "buffer saved"
        );

        Ok(())
    }
}

/*

==================================
========= INLINE METHODS =========
==================================

*/

impl HexBuffer {
    /// Logical size: original length plus the net growth of every entry.
    #[inline]
    #[must_use]
    pub fn get_size(&self) -> u64 {
        self.overlay.logical_size(self.base.len())
    }

    /// Last row the scroll bar can reach.
    #[inline]
    #[must_use]
    pub fn max_scroll_row(&self) -> u64 {
        self.get_size()
            .div_ceil(renderer::BYTES_PER_ROW as u64)
            .saturating_sub(1)
    }

    /// Logical offset of byte `shift` of the slot anchored at `index`.
    #[inline]
    #[must_use]
    pub fn get_position(&self, index: u64, shift: u64) -> u64 {
        self.overlay.get_position(index, shift)
    }

    /// An empty file has no byte to anchor an edit on.
    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.base.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn scroll_row(&self) -> u64 {
        self.view.scroll_row()
    }

    #[inline]
    #[must_use]
    pub fn shown(&self) -> &[u8] {
        self.view.bytes()
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> &crate::view::ViewWindow {
        &self.view
    }

    #[inline]
    #[must_use]
    pub fn overlay(&self) -> &crate::overlay::Overlay {
        &self.overlay
    }

    #[inline]
    #[must_use]
    pub fn log(&self) -> &crate::history::EditLog {
        &self.log
    }

    #[inline]
    #[must_use]
    pub fn base(&self) -> &io::mmap::BaseStore {
        &self.base
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.base.path()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &crate::config::BufferConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn cursors(&self) -> &[usize] {
        self.cursors.positions()
    }
}

/*

==================================
=========== VIEW WINDOW ==========
==================================

*/

impl HexBuffer {
    /// Rebuilds the window at `scroll_row`, clamped to the last row.
    pub fn update_data(&mut self, scroll_row: u64) {
        let row = scroll_row.min(self.max_scroll_row());

        self.view = crate::view::ViewWindow::build(
            self.base.as_slice(),
            &self.overlay,
            row,
            self.config.window_capacity(),
        );
    }

    /// User scroll. Cursor columns belong to the old window, so they go.
    pub fn scroll_to(&mut self, scroll_row: u64) {
        self.cursors.reset();
        self.update_data(scroll_row);

        tracing::debug!(row = self.scroll_row(), "scrolled");
    }

    /// Rebuilds the window at the current row.
    pub fn refresh(&mut self) {
        self.update_data(self.view.scroll_row());
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        renderer::to_hex(self.view.bytes())
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        renderer::to_text(self.view.bytes(), self.config.encoding)
    }

    #[must_use]
    pub fn tens_count(&self) -> String {
        renderer::tens_count(self.view.scroll_row(), self.view.len())
    }

    #[must_use]
    pub fn units_count(&self) -> String {
        renderer::units_count()
    }
}

/*

==================================
======== BYTE PRIMITIVES =========
==================================

*/

impl HexBuffer {
    /// Stages `byte` at view index `index` as described by `placement`.
    /// Returns `false` when the window cannot resolve the index, or the
    /// buffer is read-only. Does not refresh the window.
    pub fn add_byte(&mut self, index: usize, byte: u8, placement: Placement) -> bool {
        if self.is_read_only() {
            tracing::debug!(index, "add_byte declined: read-only buffer");
            return false;
        }
        let Ok(at) = isize::try_from(index) else {
            return false;
        };

        let records = match placement {
            Placement::InPlace => {
                let Some(anchor) = self.view.index().get(at) else {
                    tracing::debug!(index, "add_byte declined: index outside window");
                    return false;
                };

                if self.overlay.contains(anchor) {
                    let shift = self.view.index().shift_of(at);
                    self.overlay.overwrite(anchor, shift, byte)
                } else {
                    vec![self.overlay.insert(anchor, 0, byte)]
                }
            }
            Placement::Grow => {
                let prev = at - 1;

                match self.view.index().get(prev) {
                    Some(anchor) if self.overlay.contains(anchor) => {
                        let shift = self.view.index().shift_of(prev) + 1;
                        vec![self.overlay.insert(anchor, shift, byte)]
                    }
                    Some(anchor) => {
                        // The new byte follows an unedited original, which
                        // the entry has to carry along.
                        let seed = match usize::try_from(prev) {
                            Ok(p) => self.view.byte(p),
                            Err(_) => self.base.byte_at(anchor),
                        };
                        let Some(seed) = seed else {
                            return false;
                        };

                        vec![
                            self.overlay.insert(anchor, 0, seed),
                            self.overlay.insert(anchor, 1, byte),
                        ]
                    }
                    None if prev == -1 => {
                        // Front of the document: prepend to anchor 0.
                        let mut records = Vec::with_capacity(2);
                        if !self.overlay.contains(0) {
                            let Some(first) = self.base.byte_at(0) else {
                                return false;
                            };
                            records.push(self.overlay.insert(0, 0, first));
                        }
                        records.push(self.overlay.insert(0, 0, byte));
                        records
                    }
                    None => {
                        tracing::debug!(index, "add_byte declined: index outside window");
                        return false;
                    }
                }
            }
        };

        self.log.add(records);
        true
    }

    /// Removes view byte `index`. An unedited original byte turns into a
    /// tombstone. `-1` addresses the byte right before the window. Does not
    /// refresh the window.
    pub fn delete_byte(&mut self, index: isize) -> bool {
        if self.is_read_only() {
            tracing::debug!(index, "delete_byte declined: read-only buffer");
            return false;
        }
        let Some(anchor) = self.view.index().get(index) else {
            tracing::debug!(index, "delete_byte declined: index outside window");
            return false;
        };

        let record = if self.overlay.contains(anchor) {
            let shift = self.view.index().shift_of(index);
            self.overlay.remove(anchor, shift)
        } else {
            self.base
                .byte_at(anchor)
                .and_then(|original| self.overlay.tombstone(anchor, original))
        };

        match record {
            Some(record) => {
                self.log.add(vec![record]);
                true
            }
            None => false,
        }
    }
}

/*

==================================
========= PANE DISPATCH ==========
==================================

*/

impl HexBuffer {
    /// A key typed in the hex pane at column `position`. Returns the caret
    /// after the edit and after every cursor has repeated it.
    pub fn update_from_hex_position(&mut self, position: usize, ch: char, mode: InputMode) -> usize {
        if !ch.is_ascii_hexdigit() {
            return position;
        }

        let next = self.apply_hex_input(position, ch, mode).unwrap_or(position);
        self.refresh();

        self.handle_multicursor(next, Broadcast::Digit { digit: ch, mode })
    }

    /// A key typed in the text pane at column `position`. Only alphanumeric
    /// characters that fit one byte of the configured encoding are taken.
    pub fn update_from_text_position(&mut self, position: usize, ch: char, mode: InputMode) -> usize {
        if !ch.is_alphanumeric() {
            return position;
        }
        let Some(byte) = self.config.encoding.encode(ch) else {
            tracing::debug!(%ch, "text input declined: not a single byte");
            return position;
        };

        let index = position - position / TEXT_ROW;
        let at_end = index == self.view.len();
        if !self.add_byte(index, byte, mode.boundary_placement(at_end)) {
            return position;
        }
        self.refresh();

        let mut next = position;
        if position % TEXT_ROW == renderer::BYTES_PER_ROW - 1 {
            next += 1;
        }
        if at_end {
            next += 1;
        }
        next + 1
    }

    /// Backspace in the hex pane. Only a nonzero byte boundary deletes
    /// anything at the primary caret, but the cursors always replay it.
    pub fn backspace_event_from_hex(&mut self, position: usize) -> usize {
        let (next, deleted) = match self.apply_hex_backspace(position) {
            Some(next) => (next, true),
            None => (position, false),
        };
        self.refresh();

        self.handle_multicursor(next, Broadcast::Backspace { deleted })
    }

    /// Backspace in the text pane: deletes the byte before the caret.
    pub fn backspace_event_from_text(&mut self, position: usize) -> usize {
        let logical = position - position / TEXT_ROW;
        let index = isize::try_from(logical).unwrap_or(isize::MAX) - 1;

        if !self.delete_byte(index) {
            return position;
        }
        self.refresh();

        let mut next = position.saturating_sub(1);
        if next % TEXT_ROW == renderer::BYTES_PER_ROW {
            next = next.saturating_sub(1);
        }
        next
    }

    /// Repeats `broadcast` at every open cursor. A call made while a fan-out
    /// is running, or with no cursors open, just hands `position` back.
    pub fn handle_multicursor(&mut self, position: usize, broadcast: Broadcast) -> usize {
        let Some(mut snapshot) = self.cursors.begin() else {
            return position;
        };

        let position = crate::cursor::fan_out(self, &mut snapshot, position, broadcast);
        self.cursors.finish(snapshot);

        position
    }

    /// Hex keystroke without fan-out or refresh. `None` when declined.
    fn apply_hex_input(&mut self, position: usize, ch: char, mode: InputMode) -> Option<usize> {
        let nibble = u8::try_from(ch.to_digit(16)?).ok()?;
        let index = position / HEX_CELL;

        match position % HEX_CELL {
            0 => {
                let placement = mode.boundary_placement(index == self.view.len());
                let byte = match placement {
                    Placement::InPlace => (nibble << 4) | (self.view.byte(index)? & 0x0f),
                    Placement::Grow => nibble << 4,
                };

                self.add_byte(index, byte, placement).then_some(position + 1)
            }
            1 => {
                let byte = (self.view.byte(index)? & 0xf0) | nibble;

                self.add_byte(index, byte, Placement::InPlace)
                    .then_some(position + 2)
            }
            // Separator column.
            _ => None,
        }
    }

    /// Hex backspace without fan-out or refresh. `None` when nothing was
    /// deleted.
    fn apply_hex_backspace(&mut self, position: usize) -> Option<usize> {
        if position % HEX_CELL != 0 || position == 0 {
            return None;
        }

        let index = isize::try_from(position / HEX_CELL - 1).ok()?;

        self.delete_byte(index).then_some(position - HEX_CELL)
    }
}

impl ReplayTarget for HexBuffer {
    fn refresh(&mut self) {
        HexBuffer::refresh(self);
    }

    fn replay_digit(&mut self, position: usize, digit: char, mode: InputMode) -> Option<usize> {
        self.apply_hex_input(position, digit, mode)
    }

    fn replay_backspace(&mut self, position: usize) -> Option<usize> {
        self.apply_hex_backspace(position)
    }
}

/*

==================================
======== CURSORS & HISTORY =======
==================================

*/

impl HexBuffer {
    pub fn open_cursor(&mut self, position: usize) {
        self.cursors.open(position);
    }

    pub fn reset_cursors(&mut self) {
        self.cursors.reset();
    }

    /// Reverts the last edit. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let done = self.log.undo(&mut self.overlay);
        if done {
            self.refresh();
        }
        done
    }

    /// Re-applies the last undone edit. `false` when there is nothing to
    /// redo.
    pub fn redo(&mut self) -> bool {
        let done = self.log.redo(&mut self.overlay);
        if done {
            self.refresh();
        }
        done
    }
}
