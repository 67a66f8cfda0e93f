use crate::overlay::Overlay;

/// Maps view-local byte indices to the anchor they come from.
///
/// Index `0` is the first byte of the window. Negative indices address the
/// bytes right before the window: `-1` is the anchor of the byte before the
/// first row, and when an overlay entry straddles the window start, `-1..=-n`
/// all point at that entry's anchor for its `n` hidden head bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionIndex {
    leading: Vec<u64>,
    shown: Vec<u64>,
}

impl PositionIndex {
    /// Anchor of view byte `index`, if the window knows it.
    #[must_use]
    pub fn get(&self, index: isize) -> Option<u64> {
        match usize::try_from(index) {
            Ok(i) => self.shown.get(i).copied(),
            Err(_) => self.leading.get(index.unsigned_abs() - 1).copied(),
        }
    }

    /// How many bytes in front of `index` belong to the same anchor, i.e.
    /// the position of view byte `index` inside its overlay entry.
    #[must_use]
    pub fn shift_of(&self, index: isize) -> usize {
        let Some(anchor) = self.get(index) else {
            return 0;
        };

        let mut shift = 0;
        let mut before = index - 1;
        while self.get(before) == Some(anchor) {
            shift += 1;
            before -= 1;
        }

        shift
    }

    #[inline]
    #[must_use]
    pub fn shown(&self) -> &[u64] {
        &self.shown
    }
}

/// The displayed slice of the logical document.
///
/// Rebuilt from scratch on every scroll and after every edit; nothing here is
/// kept in sync incrementally.
#[derive(Clone, Debug, Default)]
pub struct ViewWindow {
    scroll_row: u64,
    bytes: Vec<u8>,
    index: PositionIndex,
}

impl ViewWindow {
    /// Projects `base` with `overlay` applied, starting at row `scroll_row`,
    /// collecting at least `capacity` bytes unless the file ends first.
    ///
    /// The window can run past `capacity` by the length of the last overlay
    /// entry it takes in, since entries are never split at the bottom.
    #[must_use]
    pub fn build(base: &[u8], overlay: &Overlay, scroll_row: u64, capacity: usize) -> Self {
        let row_width = renderer::BYTES_PER_ROW as u64;
        let mut start = scroll_row.saturating_mul(row_width);
        let mut leading = Vec::new();
        let mut bytes = Vec::with_capacity(capacity);
        let mut shown = Vec::with_capacity(capacity);
        let mut straddled = false;

        // Entries ahead of the window shift which original byte lands at
        // its first logical position.
        for (anchor, entry) in overlay.iter() {
            if anchor >= start {
                break;
            }

            let len = entry.len() as u64;
            if anchor.saturating_add(len) < start {
                match len {
                    0 => start = start.saturating_add(1),
                    1 => {}
                    _ => start = start.saturating_sub(len - 1),
                }
                continue;
            }

            let hidden = usize::try_from(start - anchor).unwrap_or(usize::MAX);
            leading = vec![anchor; hidden];
            for &byte in entry.get(hidden..).unwrap_or(&[]) {
                bytes.push(byte);
                shown.push(anchor);
            }
            start = anchor + 1;
            straddled = true;
            break;
        }

        if !straddled && start != 0 {
            leading = vec![start - 1];
        }

        let mut pos = start;
        while bytes.len() < capacity {
            let Some(&original) = usize::try_from(pos).ok().and_then(|i| base.get(i)) else {
                break;
            };

            match overlay.get(pos) {
                Some(entry) => {
                    bytes.extend_from_slice(entry);
                    shown.extend(std::iter::repeat_n(pos, entry.len()));
                }
                None => {
                    bytes.push(original);
                    shown.push(pos);
                }
            }
            pos += 1;
        }

        tracing::trace!(scroll_row, start, shown = bytes.len(), "view window rebuilt");

        Self {
            scroll_row,
            bytes,
            index: PositionIndex { leading, shown },
        }
    }

    #[inline]
    #[must_use]
    pub fn scroll_row(&self) -> u64 {
        self.scroll_row
    }

    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Displayed byte at view index `index`.
    #[inline]
    #[must_use]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(len: u8) -> Vec<u8> {
        (0..len).collect()
    }

    #[test]
    fn test_untouched_first_window() {
        let data = base(40);
        let view = ViewWindow::build(&data, &Overlay::new(), 0, 32);

        assert_eq!(view.bytes(), &data[..32]);
        assert_eq!(view.index().get(0), Some(0));
        assert_eq!(view.index().get(31), Some(31));
        assert_eq!(view.index().get(-1), None);
    }

    #[test]
    fn test_scrolled_window_knows_previous_byte() {
        let data = base(40);
        let view = ViewWindow::build(&data, &Overlay::new(), 1, 32);

        assert_eq!(view.bytes(), &data[16..]);
        assert_eq!(view.index().get(-1), Some(15));
        assert_eq!(view.index().get(-2), None);
    }

    #[test]
    fn test_grown_entry_before_window_pulls_start_back() {
        let data = base(40);
        let mut overlay = Overlay::new();
        overlay.insert(2, 0, 0xa0);
        overlay.insert(2, 1, 0xb0);
        overlay.insert(2, 2, 0xc0);

        let view = ViewWindow::build(&data, &overlay, 1, 16);

        // Logical 16 is original 14 once two extra bytes sit in front of it.
        assert_eq!(view.byte(0), Some(14));
        assert_eq!(view.index().get(-1), Some(13));
    }

    #[test]
    fn test_tombstone_before_window_pushes_start_on() {
        let data = base(40);
        let mut overlay = Overlay::new();
        overlay.tombstone(5, 5);

        let view = ViewWindow::build(&data, &overlay, 1, 16);

        assert_eq!(view.byte(0), Some(17));
    }

    #[test]
    fn test_straddling_entry_splits_at_window_start() {
        let data = base(40);
        let mut overlay = Overlay::new();
        for (shift, byte) in [0xa0, 0xb0, 0xc0, 0xd0].into_iter().enumerate() {
            overlay.insert(15, shift, byte);
        }

        let view = ViewWindow::build(&data, &overlay, 1, 16);

        assert_eq!(&view.bytes()[..4], &[0xb0, 0xc0, 0xd0, 16]);
        assert_eq!(view.index().get(-1), Some(15));
        assert_eq!(view.index().get(-2), None);
        assert_eq!(view.index().shift_of(0), 1);
        assert_eq!(view.index().shift_of(2), 3);
        assert_eq!(view.index().shift_of(3), 0);
    }

    #[test]
    fn test_entries_inside_window_are_substituted() {
        let data = base(8);
        let mut overlay = Overlay::new();
        overlay.insert(1, 0, 0xee);
        overlay.insert(1, 1, 0xff);
        overlay.tombstone(3, 3);

        let view = ViewWindow::build(&data, &overlay, 0, 16);

        assert_eq!(view.bytes(), &[0, 0xee, 0xff, 2, 4, 5, 6, 7]);
        assert_eq!(view.index().shown(), &[0, 1, 1, 2, 4, 5, 6, 7]);
        assert_eq!(view.index().shift_of(2), 1);
    }

    #[test]
    fn test_last_entry_may_overshoot_capacity() {
        let data = base(8);
        let mut overlay = Overlay::new();
        overlay.insert(3, 0, 0x11);
        overlay.insert(3, 1, 0x22);
        overlay.insert(3, 2, 0x33);

        let view = ViewWindow::build(&data, &overlay, 0, 4);

        assert_eq!(view.bytes(), &[0, 1, 2, 0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_empty_base_gives_empty_window() {
        let view = ViewWindow::build(&[], &Overlay::new(), 0, 16);

        assert!(view.is_empty());
        assert_eq!(view.index().get(0), None);
    }
}
