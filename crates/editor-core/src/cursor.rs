use crate::enums::InputMode;

/// Extra caret positions in the hex pane that repeat every edit made at the
/// primary caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorSet {
    positions: Vec<usize>,
    busy: bool,
}

impl CursorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cursor at hex-pane column `position`.
    pub fn open(&mut self, position: usize) {
        self.positions.push(position);
    }

    /// Drops every cursor. Calling it on an empty set is fine.
    pub fn reset(&mut self) {
        self.positions.clear();
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Takes the sorted, deduplicated cursor list for one fan-out and marks
    /// the set busy. `None` while a fan-out is already running or when there
    /// is nothing to replay at.
    pub fn begin(&mut self) -> Option<Vec<usize>> {
        if self.busy || self.positions.is_empty() {
            return None;
        }

        self.positions.sort_unstable();
        self.positions.dedup();
        self.busy = true;

        Some(self.positions.clone())
    }

    /// Stores the cursor positions after a fan-out and releases the guard.
    pub fn finish(&mut self, positions: Vec<usize>) {
        self.positions = positions;
        self.busy = false;
    }
}

/// Edit made at the primary caret, to be repeated at every cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Broadcast {
    /// A hex digit was typed.
    Digit { digit: char, mode: InputMode },
    /// Backspace was pressed; `deleted` tells whether the primary caret
    /// actually removed a byte.
    Backspace { deleted: bool },
}

/// What [`fan_out`] needs from the buffer it edits.
///
/// Replays must not fan out again.
pub trait ReplayTarget {
    /// Rebuilds the view so the next replay sees the previous one.
    fn refresh(&mut self);

    /// Types `digit` at hex column `position`. Returns the caret after the
    /// edit, or `None` when the keystroke was declined.
    fn replay_digit(&mut self, position: usize, digit: char, mode: InputMode) -> Option<usize>;

    /// Backspace at hex column `position`. Returns the caret after a
    /// deletion, or `None` when nothing was deleted.
    fn replay_backspace(&mut self, position: usize) -> Option<usize>;
}

/// Repeats `broadcast` at every position in `cursors` and returns the
/// primary caret, moved for every byte that appeared or vanished in front of
/// it.
///
/// `position` is the primary caret *after* its own edit. `cursors` must be
/// sorted ascending; they are updated in place to where each replay left
/// its caret. Column arithmetic saturates, so a cursor far past the end is
/// simply declined by the target.
pub fn fan_out<T: ReplayTarget + ?Sized>(
    target: &mut T,
    cursors: &mut [usize],
    mut position: usize,
    broadcast: Broadcast,
) -> usize {
    const W: usize = renderer::HEX_CELL_WIDTH;

    target.refresh();

    match broadcast {
        Broadcast::Backspace { deleted } => {
            if deleted && position % W == 0 {
                for c in cursors.iter_mut().filter(|c| **c > position.saturating_add(W)) {
                    *c -= W;
                }
            }

            // Highest first, so a deletion never moves a cursor still waiting.
            for i in (0..cursors.len()).rev() {
                let at = cursors[i];
                if at % W != 0 {
                    continue;
                }

                let Some(next) = target.replay_backspace(at) else {
                    continue;
                };
                target.refresh();

                if at < position.saturating_add(W) {
                    position = position.saturating_sub(W);
                }
                cursors[i] = next;
                for later in &mut cursors[i + 1..] {
                    *later = later.saturating_sub(W);
                }
            }
        }
        Broadcast::Digit { digit, mode } => {
            let grows = mode == InputMode::Insert;

            if grows && position % W == 1 {
                for c in cursors.iter_mut().filter(|c| c.saturating_add(W) > position) {
                    *c = c.saturating_add(W);
                }
            }

            let mut offset = 0;
            for c in cursors.iter_mut() {
                let at = c.saturating_add(offset);
                let Some(landed) = target.replay_digit(at, digit, mode) else {
                    *c = at;
                    continue;
                };
                target.refresh();
                *c = landed;

                if grows && landed % W == 1 {
                    offset += W;
                    if landed < position {
                        position = position.saturating_add(W);
                    }
                }
            }
        }
    }

    tracing::trace!(?broadcast, position, cursors = cursors.len(), "fan-out done");

    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const W: usize = renderer::HEX_CELL_WIDTH;

    /// Plain byte vector standing in for a buffer, addressed in hex columns.
    struct Doc {
        bytes: Vec<u8>,
        refreshes: usize,
    }

    impl Doc {
        fn new(bytes: Vec<u8>) -> Self {
            Self { bytes, refreshes: 0 }
        }
    }

    impl ReplayTarget for Doc {
        fn refresh(&mut self) {
            self.refreshes += 1;
        }

        fn replay_digit(&mut self, position: usize, digit: char, mode: InputMode) -> Option<usize> {
            let nibble = u8::try_from(digit.to_digit(16)?).ok()?;
            let index = position / W;
            if index > self.bytes.len() {
                return None;
            }

            match position % W {
                0 if mode == InputMode::Insert || index == self.bytes.len() => {
                    self.bytes.insert(index, nibble << 4);
                    Some(position + 1)
                }
                0 => {
                    let old = self.bytes.get_mut(index)?;
                    *old = (nibble << 4) | (*old & 0x0f);
                    Some(position + 1)
                }
                1 => {
                    let old = self.bytes.get_mut(index)?;
                    *old = (*old & 0xf0) | nibble;
                    Some(position + 2)
                }
                _ => None,
            }
        }

        fn replay_backspace(&mut self, position: usize) -> Option<usize> {
            if position % W != 0 || position == 0 || position / W > self.bytes.len() {
                return None;
            }

            self.bytes.remove(position / W - 1);
            Some(position - W)
        }
    }

    #[test]
    fn test_begin_sorts_dedups_and_guards() {
        let mut set = CursorSet::new();
        assert_eq!(set.begin(), None);

        set.open(9);
        set.open(3);
        set.open(9);

        let snapshot = set.begin().unwrap();
        assert_eq!(snapshot, vec![3, 9]);
        assert!(set.is_busy());
        assert_eq!(set.begin(), None);

        set.finish(vec![4, 10]);
        assert!(!set.is_busy());
        assert_eq!(set.positions(), &[4, 10]);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut set = CursorSet::new();
        set.reset();
        set.open(6);
        set.reset();
        set.reset();

        assert!(set.is_empty());
    }

    #[test]
    fn test_overwrite_digit_keeps_offsets() {
        let mut doc = Doc::new(vec![0x11, 0x22, 0x33, 0x44]);
        // Primary typed 'a' at column 3.
        doc.bytes[1] = 0xa2;
        let mut cursors = vec![0, 9];

        let digit = Broadcast::Digit {
            digit: 'a',
            mode: InputMode::Overwrite,
        };
        let position = fan_out(&mut doc, &mut cursors, 4, digit);

        assert_eq!(position, 4);
        assert_eq!(cursors, vec![1, 10]);
        assert_eq!(doc.bytes, vec![0xa1, 0xa2, 0x33, 0xa4]);
        assert_eq!(doc.refreshes, 3);
    }

    #[test]
    fn test_insert_digit_shifts_later_cursors_and_primary() {
        let mut doc = Doc::new(vec![0, 1, 2, 3]);
        // Primary inserted 0xa0 in front of byte 1.
        doc.bytes.insert(1, 0xa0);
        let mut cursors = vec![0, 6];

        let digit = Broadcast::Digit {
            digit: 'a',
            mode: InputMode::Insert,
        };
        let position = fan_out(&mut doc, &mut cursors, 4, digit);

        assert_eq!(doc.bytes, vec![0xa0, 0, 0xa0, 1, 0xa0, 2, 3]);
        assert_eq!(position, 7);
        assert_eq!(cursors, vec![1, 13]);
    }

    #[test]
    fn test_backspace_fans_out_and_pulls_primary_back() {
        let mut doc = Doc::new(vec![0, 1, 2, 3, 4, 5]);
        // Primary deleted byte 2 from column 9.
        doc.bytes.remove(2);
        let mut cursors = vec![3, 15];

        let position = fan_out(&mut doc, &mut cursors, 6, Broadcast::Backspace { deleted: true });

        assert_eq!(doc.bytes, vec![1, 3, 5]);
        assert_eq!(position, 3);
        assert_eq!(cursors, vec![0, 6]);
    }

    #[test]
    fn test_backspace_skips_cursors_inside_a_byte() {
        let mut doc = Doc::new(vec![0, 1, 2]);
        let mut cursors = vec![4, 7];

        let position = fan_out(&mut doc, &mut cursors, 1, Broadcast::Backspace { deleted: false });

        assert_eq!(doc.bytes, vec![0, 1, 2]);
        assert_eq!(position, 1);
        assert_eq!(cursors, vec![4, 7]);
    }

    #[test]
    fn test_declined_replay_leaves_cursor() {
        let mut doc = Doc::new(vec![0x10]);
        let mut cursors = vec![2];

        let digit = Broadcast::Digit {
            digit: 'b',
            mode: InputMode::Overwrite,
        };
        fan_out(&mut doc, &mut cursors, 1, digit);

        assert_eq!(cursors, vec![2]);
        assert_eq!(doc.bytes, vec![0x10]);
    }

    #[test]
    fn test_backspace_from_next_cursor_removes_byte_under_primary() {
        let mut doc = Doc::new(vec![0, 1, 2]);
        // Primary deleted byte 0 from column 3 and now rests on byte 1.
        doc.bytes.remove(0);
        let mut cursors = vec![6];

        let position = fan_out(&mut doc, &mut cursors, 0, Broadcast::Backspace { deleted: true });

        assert_eq!(doc.bytes, vec![2]);
        assert_eq!(position, 0);
        assert_eq!(cursors, vec![0]);
    }

    #[test]
    fn test_far_positions_saturate() {
        let mut doc = Doc::new(vec![0, 1, 2]);
        let mut cursors = vec![3, usize::MAX];

        let position = fan_out(
            &mut doc,
            &mut cursors,
            usize::MAX,
            Broadcast::Backspace { deleted: false },
        );
        // The far cursor is declined; the one at 3 still pulls both carets back.
        assert_eq!(position, usize::MAX - W);
        assert_eq!(doc.bytes, vec![1, 2]);
        assert_eq!(cursors, vec![0, usize::MAX - W]);

        let mut cursors = vec![usize::MAX];
        let digit = Broadcast::Digit {
            digit: 'a',
            mode: InputMode::Insert,
        };
        let position = fan_out(&mut doc, &mut cursors, 1, digit);
        assert_eq!(position, 1);
        assert_eq!(cursors, vec![usize::MAX]);
        assert_eq!(doc.bytes, vec![1, 2]);
    }

    fn scenario() -> impl Strategy<Value = (usize, usize, BTreeSet<usize>)> {
        (2usize..40).prop_flat_map(|len| {
            (
                Just(len),
                0..len,
                proptest::collection::vec(0..len, 0..8).prop_map(|v| v.into_iter().collect()),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_insert_lands_before_every_cursor_byte((len, primary, set) in scenario()) {
            let original: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut set = set;
            set.remove(&primary);

            let mut doc = Doc::new(original.clone());
            doc.bytes.insert(primary, 0xa0);
            let mut cursors: Vec<usize> = set.iter().map(|i| i * W).collect();

            let digit = Broadcast::Digit { digit: 'a', mode: InputMode::Insert };
            let position = fan_out(&mut doc, &mut cursors, primary * W + 1, digit);

            let mut expected = Vec::new();
            for &b in &original {
                if set.contains(&usize::from(b)) || usize::from(b) == primary {
                    expected.push(0xa0);
                }
                expected.push(b);
            }
            prop_assert_eq!(&doc.bytes, &expected);

            let typed = (position - 1) / W;
            prop_assert_eq!(doc.bytes[typed], 0xa0);
            prop_assert_eq!(usize::from(doc.bytes[typed + 1]), primary);

            for (&c, &i) in cursors.iter().zip(set.iter()) {
                let typed = (c - 1) / W;
                prop_assert_eq!(doc.bytes[typed], 0xa0);
                prop_assert_eq!(usize::from(doc.bytes[typed + 1]), i);
            }
        }

        #[test]
        fn prop_backspace_removes_byte_before_every_cursor((len, primary, set) in scenario()) {
            let primary = primary.max(1);
            let original: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let set: BTreeSet<usize> = set.into_iter().filter(|&i| i != 0 && i != primary).collect();

            let mut doc = Doc::new(original.clone());
            doc.bytes.remove(primary - 1);
            let mut cursors: Vec<usize> = set.iter().map(|i| i * W).collect();

            let position = fan_out(
                &mut doc,
                &mut cursors,
                (primary - 1) * W,
                Broadcast::Backspace { deleted: true },
            );

            let expected: Vec<u8> = original
                .iter()
                .copied()
                .filter(|&b| {
                    let next = usize::from(b) + 1;
                    next != primary && !set.contains(&next)
                })
                .collect();
            prop_assert_eq!(&doc.bytes, &expected);

            // A caret rests on the first byte at or after its own that
            // survived; a cursor one byte higher may have deleted it.
            let resting = |i: usize| expected.iter().copied().find(|&b| usize::from(b) >= i);

            prop_assert_eq!(position % W, 0);
            prop_assert_eq!(doc.bytes.get(position / W).copied(), resting(primary));

            for (&c, &i) in cursors.iter().zip(set.iter()) {
                prop_assert_eq!(doc.bytes.get(c / W).copied(), resting(i));
            }
        }
    }
}
