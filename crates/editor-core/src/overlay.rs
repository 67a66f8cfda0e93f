use std::collections::BTreeMap;

use crate::enums::EditKind;
use crate::history::LogRecord;

/// Sparse edits over the original file.
///
/// Each entry is keyed by an *anchor*: the offset of the one original byte it
/// stands in for. The entry's bytes are what the document shows at that point
/// instead of the original byte, so
///
/// - `[b]` replaces the original byte with `b`,
/// - `[a, b, c]` replaces it and adds two more bytes,
/// - `[]` is a tombstone: the original byte is deleted.
///
/// An absent anchor shows the original byte unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    entries: BTreeMap<u64, Vec<u8>>,
}

/*

====================================
============ QUERIES ===============
====================================

*/

impl Overlay {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, anchor: u64) -> Option<&[u8]> {
        self.entries.get(&anchor).map(Vec::as_slice)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, anchor: u64) -> bool {
        self.entries.contains_key(&anchor)
    }

    /// Entries in ascending anchor order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[u8])> {
        self.entries.iter().map(|(&anchor, bytes)| (anchor, bytes.as_slice()))
    }

    /// Number of anchors carrying an entry (tombstones included).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain map view, mostly for assertions.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<u64, Vec<u8>> {
        &self.entries
    }

    /// Size of the document once the overlay is applied to `base_len`
    /// original bytes: every entry stands in for exactly one original byte.
    #[must_use]
    pub fn logical_size(&self, base_len: u64) -> u64 {
        let (anchors, bytes) = self.fold_before(u64::MAX);

        base_len.saturating_sub(anchors).saturating_add(bytes)
    }

    /// Number of logical bytes in front of byte `shift` of the slot anchored
    /// at `index`: original bytes and every overlay byte below `index` are
    /// counted individually, then `shift` is added.
    #[must_use]
    pub fn get_position(&self, index: u64, shift: u64) -> u64 {
        let (anchors, bytes) = self.fold_before(index);

        // `anchors <= index`: every anchor counted is a distinct value below it.
        (index - anchors).saturating_add(bytes).saturating_add(shift)
    }

    /// `(entry count, total entry bytes)` over anchors strictly below `limit`.
    fn fold_before(&self, limit: u64) -> (u64, u64) {
        self.entries
            .range(..limit)
            .fold((0u64, 0u64), |(anchors, bytes), (_, entry)| {
                (anchors + 1, bytes.saturating_add(entry.len() as u64))
            })
    }
}

/*

====================================
======= RECORDED MUTATIONS =========
====================================

*/

impl Overlay {
    /// Inserts `byte` at `shift` inside the entry anchored at `anchor`,
    /// creating the entry when it is absent.
    pub fn insert(&mut self, anchor: u64, shift: usize, byte: u8) -> LogRecord {
        let record = LogRecord {
            kind: EditKind::Insert,
            anchor,
            snapshot: self.entries.get(&anchor).cloned(),
            byte,
            shift,
        };

        self.apply(&record);
        record
    }

    /// Removes byte `shift` of an existing entry. The entry stays behind as a
    /// tombstone when it runs empty, since the original byte it replaced is
    /// still gone. `None` when there is no such byte.
    pub fn remove(&mut self, anchor: u64, shift: usize) -> Option<LogRecord> {
        let entry = self.entries.get(&anchor)?;
        let byte = *entry.get(shift)?;
        let record = LogRecord {
            kind: EditKind::Delete,
            anchor,
            snapshot: Some(entry.clone()),
            byte,
            shift,
        };

        self.apply(&record);
        Some(record)
    }

    /// Deletes the unedited original byte `original` at `anchor` by leaving a
    /// tombstone. `None` if the anchor already has an entry.
    pub fn tombstone(&mut self, anchor: u64, original: u8) -> Option<LogRecord> {
        if self.entries.contains_key(&anchor) {
            return None;
        }

        let record = LogRecord {
            kind: EditKind::Delete,
            anchor,
            snapshot: None,
            byte: original,
            shift: 0,
        };

        self.apply(&record);
        Some(record)
    }

    /// Replaces byte `shift` of an existing entry: a delete then an insert
    /// at the same shift.
    pub fn overwrite(&mut self, anchor: u64, shift: usize, byte: u8) -> Vec<LogRecord> {
        let mut records = Vec::with_capacity(2);

        if let Some(removed) = self.remove(anchor, shift) {
            records.push(removed);
        }
        records.push(self.insert(anchor, shift, byte));

        records
    }
}

/*

====================================
====== REPLAY (undo / redo) ========
====================================

*/

impl Overlay {
    /// Forward effect of `record`.
    pub fn apply(&mut self, record: &LogRecord) {
        match record.kind {
            EditKind::Insert => {
                let entry = self.entries.entry(record.anchor).or_default();
                let at = record.shift.min(entry.len());

                entry.insert(at, record.byte);
            }
            EditKind::Delete => match self.entries.get_mut(&record.anchor) {
                Some(entry) => {
                    if record.shift < entry.len() {
                        entry.remove(record.shift);
                    }
                }
                None => {
                    self.entries.insert(record.anchor, Vec::new());
                }
            },
        }

        tracing::trace!(
            kind = ?record.kind,
            anchor = record.anchor,
            shift = record.shift,
            byte = record.byte,
            "overlay apply"
        );
    }

    /// Inverse effect of `record`; leaves the entry exactly as `snapshot`.
    pub fn revert(&mut self, record: &LogRecord) {
        match record.kind {
            EditKind::Insert => {
                if let Some(entry) = self.entries.get_mut(&record.anchor) {
                    if record.shift < entry.len() {
                        entry.remove(record.shift);
                    }
                    if entry.is_empty() && record.snapshot.is_none() {
                        self.entries.remove(&record.anchor);
                    }
                }
            }
            EditKind::Delete => match record.snapshot {
                None => {
                    self.entries.remove(&record.anchor);
                }
                Some(_) => {
                    let entry = self.entries.entry(record.anchor).or_default();
                    let at = record.shift.min(entry.len());

                    entry.insert(at, record.byte);
                }
            },
        }

        tracing::trace!(
            kind = ?record.kind,
            anchor = record.anchor,
            shift = record.shift,
            "overlay revert"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(u64, &[u8])]) -> BTreeMap<u64, Vec<u8>> {
        pairs.iter().map(|&(k, v)| (k, v.to_vec())).collect()
    }

    #[test]
    fn test_insert_creates_entry_and_reverts_to_absent() {
        let mut overlay = Overlay::new();
        let record = overlay.insert(0, 0, 0x01);

        assert_eq!(overlay.as_map(), &map(&[(0, &[0x01])]));
        assert_eq!(record.snapshot, None);

        overlay.revert(&record);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut overlay = Overlay::new();
        overlay.insert(0, 0, 0x01);

        let record = overlay.remove(0, 0).unwrap();
        assert_eq!(overlay.as_map(), &map(&[(0, &[])]));
        assert_eq!(record.byte, 0x01);

        overlay.revert(&record);
        assert_eq!(overlay.as_map(), &map(&[(0, &[0x01])]));

        overlay.apply(&record);
        assert_eq!(overlay.as_map(), &map(&[(0, &[])]));
    }

    #[test]
    fn test_remove_out_of_range_is_none() {
        let mut overlay = Overlay::new();
        overlay.insert(3, 0, 0xaa);

        assert!(overlay.remove(3, 1).is_none());
        assert!(overlay.remove(4, 0).is_none());
    }

    #[test]
    fn test_tombstone_of_original_byte() {
        let mut overlay = Overlay::new();
        let record = overlay.tombstone(5, b'x').unwrap();

        assert_eq!(overlay.get(5), Some(&[][..]));
        assert!(overlay.tombstone(5, b'x').is_none());

        overlay.revert(&record);
        assert!(overlay.is_empty());

        overlay.apply(&record);
        assert_eq!(overlay.get(5), Some(&[][..]));
    }

    #[test]
    fn test_overwrite_is_delete_then_insert() {
        let mut overlay = Overlay::new();
        overlay.insert(2, 0, 0x10);
        overlay.insert(2, 1, 0x20);

        let records = overlay.overwrite(2, 1, 0x99);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, EditKind::Delete);
        assert_eq!(records[1].kind, EditKind::Insert);
        assert_eq!(overlay.get(2), Some(&[0x10, 0x99][..]));

        for record in records.iter().rev() {
            overlay.revert(record);
        }
        assert_eq!(overlay.get(2), Some(&[0x10, 0x20][..]));
    }

    #[test]
    fn test_logical_size() {
        let mut overlay = Overlay::new();
        assert_eq!(overlay.logical_size(16), 16);

        overlay.insert(0, 0, 1);
        overlay.insert(0, 1, 2);
        overlay.insert(0, 2, 3);
        overlay.tombstone(9, 0);

        assert_eq!(overlay.logical_size(16), 16 + 2 - 1);
    }

    #[test]
    fn test_get_position_without_edits() {
        let overlay = Overlay::new();

        assert_eq!(overlay.get_position(1, 0), 1);
        assert_eq!(overlay.get_position(1, 1), 2);
    }

    #[test]
    fn test_get_position_counts_overlay_bytes() {
        let mut overlay = Overlay::new();
        overlay.insert(1, 0, 0xa);
        overlay.insert(1, 1, 0xb);
        overlay.insert(1, 2, 0xc);
        overlay.tombstone(3, 0);

        // 0, then three bytes for anchor 1, then 2, nothing for 3.
        assert_eq!(overlay.get_position(1, 0), 1);
        assert_eq!(overlay.get_position(2, 0), 4);
        assert_eq!(overlay.get_position(4, 0), 5);
        assert_eq!(overlay.get_position(4, 2), 7);
    }
}
