use alloc::vec::Vec;

use crate::ItemPosition;

/// Per-item offsets and sizes for variable-size windowing.
///
/// Entries are stored densely, so `position(i)` is `O(1)` and `index_at_offset` is a binary
/// search. Size changes recompute the offsets of every later item (`O(len - index)`).
///
/// Invariant: `offset[0] == 0` and `offset[i + 1] == offset[i] + size[i]`.
#[derive(Clone, Debug, Default)]
pub struct PositionIndex {
    positions: Vec<ItemPosition>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rebuilds every entry from index 0 using `item_size`.
    pub fn reset_all(&mut self, item_size: impl Fn(usize) -> u32, len: usize) {
        vdebug!(len, "PositionIndex::reset_all");
        self.positions.clear();
        self.positions.reserve_exact(len);
        let mut offset = 0u64;
        for i in 0..len {
            let size = item_size(i);
            self.positions.push(ItemPosition { offset, size });
            offset = offset.saturating_add(size as u64);
        }
    }

    /// Sets the size of `index` and shifts the offsets of all later items.
    ///
    /// Earlier entries are left untouched. An index without an entry is ignored.
    ///
    /// Returns the size delta that was applied.
    pub fn update_size(&mut self, index: usize, size: u32) -> i64 {
        let Some(entry) = self.positions.get_mut(index) else {
            vwarn!(
                index,
                len = self.positions.len(),
                "PositionIndex::update_size: index has no entry"
            );
            return 0;
        };
        let delta = size as i64 - entry.size as i64;
        if delta == 0 {
            return 0;
        }
        entry.size = size;
        let mut offset = entry.end();
        for p in &mut self.positions[index + 1..] {
            p.offset = offset;
            offset = offset.saturating_add(p.size as u64);
        }
        vtrace!(index, size, delta, "PositionIndex::update_size");
        delta
    }

    pub fn get(&self, index: usize) -> Option<ItemPosition> {
        self.positions.get(index).copied()
    }

    /// Returns the position of `index`, or a zero offset/size for an index without an entry.
    pub fn position(&self, index: usize) -> ItemPosition {
        self.get(index).unwrap_or_default()
    }

    /// Returns the index of the item containing `offset`, or `fallback` when no item does (empty
    /// index, or offset at/after the end of the content).
    ///
    /// Zero-size items never contain an offset.
    pub fn index_at_offset(&self, offset: u64, fallback: usize) -> usize {
        // Ends are non-decreasing, so the first item ending after `offset` is the one that
        // contains it: its start is the previous item's end, which is <= offset.
        let i = self.positions.partition_point(|p| p.end() <= offset);
        match self.positions.get(i) {
            Some(p) if p.contains(offset) => i,
            _ => fallback,
        }
    }

    /// End offset of the last item, or 0 when empty.
    pub fn total_size(&self) -> u64 {
        self.positions.last().map_or(0, ItemPosition::end)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemPosition> + '_ {
        self.positions.iter().copied()
    }
}
