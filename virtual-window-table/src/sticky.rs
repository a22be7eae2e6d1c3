use alloc::vec::Vec;

/// Sticky header rows as seen by the table.
///
/// `base_offset` is the row's sticky offset from the top of the table when scrolled to 0.
pub trait StickyRows {
    fn row_count(&self) -> usize;

    fn base_offset(&self, row: usize) -> u64;

    /// Applies the visual shift for `row`. Hosts typically render this as `top = -shift`.
    fn set_shift(&mut self, row: usize, shift: i64);
}

/// Per-row base offsets of sticky rows, cached until the row count changes.
///
/// Scrolling only shifts the rendered content, so the base layout of sticky rows stays valid
/// between row-count changes and each frame only pays for the subtraction.
#[derive(Clone, Debug, Default)]
pub struct StickyRowOffsets {
    base: Vec<u64>,
    rebuilds: usize,
}

impl StickyRowOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// How many times the cache was rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn base_offset(&self, row: usize) -> Option<u64> {
        self.base.get(row).copied()
    }

    /// Drops the cache so the next sync with a non-zero row count rebuilds it.
    pub fn invalidate(&mut self) {
        self.base.clear();
    }

    /// Rebuilds the cache if `row_count` differs from the cached count.
    ///
    /// Returns `true` if the cache was rebuilt.
    pub fn sync(&mut self, row_count: usize, base_offset_of: impl FnMut(usize) -> u64) -> bool {
        if row_count == self.base.len() {
            return false;
        }
        self.base.clear();
        self.base.extend((0..row_count).map(base_offset_of));
        self.rebuilds += 1;
        vdebug!(
            rows = row_count,
            rebuilds = self.rebuilds,
            "StickyRowOffsets: rebuilt base offsets"
        );
        true
    }

    /// Shift of `row` for the given offset from the top of the content.
    pub fn shift(&self, row: usize, content_offset: u64) -> Option<i64> {
        self.base
            .get(row)
            .map(|&base| content_offset as i64 - base as i64)
    }

    /// Syncs the cache against `rows` and applies the shift of every row.
    pub fn render(&mut self, rows: &mut impl StickyRows, content_offset: u64) {
        self.sync(rows.row_count(), |row| rows.base_offset(row));
        for (row, &base) in self.base.iter().enumerate() {
            rows.set_shift(row, content_offset as i64 - base as i64);
        }
        vtrace!(
            rows = self.base.len(),
            content_offset,
            "StickyRowOffsets::render"
        );
    }
}
