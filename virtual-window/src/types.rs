/// Offset and extent of a single item along the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPosition {
    /// Start offset of the item, relative to the start of the content.
    pub offset: u64,
    /// Size of the item (height for vertical viewports, width for horizontal ones).
    pub size: u32,
}

impl ItemPosition {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size as u64)
    }

    /// Returns `true` when `offset` falls inside `[self.offset, self.end())`.
    pub fn contains(&self, offset: u64) -> bool {
        self.offset <= offset && offset < self.end()
    }
}

/// A half-open `[start, end)` interval of item indexes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListRange {
    pub start: usize,
    pub end: usize, // exclusive
}

impl ListRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "ListRange start > end ({start} > {end})");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Returns `true` when every index of `other` is also in `self`.
    ///
    /// An empty `other` is contained in any range.
    pub fn contains_range(&self, other: ListRange) -> bool {
        other.is_empty() || (other.start >= self.start && other.end <= self.end)
    }

    /// Clamps the range so that `start <= end <= len`.
    pub fn clamp_to(&self, len: usize) -> Self {
        let end = self.end.min(len);
        Self {
            start: self.start.min(end),
            end,
        }
    }

    /// Returns the part of `data` covered by this range (clamped to `data.len()`).
    pub fn slice<'a, T>(&self, data: &'a [T]) -> &'a [T] {
        let r = self.clamp_to(data.len());
        &data[r.start..r.end]
    }

    pub fn iter(&self) -> core::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<core::ops::Range<usize>> for ListRange {
    fn from(r: core::ops::Range<usize>) -> Self {
        Self {
            start: r.start,
            end: r.end.max(r.start),
        }
    }
}

/// Scroll axis of a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Animation behavior requested from the host for programmatic scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Instant,
    Smooth,
}

/// Which edge of the rendered content a content offset refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentAnchor {
    #[default]
    ToStart,
    /// The offset positions the *end* of the rendered content. The controller rewrites it as a
    /// `ToStart` offset once the host reports the rendered content size.
    ToEnd,
}

/// The offset the host should apply to the rendered slice so it lines up with the scroll
/// position of the items it represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedContentOffset {
    pub offset: u64,
    pub anchor: ContentAnchor,
}

/// A snapshot of the scroll measurements the windowing algorithm works from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub viewport_size: u32,
    pub scroll_offset: u64,
    pub total_content_size: u64,
}

impl ScrollState {
    /// End of the visible area (`scroll_offset + viewport_size`).
    pub fn viewport_end(&self) -> u64 {
        self.scroll_offset.saturating_add(self.viewport_size as u64)
    }
}
