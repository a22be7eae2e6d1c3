use crate::{
    ContentAnchor, ListRange, PositionIndex, ScrollBehavior, ScrollState, StrategyOptions,
    WindowError,
};

/// The viewport capabilities a [`ScrollStrategy`] is allowed to use.
///
/// Strategies never store a reference to their viewport. Instead, every trigger receives the
/// viewport as an argument for the duration of the call.
pub trait StrategyViewport {
    /// Number of items in the bound dataset.
    fn data_length(&self) -> usize;

    /// Size of the viewport along the scroll axis.
    fn viewport_size(&self) -> u32;

    /// Current scroll offset along the scroll axis.
    fn measure_scroll_offset(&self) -> u64;

    /// The range that is currently rendered.
    fn rendered_range(&self) -> ListRange;

    /// Publishes a new rendered range. Unchanged ranges are not republished.
    fn set_rendered_range(&mut self, range: ListRange);

    /// Publishes the total size of all content, rendered or not.
    fn set_total_content_size(&mut self, size: u64);

    /// Positions the rendered slice relative to the start of the content.
    fn set_rendered_content_offset(&mut self, offset: u64, anchor: ContentAnchor);

    /// Reports the index of the first visible item. Repeated indexes are not republished.
    fn report_scrolled_index(&mut self, index: usize);

    /// Asks the host to scroll to an absolute offset.
    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior);
}

/// Decides which items are rendered for a given scroll position.
pub trait ScrollStrategy {
    /// Attaches the strategy and performs an initial full computation.
    ///
    /// Returns [`WindowError::AlreadyAttached`] when called twice without `detach`.
    fn attach(&mut self, viewport: &mut dyn StrategyViewport) -> Result<(), WindowError>;

    /// Detaches the strategy and releases per-attachment state.
    ///
    /// Returns [`WindowError::NotAttached`] when not attached.
    fn detach(&mut self) -> Result<(), WindowError>;

    fn is_attached(&self) -> bool;

    /// Called when the viewport has been scrolled.
    fn on_content_scrolled(&mut self, viewport: &mut dyn StrategyViewport);

    /// Called when the number of items (or the viewport size) has changed.
    fn on_data_length_changed(&mut self, viewport: &mut dyn StrategyViewport);

    /// Called after the host has rendered a new range.
    fn on_content_rendered(&mut self, _viewport: &mut dyn StrategyViewport) {}

    /// Called after the host has applied a new rendered content offset.
    fn on_rendered_offset_changed(&mut self, _viewport: &mut dyn StrategyViewport) {}

    /// Scrolls to the item at `index`.
    fn scroll_to_index(
        &mut self,
        index: usize,
        behavior: ScrollBehavior,
        viewport: &mut dyn StrategyViewport,
    );
}

/// Result of a window computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComputedWindow {
    pub range: ListRange,
    /// Index of the item at the scroll offset.
    pub scrolled_index: usize,
}

/// A [`ScrollStrategy`] for items of arbitrary (per-index) size.
///
/// The rendered range extends `min_buffer_px..=max_buffer_px` beyond the visible area on both
/// sides. An edge of the range only moves once it leaves that band, and then jumps to the
/// `max_buffer_px` bound, so small scroll deltas do not change the range.
#[derive(Clone, Debug, Default)]
pub struct VariableSizeStrategy {
    options: StrategyOptions,
    positions: PositionIndex,
    attached: bool,
}

impl VariableSizeStrategy {
    pub fn new(options: StrategyOptions) -> Self {
        Self {
            options,
            positions: PositionIndex::new(),
            attached: false,
        }
    }

    pub fn options(&self) -> &StrategyOptions {
        &self.options
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    /// Replaces the size function and buffers, then recomputes everything.
    pub fn set_options(&mut self, options: StrategyOptions, viewport: &mut dyn StrategyViewport) {
        vdebug!(
            min_buffer_px = options.min_buffer_px,
            max_buffer_px = options.max_buffer_px,
            "VariableSizeStrategy::set_options"
        );
        self.options = options;
        self.reset_positions(viewport);
        self.update_total_content_size(viewport);
        self.update_rendered_range(viewport);
    }

    /// Records a new measured size for `index` and recomputes offsets from there on.
    pub fn update_item_size(
        &mut self,
        index: usize,
        size: u32,
        viewport: &mut dyn StrategyViewport,
    ) {
        if !self.attached {
            vwarn!(index, "VariableSizeStrategy::update_item_size while unattached");
            return;
        }
        self.positions.update_size(index, size);
        self.update_total_content_size(viewport);
        self.update_rendered_range(viewport);
    }

    /// Computes the window for the given measurements without publishing anything.
    ///
    /// `current` is the currently rendered range; its edges are kept while they stay inside the
    /// buffer band.
    ///
    /// A scroll offset at or past the end of the content is treated as the last item's offset,
    /// so over-scrolling reports the last index as scrolled rather than index 0.
    pub fn compute_window(&self, current: ListRange, state: ScrollState) -> ComputedWindow {
        let len = self.positions.len();
        if len == 0 {
            return ComputedWindow {
                range: ListRange::EMPTY,
                scrolled_index: 0,
            };
        }

        // Offsets past the end of the content resolve to the last item rather than falling back
        // to index 0, which would render the entire dataset.
        let total = self.positions.total_size();
        let scroll_offset = state.scroll_offset.min(total.saturating_sub(1));
        let viewport_end = scroll_offset.saturating_add(state.viewport_size as u64);

        let visible = self.positions.index_at_offset(scroll_offset, 0);
        let start = self.start_index(current.start, visible);
        let end = self.end_index(current.end, viewport_end, len);

        let range = ListRange {
            start: start.min(end),
            end,
        }
        .clamp_to(len);

        ComputedWindow {
            range,
            scrolled_index: visible,
        }
    }

    fn start_index(&self, current: usize, visible: usize) -> usize {
        let base = self.positions.position(visible).offset;
        let probe = |buffer: u32| {
            base.checked_sub(buffer as u64)
                .map_or(0, |offset| self.positions.index_at_offset(offset, 0))
        };
        let min_index = probe(self.options.min_buffer_px);
        let max_index = probe(self.options.max_buffer_px);
        if current > min_index || current < max_index {
            max_index
        } else {
            current
        }
    }

    fn end_index(&self, current: usize, viewport_end: u64, len: usize) -> usize {
        let last = len - 1;
        let visible_end = self.positions.index_at_offset(viewport_end, last);
        let base = self.positions.position(visible_end).offset;
        let probe = |buffer: u32| {
            let offset = base.saturating_add(buffer as u64);
            self.positions.index_at_offset(offset, last) + 1
        };
        let min_end = probe(self.options.min_buffer_px);
        let max_end = probe(self.options.max_buffer_px);
        if current < min_end || current > max_end {
            max_end
        } else {
            current
        }
    }

    fn reset_positions(&mut self, viewport: &mut dyn StrategyViewport) {
        if !self.attached {
            return;
        }
        let options = &self.options;
        self.positions
            .reset_all(|i| options.size_of(i), viewport.data_length());
    }

    fn update_total_content_size(&mut self, viewport: &mut dyn StrategyViewport) {
        if !self.attached {
            return;
        }
        viewport.set_total_content_size(self.positions.total_size());
    }

    fn update_rendered_range(&mut self, viewport: &mut dyn StrategyViewport) {
        if !self.attached {
            return;
        }
        let state = ScrollState {
            viewport_size: viewport.viewport_size(),
            scroll_offset: viewport.measure_scroll_offset(),
            total_content_size: self.positions.total_size(),
        };
        let current = viewport.rendered_range();
        let window = self.compute_window(current, state);
        vtrace!(
            scroll_offset = state.scroll_offset,
            viewport_size = state.viewport_size,
            start = window.range.start,
            end = window.range.end,
            scrolled_index = window.scrolled_index,
            "VariableSizeStrategy::update_rendered_range"
        );

        viewport.set_rendered_range(window.range);
        viewport.set_rendered_content_offset(
            self.positions.position(window.range.start).offset,
            ContentAnchor::ToStart,
        );
        viewport.report_scrolled_index(window.scrolled_index);
    }
}

impl ScrollStrategy for VariableSizeStrategy {
    fn attach(&mut self, viewport: &mut dyn StrategyViewport) -> Result<(), WindowError> {
        if self.attached {
            vwarn!("VariableSizeStrategy::attach while already attached");
            return Err(WindowError::AlreadyAttached);
        }
        vdebug!(
            data_length = viewport.data_length(),
            viewport_size = viewport.viewport_size(),
            "VariableSizeStrategy::attach"
        );
        self.attached = true;
        self.reset_positions(viewport);
        self.update_total_content_size(viewport);
        self.update_rendered_range(viewport);
        Ok(())
    }

    fn detach(&mut self) -> Result<(), WindowError> {
        if !self.attached {
            vwarn!("VariableSizeStrategy::detach while unattached");
            return Err(WindowError::NotAttached);
        }
        vdebug!("VariableSizeStrategy::detach");
        self.attached = false;
        self.positions.clear();
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn on_content_scrolled(&mut self, viewport: &mut dyn StrategyViewport) {
        self.update_rendered_range(viewport);
    }

    fn on_data_length_changed(&mut self, viewport: &mut dyn StrategyViewport) {
        self.reset_positions(viewport);
        self.update_total_content_size(viewport);
        self.update_rendered_range(viewport);
    }

    fn scroll_to_index(
        &mut self,
        index: usize,
        behavior: ScrollBehavior,
        viewport: &mut dyn StrategyViewport,
    ) {
        if !self.attached {
            return;
        }
        if let Some(position) = self.positions.get(index) {
            viewport.scroll_to_offset(position.offset, behavior);
        }
    }
}
