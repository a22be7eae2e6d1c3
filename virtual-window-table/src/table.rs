use virtual_window::{
    AttachToken, ListRange, Orientation, RenderReport, ScrollBehavior, SlotFactory,
    StrategyOptions, VariableSizeStrategy, ViewportController, ViewportHost, ViewportOptions,
    WindowError, WindowedRenderer,
};

use crate::{StickyRowOffsets, StickyRows, table_content_size};

/// What a [`TableWindowing::run_frame`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableFrame {
    /// The coalesced scroll/resize work ran.
    pub recomputed: bool,
    /// Body row operations performed for the new range.
    pub rows: RenderReport,
    /// The scrolled index changed and sticky rows were repositioned.
    pub sticky_updated: bool,
}

/// Windowed body rows for a table with sticky header rows.
///
/// Wires a [`ViewportController`] running a [`VariableSizeStrategy`] to a [`WindowedRenderer`]
/// for the body rows. Whenever the scrolled index changes, sticky rows are shifted by the
/// offset to the start of the rendered content.
pub struct TableWindowing<H, T, F: SlotFactory<T>> {
    controller: ViewportController<H, VariableSizeStrategy>,
    token: Option<AttachToken>,
    rows: WindowedRenderer<T, F>,
    sticky: StickyRowOffsets,
    last_scrolled_index: Option<usize>,
}

impl<H: ViewportHost, T, F: SlotFactory<T>> TableWindowing<H, T, F> {
    /// Attaches a strategy built from `strategy` to `host` and prepares the row renderer.
    ///
    /// Rows are not rendered until the first [`Self::run_frame`] or [`Self::data_changed`].
    pub fn new(
        host: H,
        options: ViewportOptions,
        strategy: StrategyOptions,
        rows: WindowedRenderer<T, F>,
    ) -> Result<Self, WindowError> {
        let mut controller = ViewportController::new(host, options);
        let token = controller.attach(VariableSizeStrategy::new(strategy))?;
        vdebug!(
            rows = controller.data_length(),
            "TableWindowing: attached"
        );
        Ok(Self {
            controller,
            token: Some(token),
            rows,
            sticky: StickyRowOffsets::new(),
            last_scrolled_index: None,
        })
    }

    pub fn controller(&self) -> &ViewportController<H, VariableSizeStrategy> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewportController<H, VariableSizeStrategy> {
        &mut self.controller
    }

    pub fn rows(&self) -> &WindowedRenderer<T, F> {
        &self.rows
    }

    pub fn sticky(&self) -> &StickyRowOffsets {
        &self.sticky
    }

    pub fn is_attached(&self) -> bool {
        self.token.is_some()
    }

    pub fn rendered_range(&self) -> ListRange {
        self.controller.rendered_range()
    }

    /// The part of `data` that is currently rendered.
    pub fn visible_rows<'a>(&self, data: &'a [T]) -> &'a [T] {
        self.controller.rendered_range().slice(data)
    }

    pub fn notify_scrolled(&mut self) {
        self.controller.notify_scrolled();
    }

    pub fn notify_resized(&mut self) {
        self.controller.notify_resized();
    }

    /// Runs one frame: coalesced viewport work, body row diffing, and sticky row offsets.
    pub fn run_frame(&mut self, data: &[T], sticky: &mut impl StickyRows) -> TableFrame {
        let recomputed = self.controller.run_frame();
        let rows = self.rows.render_range(self.controller.rendered_range(), data);
        let sticky_updated = self.refresh_sticky_rows(sticky);
        TableFrame {
            recomputed,
            rows,
            sticky_updated,
        }
    }

    /// Recomputes after the data set changed and rebinds every rendered row.
    pub fn data_changed(&mut self, data: &[T]) -> Result<RenderReport, WindowError> {
        self.controller.data_length_changed()?;
        Ok(self
            .rows
            .render_range_rebinding(self.controller.rendered_range(), data))
    }

    /// Applies a measured size of body row `index`.
    pub fn update_row_size(&mut self, index: usize, size: u32) -> Result<(), WindowError> {
        self.controller
            .with_strategy(|s, vp| s.update_item_size(index, size, vp))
    }

    /// Overrides the total content size with the measured sizes of every table section.
    pub fn set_measured_content_size(&mut self, header: &[f64], body: &[f64], footer: &[f64]) {
        let size = table_content_size(header, body, footer);
        vtrace!(size, "TableWindowing::set_measured_content_size");
        self.controller.set_total_content_size(size);
    }

    /// Repositions sticky rows if the scrolled index changed since the last call.
    ///
    /// Returns `true` if the rows were repositioned.
    pub fn refresh_sticky_rows(&mut self, sticky: &mut impl StickyRows) -> bool {
        let scrolled = self.controller.scrolled_index();
        if scrolled == self.last_scrolled_index {
            return false;
        }
        self.last_scrolled_index = scrolled;
        self.render_sticky_rows(sticky);
        true
    }

    /// Repositions sticky rows unconditionally.
    pub fn render_sticky_rows(&mut self, sticky: &mut impl StickyRows) {
        let offset = self.controller.offset_to_rendered_content_start().unwrap_or(0);
        self.sticky.render(sticky, offset);
    }

    /// Sums the measured sizes of the rendered body rows in `range`, along the controller's
    /// orientation.
    ///
    /// Fails with [`WindowError::UnrenderedRange`] if `range` is not fully rendered.
    pub fn measure_range_size(
        &self,
        range: ListRange,
        measure: impl FnMut(&F::Slot, Orientation) -> u32,
    ) -> Result<u64, WindowError> {
        self.rows
            .measure_range_size(range, self.controller.orientation(), measure)
    }

    /// Reports the rendered body size to the controller.
    pub fn content_rendered(
        &mut self,
        measure: impl FnMut(&F::Slot, Orientation) -> u32,
    ) -> Result<(), WindowError> {
        let size = self.measure_range_size(self.rows.rendered_range(), measure)?;
        self.controller.content_rendered(size)
    }

    pub fn scroll_to_index(
        &mut self,
        index: usize,
        behavior: ScrollBehavior,
    ) -> Result<(), WindowError> {
        self.controller.scroll_to_index(index, behavior)
    }

    /// Detaches the strategy and destroys every row slot.
    ///
    /// Returns how many slots were destroyed. Detaching twice fails with
    /// [`WindowError::NotAttached`].
    pub fn detach(&mut self) -> Result<usize, WindowError> {
        let Some(token) = self.token.take() else {
            vwarn!("TableWindowing::detach while detached");
            return Err(WindowError::NotAttached);
        };
        self.controller.detach(token)?;
        self.sticky.invalidate();
        self.last_scrolled_index = None;
        let destroyed = self.rows.teardown();
        vdebug!(destroyed, "TableWindowing: detached");
        Ok(destroyed)
    }
}

impl<H, T, F> core::fmt::Debug for TableWindowing<H, T, F>
where
    H: core::fmt::Debug,
    F: SlotFactory<T> + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableWindowing")
            .field("controller", &self.controller)
            .field("rows", &self.rows)
            .field("sticky", &self.sticky)
            .field("attached", &self.token.is_some())
            .finish()
    }
}
