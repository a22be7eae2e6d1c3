use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    ContentAnchor, Emitter, ListRange, Orientation, RenderedContentOffset, ScrollBehavior,
    ScrollState, ScrollStrategy, StrategyViewport, WindowError,
};

/// Measurements and scroll control provided by the host scroll container.
pub trait ViewportHost {
    /// Size of the visible area along the scroll axis.
    fn viewport_size(&self) -> u32;

    /// Current scroll offset along the scroll axis.
    fn measure_scroll_offset(&self) -> u64;

    /// Number of items in the bound dataset.
    fn data_length(&self) -> usize;

    /// Scrolls the container to an absolute offset.
    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior);
}

/// Configuration for [`ViewportController`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportOptions {
    pub orientation: Orientation,
}

impl ViewportOptions {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Proof of a successful [`ViewportController::attach`]; required to detach.
///
/// Tokens are not `Clone`. Every attachment of every controller gets a distinct token, so a
/// token from an earlier attachment or from another controller is rejected.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "the token is required to detach the strategy"]
pub struct AttachToken {
    generation: usize,
}

static NEXT_GENERATION: AtomicUsize = AtomicUsize::new(1);

fn next_generation() -> usize {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

struct ViewportState {
    viewport_size: u32,
    rendered_range: ListRange,
    total_content_size: u64,
    content_offset: RenderedContentOffset,
    content_offset_needs_rewrite: bool,

    range_changed: bool,
    offset_changed: bool,

    rendered_range_stream: Emitter<ListRange>,
    scrolled_index_stream: Emitter<usize>,
    total_content_size_stream: Emitter<u64>,
}

impl ViewportState {
    fn new() -> Self {
        Self {
            viewport_size: 0,
            rendered_range: ListRange::EMPTY,
            total_content_size: 0,
            content_offset: RenderedContentOffset::default(),
            content_offset_needs_rewrite: false,
            range_changed: false,
            offset_changed: false,
            rendered_range_stream: Emitter::new(),
            scrolled_index_stream: Emitter::distinct(),
            total_content_size_stream: Emitter::new(),
        }
    }

    fn reset_for_attach(&mut self) {
        self.rendered_range = ListRange::EMPTY;
        self.total_content_size = 0;
        self.content_offset = RenderedContentOffset::default();
        self.content_offset_needs_rewrite = false;
        self.range_changed = false;
        self.offset_changed = false;
        if self.rendered_range_stream.is_completed() {
            self.rendered_range_stream = Emitter::new();
        }
        if self.scrolled_index_stream.is_completed() {
            self.scrolled_index_stream = Emitter::distinct();
        }
        if self.total_content_size_stream.is_completed() {
            self.total_content_size_stream = Emitter::new();
        }
    }

    fn complete_streams(&mut self) {
        self.rendered_range_stream.complete();
        self.scrolled_index_stream.complete();
        self.total_content_size_stream.complete();
    }
}

/// The strategy-facing view of a controller, alive for the duration of one trigger.
struct Link<'a, H> {
    host: &'a mut H,
    state: &'a mut ViewportState,
}

impl<H: ViewportHost> StrategyViewport for Link<'_, H> {
    fn data_length(&self) -> usize {
        self.host.data_length()
    }

    fn viewport_size(&self) -> u32 {
        self.state.viewport_size
    }

    fn measure_scroll_offset(&self) -> u64 {
        self.host.measure_scroll_offset()
    }

    fn rendered_range(&self) -> ListRange {
        self.state.rendered_range
    }

    fn set_rendered_range(&mut self, range: ListRange) {
        if self.state.rendered_range == range {
            return;
        }
        vtrace!(
            start = range.start,
            end = range.end,
            "ViewportController: rendered range changed"
        );
        self.state.rendered_range = range;
        self.state.range_changed = true;
        self.state.rendered_range_stream.emit(range);
    }

    fn set_total_content_size(&mut self, size: u64) {
        if self.state.total_content_size == size {
            return;
        }
        self.state.total_content_size = size;
        self.state.total_content_size_stream.emit(size);
    }

    fn set_rendered_content_offset(&mut self, offset: u64, anchor: ContentAnchor) {
        let next = RenderedContentOffset { offset, anchor };
        if anchor == ContentAnchor::ToEnd {
            self.state.content_offset_needs_rewrite = true;
        }
        if self.state.content_offset == next {
            return;
        }
        self.state.content_offset = next;
        self.state.offset_changed = true;
    }

    fn report_scrolled_index(&mut self, index: usize) {
        self.state.scrolled_index_stream.emit(index);
    }

    fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior) {
        self.host.scroll_to_offset(offset, behavior);
    }
}

/// Connects a [`ScrollStrategy`] to a host viewport.
///
/// The controller owns the strategy while it is attached. Scroll and resize signals from the
/// host are coalesced: [`Self::notify_scrolled`] / [`Self::notify_resized`] only mark work as
/// pending, and [`Self::run_frame`] performs at most one window recomputation per call. Hosts
/// are expected to call `run_frame` once per render opportunity (animation frame, tick, ...).
///
/// Changes are published through three streams: the rendered range, the scrolled index
/// (distinct until changed), and the total content size.
pub struct ViewportController<H, S> {
    host: H,
    options: ViewportOptions,
    strategy: Option<S>,
    state: ViewportState,
    generation: usize,
    scroll_pending: bool,
    resize_pending: bool,
}

impl<H: ViewportHost, S: ScrollStrategy> ViewportController<H, S> {
    pub fn new(host: H, options: ViewportOptions) -> Self {
        Self {
            host,
            options,
            strategy: None,
            state: ViewportState::new(),
            generation: 0,
            scroll_pending: false,
            resize_pending: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn orientation(&self) -> Orientation {
        self.options.orientation
    }

    pub fn is_attached(&self) -> bool {
        self.strategy.is_some()
    }

    pub fn strategy(&self) -> Option<&S> {
        self.strategy.as_ref()
    }

    /// Attaches `strategy`, measures the viewport, and runs the strategy's initial computation.
    ///
    /// An initial scroll recomputation is queued for the next frame.
    ///
    /// Fails with [`WindowError::AlreadyAttached`] if a strategy is already attached (the
    /// rejected strategy is dropped), or if `strategy` itself reports an existing attachment.
    pub fn attach(&mut self, mut strategy: S) -> Result<AttachToken, WindowError> {
        if self.strategy.is_some() {
            vwarn!("ViewportController::attach while already attached");
            return Err(WindowError::AlreadyAttached);
        }

        self.state.reset_for_attach();
        self.state.viewport_size = self.host.viewport_size();
        vdebug!(
            viewport_size = self.state.viewport_size,
            data_length = self.host.data_length(),
            "ViewportController::attach"
        );

        let mut link = Link {
            host: &mut self.host,
            state: &mut self.state,
        };
        strategy.attach(&mut link)?;

        self.generation = next_generation();
        self.strategy = Some(strategy);
        self.scroll_pending = true;
        self.resize_pending = false;
        Ok(AttachToken {
            generation: self.generation,
        })
    }

    /// Detaches the strategy and hands it back.
    ///
    /// Pending coalesced work is dropped and all streams are completed.
    pub fn detach(&mut self, token: AttachToken) -> Result<S, WindowError> {
        if token.generation != self.generation || self.strategy.is_none() {
            vwarn!(
                token = token.generation,
                current = self.generation,
                "ViewportController::detach with a stale token"
            );
            return Err(WindowError::NotAttached);
        }
        let Some(mut strategy) = self.strategy.take() else {
            return Err(WindowError::NotAttached);
        };
        vdebug!("ViewportController::detach");

        self.scroll_pending = false;
        self.resize_pending = false;
        self.state.range_changed = false;
        self.state.offset_changed = false;
        self.state.complete_streams();
        strategy.detach()?;
        Ok(strategy)
    }

    /// Signals that the host scrolled. The recomputation happens in the next [`Self::run_frame`].
    pub fn notify_scrolled(&mut self) {
        if self.strategy.is_some() {
            self.scroll_pending = true;
        }
    }

    /// Signals that the host viewport was resized. The viewport is re-measured in the next
    /// [`Self::run_frame`].
    pub fn notify_resized(&mut self) {
        if self.strategy.is_some() {
            self.resize_pending = true;
        }
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scroll_pending || self.resize_pending
    }

    /// Runs the coalesced work for one render opportunity.
    ///
    /// A pending resize re-measures the viewport and performs a full recomputation; otherwise a
    /// pending scroll recomputes the range. Returns `true` if a recomputation ran.
    pub fn run_frame(&mut self) -> bool {
        let resize = core::mem::take(&mut self.resize_pending);
        let scroll = core::mem::take(&mut self.scroll_pending);
        if !resize && !scroll {
            return false;
        }
        let Some(strategy) = self.strategy.as_mut() else {
            return false;
        };

        vtrace!(resize, scroll, "ViewportController::run_frame");
        if resize {
            self.state.viewport_size = self.host.viewport_size();
        }
        let mut link = Link {
            host: &mut self.host,
            state: &mut self.state,
        };
        if resize {
            strategy.on_data_length_changed(&mut link);
        } else {
            strategy.on_content_scrolled(&mut link);
        }
        true
    }

    /// Re-measures the viewport and recomputes immediately, bypassing coalescing.
    pub fn check_viewport_size(&mut self) -> Result<(), WindowError> {
        self.state.viewport_size = self.host.viewport_size();
        self.resize_pending = false;
        self.with_strategy(|s, vp| s.on_data_length_changed(vp))
    }

    /// Notifies the strategy that the dataset length changed. Runs synchronously.
    pub fn data_length_changed(&mut self) -> Result<(), WindowError> {
        self.with_strategy(|s, vp| s.on_data_length_changed(vp))
    }

    /// Runs `f` with the attached strategy and the viewport capability.
    ///
    /// This is how strategy-specific triggers (for example
    /// [`crate::VariableSizeStrategy::update_item_size`]) are invoked.
    pub fn with_strategy<R>(
        &mut self,
        f: impl FnOnce(&mut S, &mut dyn StrategyViewport) -> R,
    ) -> Result<R, WindowError> {
        let Some(strategy) = self.strategy.as_mut() else {
            return Err(WindowError::NotAttached);
        };
        let mut link = Link {
            host: &mut self.host,
            state: &mut self.state,
        };
        Ok(f(strategy, &mut link))
    }

    pub fn scroll_to_index(
        &mut self,
        index: usize,
        behavior: ScrollBehavior,
    ) -> Result<(), WindowError> {
        self.with_strategy(|s, vp| s.scroll_to_index(index, behavior, vp))
    }

    pub fn scroll_to_offset(&mut self, offset: u64, behavior: ScrollBehavior) {
        self.host.scroll_to_offset(offset, behavior);
    }

    /// Called by the host once it has rendered the latest range and content offset.
    ///
    /// `rendered_content_size` is the measured size of the rendered slice. It is used to rewrite
    /// a [`ContentAnchor::ToEnd`] offset as an offset to the start of the content.
    pub fn content_rendered(&mut self, rendered_content_size: u64) -> Result<(), WindowError> {
        let rewrite = core::mem::take(&mut self.state.content_offset_needs_rewrite);
        let range_changed = core::mem::take(&mut self.state.range_changed);
        let offset_changed = core::mem::take(&mut self.state.offset_changed);

        if rewrite {
            let offset = self
                .state
                .content_offset
                .offset
                .saturating_sub(rendered_content_size);
            vtrace!(
                offset,
                rendered_content_size,
                "ViewportController: rewriting to-end content offset"
            );
            self.state.content_offset = RenderedContentOffset {
                offset,
                anchor: ContentAnchor::ToStart,
            };
        }

        self.with_strategy(|s, vp| {
            if rewrite || offset_changed {
                s.on_rendered_offset_changed(vp);
            }
            if range_changed {
                s.on_content_rendered(vp);
            }
        })
    }

    pub fn set_total_content_size(&mut self, size: u64) {
        Link {
            host: &mut self.host,
            state: &mut self.state,
        }
        .set_total_content_size(size);
    }

    pub fn set_rendered_content_offset(&mut self, offset: u64, anchor: ContentAnchor) {
        Link {
            host: &mut self.host,
            state: &mut self.state,
        }
        .set_rendered_content_offset(offset, anchor);
    }

    pub fn rendered_range(&self) -> ListRange {
        self.state.rendered_range
    }

    pub fn total_content_size(&self) -> u64 {
        self.state.total_content_size
    }

    pub fn rendered_content_offset(&self) -> RenderedContentOffset {
        self.state.content_offset
    }

    /// Offset from the start of the content to the start of the rendered slice.
    ///
    /// Returns `None` while a [`ContentAnchor::ToEnd`] offset is waiting to be rewritten.
    pub fn offset_to_rendered_content_start(&self) -> Option<u64> {
        if self.state.content_offset_needs_rewrite {
            None
        } else {
            Some(self.state.content_offset.offset)
        }
    }

    /// The last scrolled index that was published.
    pub fn scrolled_index(&self) -> Option<usize> {
        self.state.scrolled_index_stream.last().copied()
    }

    pub fn viewport_size(&self) -> u32 {
        self.state.viewport_size
    }

    pub fn data_length(&self) -> usize {
        self.host.data_length()
    }

    pub fn measure_scroll_offset(&self) -> u64 {
        self.host.measure_scroll_offset()
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            viewport_size: self.state.viewport_size,
            scroll_offset: self.host.measure_scroll_offset(),
            total_content_size: self.state.total_content_size,
        }
    }

    pub fn rendered_range_stream(&mut self) -> &mut Emitter<ListRange> {
        &mut self.state.rendered_range_stream
    }

    pub fn scrolled_index_change(&mut self) -> &mut Emitter<usize> {
        &mut self.state.scrolled_index_stream
    }

    pub fn total_content_size_stream(&mut self) -> &mut Emitter<u64> {
        &mut self.state.total_content_size_stream
    }
}

impl<H: core::fmt::Debug, S: core::fmt::Debug> core::fmt::Debug for ViewportController<H, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportController")
            .field("host", &self.host)
            .field("options", &self.options)
            .field("strategy", &self.strategy)
            .field("rendered_range", &self.state.rendered_range)
            .field("total_content_size", &self.state.total_content_size)
            .field("content_offset", &self.state.content_offset)
            .field("scroll_pending", &self.scroll_pending)
            .field("resize_pending", &self.resize_pending)
            .finish_non_exhaustive()
    }
}
