use alloc::sync::Arc;

/// Returns the size of the item at the given index.
pub type ItemSizeFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Default minimum buffer rendered beyond the viewport (in pixels).
pub const DEFAULT_MIN_BUFFER_PX: u32 = 100;
/// Default buffer rendered when the window has to grow (in pixels).
pub const DEFAULT_MAX_BUFFER_PX: u32 = 200;
/// Item size used when no size function is configured.
pub const DEFAULT_ITEM_SIZE: u32 = 10;

/// Configuration for [`crate::VariableSizeStrategy`].
///
/// This type is cheap to clone: the size function is stored in an `Arc`.
pub struct StrategyOptions {
    /// Size of each item along the scroll axis.
    pub item_size: ItemSizeFn,

    /// The minimum amount of buffer rendered beyond the viewport.
    ///
    /// If the buffer dips below this amount, the window is extended again.
    pub min_buffer_px: u32,

    /// The amount of buffer rendered when the window is extended.
    ///
    /// Should be `>= min_buffer_px`; the distance between the two is the hysteresis band in
    /// which scrolling does not change the rendered range.
    pub max_buffer_px: u32,
}

impl Clone for StrategyOptions {
    fn clone(&self) -> Self {
        Self {
            item_size: Arc::clone(&self.item_size),
            min_buffer_px: self.min_buffer_px,
            max_buffer_px: self.max_buffer_px,
        }
    }
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            item_size: Arc::new(|_| DEFAULT_ITEM_SIZE),
            min_buffer_px: DEFAULT_MIN_BUFFER_PX,
            max_buffer_px: DEFAULT_MAX_BUFFER_PX,
        }
    }
}

impl StrategyOptions {
    pub fn new(item_size: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            item_size: Arc::new(item_size),
            ..Self::default()
        }
    }

    pub fn with_item_size(mut self, item_size: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        self.item_size = Arc::new(item_size);
        self
    }

    /// Sets both buffers. `max_buffer_px` is raised to `min_buffer_px` if it is smaller.
    pub fn with_buffers(mut self, min_buffer_px: u32, max_buffer_px: u32) -> Self {
        self.min_buffer_px = min_buffer_px;
        self.max_buffer_px = max_buffer_px.max(min_buffer_px);
        self
    }

    pub(crate) fn size_of(&self, index: usize) -> u32 {
        (self.item_size)(index)
    }
}

impl core::fmt::Debug for StrategyOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrategyOptions")
            .field("min_buffer_px", &self.min_buffer_px)
            .field("max_buffer_px", &self.max_buffer_px)
            .finish_non_exhaustive()
    }
}
