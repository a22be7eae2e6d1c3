//! A headless windowing engine for rendering very large lists.
//!
//! Given scroll and viewport measurements, the engine decides which contiguous slice of items
//! is rendered and manages the reuse of the expensive per-item render slots backing that slice:
//!
//! - [`PositionIndex`]: per-item offsets and sizes, with offset → index lookup.
//! - [`VariableSizeStrategy`]: the scroll-driven window computation with buffer hysteresis.
//! - [`ViewportController`]: attaches a strategy to a host viewport, coalesces scroll/resize
//!   signals into one recomputation per frame, and publishes range / scrolled-index / content
//!   size streams.
//! - [`WindowedRenderer`] + [`RecycleCache`]: turns range changes into slot operations,
//!   recycling slots through a bounded LIFO pool.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size and scroll offset ([`ViewportHost`])
//! - item sizes ([`StrategyOptions::item_size`])
//! - slot construction ([`SlotFactory`])
//!
//! For table-specific utilities (sticky rows, section extents), see the `virtual-window-table`
//! crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod emitter;
mod error;
mod options;
mod position;
mod recycle;
mod renderer;
mod strategy;
mod types;
mod viewport;


pub use emitter::{Emitter, Subscription};
pub use error::WindowError;
pub use options::{
    DEFAULT_ITEM_SIZE, DEFAULT_MAX_BUFFER_PX, DEFAULT_MIN_BUFFER_PX, ItemSizeFn, StrategyOptions,
};
pub use position::PositionIndex;
pub use recycle::{DEFAULT_CACHE_CAPACITY, RecycleCache, Released, SlotOrigin};
pub use renderer::{RenderReport, SlotFactory, WindowOp, WindowedRenderer, diff_ranges};
pub use strategy::{ComputedWindow, ScrollStrategy, StrategyViewport, VariableSizeStrategy};
pub use types::{
    ContentAnchor, ItemPosition, ListRange, Orientation, RenderedContentOffset, ScrollBehavior,
    ScrollState,
};
pub use viewport::{AttachToken, ViewportController, ViewportHost, ViewportOptions};
