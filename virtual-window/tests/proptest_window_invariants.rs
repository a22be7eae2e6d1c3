//! Property-based invariant tests for the windowing engine.
//!
//! 1. Offsets stay consistent with sizes across reset / update sequences.
//! 2. Offset → index lookup agrees with a linear scan.
//! 3. Computed windows stay within `0 <= start <= end <= len` and cover the scrolled index.
//! 4. Recomputing with unchanged inputs is a fixed point.
//! 5. The recycle pool never exceeds its capacity.
//! 6. Rendered slots stay bound to their indexes, and no slot is lost.
//! 7. `scroll_to_index` lands on the item's offset.

use proptest::prelude::*;
use virtual_window::{
    ListRange, PositionIndex, RecycleCache, ScrollBehavior, ScrollState, SlotFactory,
    StrategyOptions, VariableSizeStrategy, ViewportController, ViewportHost, ViewportOptions,
    WindowedRenderer,
};

// ── Helpers ─────────────────────────────────────────────────────────────

struct Host {
    viewport: u32,
    offset: u64,
    len: usize,
}

impl ViewportHost for Host {
    fn viewport_size(&self) -> u32 {
        self.viewport
    }

    fn measure_scroll_offset(&self) -> u64 {
        self.offset
    }

    fn data_length(&self) -> usize {
        self.len
    }

    fn scroll_to_offset(&mut self, offset: u64, _behavior: ScrollBehavior) {
        self.offset = offset;
    }
}

fn sizes_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..=80, 0..200)
}

fn controller(
    sizes: Vec<u32>,
    viewport: u32,
    min_buffer_px: u32,
    max_buffer_px: u32,
) -> ViewportController<Host, VariableSizeStrategy> {
    let len = sizes.len();
    let options =
        StrategyOptions::new(move |i| sizes[i]).with_buffers(min_buffer_px, max_buffer_px);
    let mut ctl = ViewportController::new(
        Host {
            viewport,
            offset: 0,
            len,
        },
        ViewportOptions::default(),
    );
    // The token is not needed: these controllers are never detached.
    let _ = ctl.attach(VariableSizeStrategy::new(options));
    ctl
}

fn assert_consistent(index: &PositionIndex) -> Result<(), TestCaseError> {
    let mut expected = 0u64;
    for (i, p) in index.iter().enumerate() {
        prop_assert_eq!(p.offset, expected, "offset mismatch at {}", i);
        expected += p.size as u64;
    }
    prop_assert_eq!(index.total_size(), expected);
    Ok(())
}

#[derive(Default)]
struct Factory {
    created: usize,
    destroyed: usize,
}

impl SlotFactory<u32> for Factory {
    type Slot = (usize, u32);

    fn create(&mut self, index: usize, item: &u32) -> (usize, u32) {
        self.created += 1;
        (index, *item)
    }

    fn bind(&mut self, slot: &mut (usize, u32), index: usize, item: &u32) {
        *slot = (index, *item);
    }

    fn destroy(&mut self, _slot: (usize, u32)) {
        self.destroyed += 1;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Offsets stay consistent with sizes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offsets_consistent_after_updates(
        sizes in sizes_strategy(),
        updates in prop::collection::vec((0usize..250, 0u32..=120), 0..40),
    ) {
        let mut index = PositionIndex::new();
        index.reset_all(|i| sizes[i], sizes.len());
        assert_consistent(&index)?;

        for (i, size) in updates {
            let before = index.get(i);
            let delta = index.update_size(i, size);
            match before {
                Some(p) => prop_assert_eq!(delta, size as i64 - p.size as i64),
                None => prop_assert_eq!(delta, 0),
            }
            assert_consistent(&index)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Binary-search lookup agrees with a linear scan
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn index_at_offset_matches_scan(
        sizes in prop::collection::vec(0u32..=40, 0..100),
        offset in 0u64..5000,
    ) {
        let mut index = PositionIndex::new();
        index.reset_all(|i| sizes[i], sizes.len());

        let scan = index
            .iter()
            .position(|p| p.offset <= offset && offset < p.offset + p.size as u64)
            .unwrap_or(usize::MAX);
        prop_assert_eq!(index.index_at_offset(offset, usize::MAX), scan);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Windows are bounded and cover the scrolled index
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_within_bounds(
        sizes in sizes_strategy(),
        viewport in 0u32..=800,
        min_buffer_px in 0u32..=300,
        extra in 0u32..=300,
        offsets in prop::collection::vec(0u64..20_000, 1..20),
    ) {
        let len = sizes.len();
        let mut ctl = controller(sizes, viewport, min_buffer_px, min_buffer_px + extra);
        for offset in offsets {
            ctl.host_mut().offset = offset;
            ctl.notify_scrolled();
            ctl.run_frame();

            let range = ctl.rendered_range();
            prop_assert!(range.start <= range.end, "inverted range {:?}", range);
            prop_assert!(range.end <= len, "range {:?} exceeds len {}", range, len);
            if len > 0 {
                let visible = ctl.scrolled_index().unwrap_or(usize::MAX);
                prop_assert!(range.contains(visible), "{:?} misses {}", range, visible);
            } else {
                prop_assert!(range.is_empty());
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Recompute is a fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn recompute_is_idempotent(
        sizes in sizes_strategy(),
        viewport in 0u32..=800,
        min_buffer_px in 0u32..=300,
        extra in 0u32..=300,
        start in 0usize..200,
        span in 0usize..60,
        scroll_offset in 0u64..20_000,
    ) {
        let ctl = controller(sizes, viewport, min_buffer_px, min_buffer_px + extra);
        let Some(strategy) = ctl.strategy() else {
            return Err(TestCaseError::fail("strategy not attached"));
        };
        let state = ScrollState {
            viewport_size: viewport,
            scroll_offset,
            total_content_size: strategy.positions().total_size(),
        };
        let first = strategy.compute_window(ListRange::new(start, start + span), state);
        let second = strategy.compute_window(first.range, state);
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Pool size never exceeds capacity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn pool_bounded_by_capacity(
        capacity in 0usize..8,
        ops in prop::collection::vec(any::<bool>(), 0..100),
    ) {
        let mut cache = RecycleCache::with_capacity(capacity);
        let mut live = Vec::new();
        let mut next = 0u32;
        let mut destroyed = 0usize;
        for release in ops {
            if release && !live.is_empty() {
                if let Some(slot) = live.pop() {
                    cache.release(slot, |_| destroyed += 1);
                }
            } else {
                let (slot, _) = cache.acquire_or_create(|| {
                    next += 1;
                    next
                });
                live.push(slot);
            }
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(live.len() + cache.len() + destroyed, next as usize);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Rendered slots stay bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn renderer_slots_bound_to_indexes(
        capacity in 0usize..10,
        ranges in prop::collection::vec((0usize..120, 0usize..40), 1..30),
    ) {
        let data: Vec<u32> = (0..100).map(|i| i * 3).collect();
        let mut renderer = WindowedRenderer::with_capacity(Factory::default(), capacity);
        for (start, span) in ranges {
            renderer.render_range(ListRange::new(start, start + span), &data);

            let range = renderer.rendered_range();
            prop_assert!(range.end <= data.len());
            prop_assert_eq!(renderer.len(), range.len());
            for (index, slot) in renderer.slots() {
                prop_assert_eq!(*slot, (index, data[index]));
            }
            prop_assert!(renderer.cache().len() <= capacity);
            let f = renderer.factory();
            prop_assert_eq!(f.created, renderer.len() + renderer.cache().len() + f.destroyed);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. scroll_to_index round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_to_index_round_trip(
        sizes in prop::collection::vec(1u32..=80, 1..200),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(sizes.len());
        let mut ctl = controller(sizes, 300, 50, 100);
        prop_assert!(ctl.scroll_to_index(index, ScrollBehavior::Instant).is_ok());
        ctl.notify_scrolled();
        ctl.run_frame();

        let expected = ctl
            .strategy()
            .map(|s| s.positions().position(index).offset)
            .unwrap_or(u64::MAX);
        prop_assert_eq!(ctl.measure_scroll_offset(), expected);
        prop_assert_eq!(ctl.scrolled_index(), Some(index));
        prop_assert!(ctl.rendered_range().contains(index));
    }
}
