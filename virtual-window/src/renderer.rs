use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::{ListRange, Orientation, RecycleCache, Released, SlotOrigin, WindowError};

/// Creates, rebinds, and destroys the render slots backing rendered items.
///
/// The renderer never constructs slots itself; every slot it holds came from
/// [`SlotFactory::create`].
pub trait SlotFactory<T> {
    type Slot;

    /// Creates a slot already bound to `item` at `index`.
    fn create(&mut self, index: usize, item: &T) -> Self::Slot;

    /// Rebinds an existing slot. Called before a reused slot becomes visible again, and for
    /// slots whose position in the window changed.
    fn bind(&mut self, slot: &mut Self::Slot, index: usize, item: &T);

    fn destroy(&mut self, slot: Self::Slot);
}

/// One structural change between two rendered ranges.
///
/// Positions are relative to the start of the rendered window. Operations are ordered for
/// sequential application: removals in descending old position, then moves, then insertions
/// in ascending new position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowOp {
    /// The slot for `index` leaves the window.
    Remove { index: usize, position: usize },
    /// The slot for `index` stays rendered but its position shifted.
    Move { index: usize, from: usize, to: usize },
    /// `index` enters the window.
    Insert { index: usize, position: usize },
}

/// Computes the ordered operations that turn the window `prev` into `next`.
pub fn diff_ranges(prev: ListRange, next: ListRange) -> Vec<WindowOp> {
    let keep_start = prev.start.max(next.start);
    let keep_end = prev.end.min(next.end).max(keep_start);
    let kept = |index: usize| (keep_start..keep_end).contains(&index);

    let mut ops = Vec::new();
    for index in (prev.start..prev.end).rev() {
        if !kept(index) {
            ops.push(WindowOp::Remove {
                index,
                position: index - prev.start,
            });
        }
    }
    if prev.start != next.start {
        for index in keep_start..keep_end {
            ops.push(WindowOp::Move {
                index,
                from: index - prev.start,
                to: index - next.start,
            });
        }
    }
    for index in next.start..next.end {
        if !kept(index) {
            ops.push(WindowOp::Insert {
                index,
                position: index - next.start,
            });
        }
    }
    ops
}

/// Counters for a single [`WindowedRenderer::render_range`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderReport {
    pub inserted: usize,
    pub removed: usize,
    pub moved: usize,
    /// Slots produced by [`SlotFactory::create`].
    pub created: usize,
    /// Slots reused from this pass's removals or from the pool.
    pub reused: usize,
    /// Slots passed to [`SlotFactory::destroy`].
    pub destroyed: usize,
    /// Kept slots rebound in place by [`WindowedRenderer::render_range_rebinding`].
    pub rebound: usize,
}

impl RenderReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Keeps one live slot per index of the rendered range, recycling slots through a
/// [`RecycleCache`].
///
/// Slots removed during a pass are reused first by insertions in the same pass (most recently
/// removed first). Leftover slots are released to the pool, or destroyed once it is full.
pub struct WindowedRenderer<T, F: SlotFactory<T>> {
    factory: F,
    cache: RecycleCache<F::Slot>,
    slots: VecDeque<F::Slot>,
    range: ListRange,
    _item: PhantomData<fn(&T)>,
}

impl<T, F: SlotFactory<T>> WindowedRenderer<T, F> {
    pub fn new(factory: F) -> Self {
        Self::with_cache(factory, RecycleCache::default())
    }

    /// A renderer whose pool keeps up to `capacity` slots. `0` destroys every removed slot.
    pub fn with_capacity(factory: F, capacity: usize) -> Self {
        Self::with_cache(factory, RecycleCache::with_capacity(capacity))
    }

    fn with_cache(factory: F, cache: RecycleCache<F::Slot>) -> Self {
        Self {
            factory,
            cache,
            slots: VecDeque::new(),
            range: ListRange::EMPTY,
            _item: PhantomData,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn cache(&self) -> &RecycleCache<F::Slot> {
        &self.cache
    }

    pub fn rendered_range(&self) -> ListRange {
        self.range
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot bound to `index`, if it is rendered.
    pub fn slot(&self, index: usize) -> Option<&F::Slot> {
        if !self.range.contains(index) {
            return None;
        }
        self.slots.get(index - self.range.start)
    }

    /// Live slots in index order, paired with their index.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &F::Slot)> + '_ {
        let start = self.range.start;
        self.slots.iter().enumerate().map(move |(i, s)| (start + i, s))
    }

    /// Moves the window to `range`, which is clamped to `data`.
    pub fn render_range(&mut self, range: ListRange, data: &[T]) -> RenderReport {
        self.render(range, data, false)
    }

    /// Moves the window to `range` and rebinds every slot the pass left in place.
    ///
    /// Each live slot is bound exactly once: created, reused and moved slots by the pass
    /// itself, kept slots afterwards. Used when items changed identity along with the range.
    pub fn render_range_rebinding(&mut self, range: ListRange, data: &[T]) -> RenderReport {
        self.render(range, data, true)
    }

    fn render(&mut self, range: ListRange, data: &[T], rebind_kept: bool) -> RenderReport {
        let next = range.clamp_to(data.len());
        let prev = self.range;
        let mut report = RenderReport::default();
        if next == prev {
            if rebind_kept {
                report.rebound = self.rebind_all(data);
            }
            return report;
        }

        let ops = diff_ranges(prev, next);
        let mut removed = Vec::new();
        for op in ops {
            match op {
                WindowOp::Remove { position, .. } => {
                    if let Some(slot) = self.slots.remove(position) {
                        removed.push(slot);
                        report.removed += 1;
                    }
                }
                WindowOp::Move { index, .. } => {
                    let Some(item) = data.get(index) else {
                        continue;
                    };
                    // Removals are applied, so survivors start at position 0.
                    let live = index - prev.start.max(next.start);
                    if let Some(slot) = self.slots.get_mut(live) {
                        self.factory.bind(slot, index, item);
                        report.moved += 1;
                    }
                }
                WindowOp::Insert { index, position } => {
                    let Some(item) = data.get(index) else {
                        continue;
                    };
                    let slot = match removed.pop() {
                        Some(mut slot) => {
                            self.factory.bind(&mut slot, index, item);
                            report.reused += 1;
                            slot
                        }
                        None => {
                            let (mut slot, origin) = self
                                .cache
                                .acquire_or_create(|| self.factory.create(index, item));
                            match origin {
                                SlotOrigin::Reused => {
                                    self.factory.bind(&mut slot, index, item);
                                    report.reused += 1;
                                }
                                SlotOrigin::Created => report.created += 1,
                            }
                            slot
                        }
                    };
                    self.slots.insert(position, slot);
                    report.inserted += 1;
                }
            }
        }

        for slot in removed {
            if self.cache.release(slot, |s| self.factory.destroy(s)) == Released::Destroyed {
                report.destroyed += 1;
            }
        }

        // A changed start already rebound every survivor as a move.
        if rebind_kept && prev.start == next.start {
            let kept = prev.end.min(next.end).saturating_sub(next.start);
            for (i, slot) in self.slots.iter_mut().take(kept).enumerate() {
                if let Some(item) = data.get(next.start + i) {
                    self.factory.bind(slot, next.start + i, item);
                    report.rebound += 1;
                }
            }
        }

        self.range = next;
        debug_assert_eq!(self.slots.len(), self.range.len());
        vtrace!(
            start = next.start,
            end = next.end,
            inserted = report.inserted,
            removed = report.removed,
            moved = report.moved,
            created = report.created,
            reused = report.reused,
            destroyed = report.destroyed,
            rebound = report.rebound,
            "WindowedRenderer::render_range"
        );
        report
    }

    /// Rebinds every live slot to the current contents of `data`.
    ///
    /// Used when items changed identity without the rendered range changing.
    pub fn rebind_all(&mut self, data: &[T]) -> usize {
        let start = self.range.start;
        let mut n = 0;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(item) = data.get(start + i) {
                self.factory.bind(slot, start + i, item);
                n += 1;
            }
        }
        n
    }

    /// Sums `measure` over the slots of `range`.
    ///
    /// An empty range measures 0. A range not fully inside the rendered range is an error.
    pub fn measure_range_size(
        &self,
        range: ListRange,
        orientation: Orientation,
        mut measure: impl FnMut(&F::Slot, Orientation) -> u32,
    ) -> Result<u64, WindowError> {
        if range.is_empty() {
            return Ok(0);
        }
        if !self.range.contains_range(range) {
            vwarn!(
                start = range.start,
                end = range.end,
                "WindowedRenderer::measure_range_size: range is not rendered"
            );
            return Err(WindowError::UnrenderedRange {
                requested: range,
                rendered: self.range,
            });
        }
        let from = range.start - self.range.start;
        let to = range.end - self.range.start;
        Ok(self
            .slots
            .range(from..to)
            .map(|slot| measure(slot, orientation) as u64)
            .sum())
    }

    /// Destroys every live and pooled slot. Idempotent.
    ///
    /// Returns how many slots were destroyed.
    pub fn teardown(&mut self) -> usize {
        let mut n = 0;
        for slot in self.slots.drain(..) {
            self.factory.destroy(slot);
            n += 1;
        }
        n += self.cache.teardown(|s| self.factory.destroy(s));
        if n > 0 {
            vdebug!(destroyed = n, "WindowedRenderer::teardown");
        }
        self.range = ListRange::EMPTY;
        n
    }
}

impl<T, F> core::fmt::Debug for WindowedRenderer<T, F>
where
    F: SlotFactory<T> + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowedRenderer")
            .field("factory", &self.factory)
            .field("range", &self.range)
            .field("live", &self.slots.len())
            .field("pooled", &self.cache.len())
            .finish()
    }
}
