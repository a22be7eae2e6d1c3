use alloc::vec::Vec;

/// Default number of detached slots kept for reuse.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Whether [`RecycleCache::acquire_or_create`] reused a pooled slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOrigin {
    Reused,
    Created,
}

/// What happened to a slot handed to [`RecycleCache::release`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released {
    Pooled,
    Destroyed,
}

/// A bounded LIFO pool of detached render slots.
///
/// The most recently released slot is reused first. A capacity of zero disables pooling: every
/// released slot is destroyed.
#[derive(Debug)]
pub struct RecycleCache<V> {
    pool: Vec<V>,
    capacity: usize,
    torn_down: bool,
}

impl<V> Default for RecycleCache<V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl<V> RecycleCache<V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Vec::new(),
            capacity,
            torn_down: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently pooled.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Pops the most recently pooled slot, or creates a new one.
    pub fn acquire_or_create(&mut self, create: impl FnOnce() -> V) -> (V, SlotOrigin) {
        match self.pool.pop() {
            Some(slot) => (slot, SlotOrigin::Reused),
            None => (create(), SlotOrigin::Created),
        }
    }

    /// Pools `slot` if there is room, otherwise passes it to `destroy`.
    ///
    /// After [`Self::teardown`] every slot is destroyed.
    pub fn release(&mut self, slot: V, destroy: impl FnOnce(V)) -> Released {
        if self.torn_down || self.pool.len() >= self.capacity {
            destroy(slot);
            Released::Destroyed
        } else {
            self.pool.push(slot);
            Released::Pooled
        }
    }

    /// Destroys every pooled slot. Idempotent.
    ///
    /// Returns how many slots were destroyed.
    pub fn teardown(&mut self, mut destroy: impl FnMut(V)) -> usize {
        self.torn_down = true;
        let n = self.pool.len();
        if n > 0 {
            vdebug!(destroyed = n, "RecycleCache::teardown");
        }
        for slot in self.pool.drain(..) {
            destroy(slot);
        }
        n
    }
}
