use alloc::boxed::Box;
use alloc::vec::Vec;

/// Handle returned by [`Emitter::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Listener<T> {
    id: u64,
    on_next: Box<dyn FnMut(&T)>,
    on_complete: Option<Box<dyn FnOnce()>>,
}

/// A single-threaded event stream with synchronous callback dispatch.
///
/// Values are delivered to every subscriber in subscription order. A stream created with
/// [`Emitter::distinct`] suppresses values equal to the previously delivered one.
///
/// Once [`Emitter::complete`] has been called, subscribers are notified once and dropped, and
/// later emissions are ignored.
pub struct Emitter<T> {
    listeners: Vec<Listener<T>>,
    next_id: u64,
    last: Option<T>,
    distinct: bool,
    completed: bool,
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            last: None,
            distinct: false,
            completed: false,
        }
    }
}

impl<T: Clone + PartialEq> Emitter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream with distinct-until-changed semantics.
    pub fn distinct() -> Self {
        Self {
            distinct: true,
            ..Self::default()
        }
    }

    pub fn subscribe(&mut self, on_next: impl FnMut(&T) + 'static) -> Subscription {
        self.push_listener(Box::new(on_next), None)
    }

    /// Subscribes with an additional callback invoked when the stream completes.
    ///
    /// Subscribing to an already completed stream invokes `on_complete` immediately.
    pub fn subscribe_with_complete(
        &mut self,
        on_next: impl FnMut(&T) + 'static,
        on_complete: impl FnOnce() + 'static,
    ) -> Subscription {
        if self.completed {
            on_complete();
            let id = self.next_id;
            self.next_id += 1;
            return Subscription(id);
        }
        self.push_listener(Box::new(on_next), Some(Box::new(on_complete)))
    }

    fn push_listener(
        &mut self,
        on_next: Box<dyn FnMut(&T)>,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        if !self.completed {
            self.listeners.push(Listener {
                id,
                on_next,
                on_complete,
            });
        }
        Subscription(id)
    }

    /// Removes a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != subscription.0);
        self.listeners.len() != before
    }

    /// Delivers `value` to all subscribers.
    ///
    /// Returns `false` when the value was suppressed (completed stream, or a distinct stream
    /// receiving the same value twice in a row).
    pub fn emit(&mut self, value: T) -> bool {
        if self.completed {
            return false;
        }
        if self.distinct && self.last.as_ref() == Some(&value) {
            return false;
        }
        for l in &mut self.listeners {
            (l.on_next)(&value);
        }
        self.last = Some(value);
        true
    }

    /// Completes the stream. Calling this more than once is a no-op.
    pub fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        for l in self.listeners.drain(..) {
            if let Some(done) = l.on_complete {
                done();
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The last value delivered to subscribers.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.listeners.len())
            .field("last", &self.last)
            .field("distinct", &self.distinct)
            .field("completed", &self.completed)
            .finish()
    }
}
