//! Single-threaded observable values.
//!
//! An [`Observable`] keeps a queue of pending emissions per subscriber.
//! Subscribers pull what they have not seen yet with [`Observable::take_next`]
//! or [`Observable::drain`]; the event loop decides when that happens, so
//! no callback ever runs re-entrantly inside `emit`.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
pub struct Observable<T> {
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<(SubscriptionId, VecDeque<T>)>>,
    latest: RefCell<Option<T>>,
}

impl<T: Clone> Observable<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            subscribers: RefCell::new(Vec::new()),
            latest: RefCell::new(None),
        }
    }

    /// Register a subscriber. It only sees values emitted after this call.
    pub fn subscribe(&self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers.borrow_mut().push((id, VecDeque::new()));
        id
    }

    /// Remove a subscriber and drop anything still queued for it.
    /// Returns false when the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    pub fn emit(&self, value: T) {
        for (_, queue) in self.subscribers.borrow_mut().iter_mut() {
            queue.push_back(value.clone());
        }
        *self.latest.borrow_mut() = Some(value);
    }

    pub fn take_next(&self, id: SubscriptionId) -> Option<T> {
        self.subscribers
            .borrow_mut()
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .and_then(|(_, queue)| queue.pop_front())
    }

    pub fn drain(&self, id: SubscriptionId) -> Vec<T> {
        self.subscribers
            .borrow_mut()
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, queue)| queue.drain(..).collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow().iter().any(|(sid, _)| *sid == id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Most recently emitted value, if any.
    pub fn latest(&self) -> Option<T> {
        self.latest.borrow().clone()
    }
}

impl<T: Clone> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}
