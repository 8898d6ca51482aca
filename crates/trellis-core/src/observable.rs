//! Observable values with synchronous change notification.
//!
//! An [`Observable`] stores a value and a list of listeners. Setting the
//! value calls every listener in subscription order before returning. No
//! borrow of the value is held while listeners run, so a listener may read
//! or set the same observable again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

type Listener<T> = (SubscriptionId, Rc<dyn Fn(&T)>);

/// A value that notifies its subscribers when it is set.
pub struct Observable<T> {
    value: RefCell<T>,
    listeners: RefCell<SmallVec<[Listener<T>; 2]>>,
    next_id: Cell<u64>,
}

impl<T: Clone> Observable<T> {
    /// Create an observable holding `value`, with no subscribers.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(SmallVec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` and notify every subscriber, even if it is unchanged.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify();
    }

    /// Store `value` without notifying anyone.
    pub fn set_silently(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    /// Notify every subscriber with the current value.
    pub fn notify(&self) {
        // Snapshot so listeners can subscribe or unsubscribe while running.
        let listeners: SmallVec<[Rc<dyn Fn(&T)>; 2]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, f)| Rc::clone(f))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let value = self.get();
        for listener in listeners {
            listener(&value);
        }
    }

    /// Register `callback`, called with the new value on every notification.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Store `value` and notify only if it differs from the current one.
    /// Returns whether a notification was sent.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("subscribers", &self.listeners.borrow().len())
            .finish()
    }
}
