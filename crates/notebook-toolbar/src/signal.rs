//! Single-threaded notifications for toolbar widgets.
//!
//! Everything the toolbar observes (kernel status, the kernel slot, the
//! active cell index) is delivered through a [`Signal`]. Emission is
//! synchronous: every listener has run by the time `emit` returns.
//!
//! Connecting returns a [`Subscription`]. The listener stays attached for as
//! long as the handle is alive, so widgets own their subscriptions and drop
//! them to detach.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Listeners<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    fn remove(&mut self, id: u64) {
        self.entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A notification that listeners can connect to.
///
/// Cloning a `Signal` yields another handle to the same listener list.
pub struct Signal<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Attach a listener. It stays attached until the returned handle is dropped.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn connect<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let listener: Listener<T> = Rc::new(listener);
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };

        let weak: Weak<RefCell<Listeners<T>>> = Rc::downgrade(&self.listeners);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().remove(id);
                }
            })),
        }
    }

    /// Deliver `value` to every attached listener, in connection order.
    ///
    /// Listeners may connect or disconnect while an emission is in flight.
    /// A listener detached mid-emission is skipped for the rest of it.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Listener<T>)> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// Owned handle to a connected listener.
///
/// Dropping the handle detaches the listener. If the signal is already gone
/// this is a no-op.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the listener now.
    pub fn disconnect(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Payload of [`Observable::changed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Changed<T> {
    pub old: T,
    pub new: T,
}

/// A single observable value, e.g. the document's kernel slot.
///
/// `set` stores the new value before notifying, so listeners reading the
/// slot from inside the notification see the new value.
pub struct Observable<T> {
    value: RefCell<T>,
    changed: Signal<Changed<T>>,
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            changed: Signal::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replace the value and notify listeners with the old and new values.
    pub fn set(&self, new: T) {
        let old = self.value.replace(new.clone());
        self.changed.emit(&Changed { old, new });
    }

    pub fn changed(&self) -> &Signal<Changed<T>> {
        &self.changed
    }
}
