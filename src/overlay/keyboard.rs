//! Scoped keyboard listeners
//!
//! A [`KeyboardHub`] plays the role of the document-level key event source.
//! Listeners are registered with [`KeyboardHub::subscribe`], which hands back
//! a [`Subscription`]; dropping it deregisters the listener. The hub only
//! holds weak references, so a listener that is dropped first simply stops
//! receiving events.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::trace;

use super::events::KeyEvent;

/// Receives key events from a [`KeyboardHub`]
pub trait KeyListener {
    /// Returns true when the event changed the listener's state
    fn on_key(&mut self, event: &KeyEvent) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Registry = RefCell<Vec<(ListenerId, Weak<RefCell<dyn KeyListener>>)>>;

/// Source of key events shared by every mounted overlay
#[derive(Default)]
pub struct KeyboardHub {
    listeners: Rc<Registry>,
    next_id: Cell<u64>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener until the returned subscription is dropped
    pub fn subscribe(&self, listener: Weak<RefCell<dyn KeyListener>>) -> Subscription {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        trace!("key listener {:?} subscribed", id);
        Subscription {
            id,
            registry: Rc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners that are still alive
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, listener)| listener.strong_count() > 0)
            .count()
    }

    /// Deliver an event to every live listener in registration order
    ///
    /// Returns how many listeners reacted to it. A listener that is already
    /// borrowed, as during a re-entrant dispatch, is skipped.
    pub fn dispatch(&self, event: &KeyEvent) -> usize {
        // Snapshot so listeners may subscribe or unsubscribe while handling
        let snapshot: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        snapshot
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|listener| match listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_key(event),
                // Already handling an event further up the stack
                Err(_) => {
                    trace!("skipping busy key listener");
                    false
                }
            })
            .count()
    }
}

/// Keeps a listener registered; deregisters it on drop
#[must_use = "dropping a subscription deregisters the listener"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<Registry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().retain(|(id, _)| *id != self.id);
            trace!("key listener {:?} unsubscribed", self.id);
        }
    }
}
