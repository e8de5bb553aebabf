// Copyright 2025 the Glimmer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host events and scoped listener registration.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Size};

/// An input the host forwards to its charts.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// Pointer moved to a surface-space position.
    PointerMove(Point),
    /// Pointer left the surface.
    PointerLeave,
    /// The surface was resized.
    Resize(Size),
}

/// A registered listener. Dropping it unregisters the callback.
#[must_use]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Subscription running `unsubscribe` when dropped.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Keep the listener registered for the registry's whole lifetime.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }

    /// Combine two subscriptions into one.
    pub fn join(mut a: Self, mut b: Self) -> Self {
        let a = a.unsubscribe.take();
        let b = b.unsubscribe.take();
        Self::new(move || {
            if let Some(f) = a {
                f();
            }
            if let Some(f) = b {
                f();
            }
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

type Listener = Rc<dyn Fn(&HostEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: usize,
    by_id: BTreeMap<usize, Listener>,
}

/// The host side of event delivery, for example a window.
///
/// Clones share the same listener set.
#[derive(Clone, Default)]
pub struct ListenerRegistry(Rc<RefCell<Listeners>>);

impl ListenerRegistry {
    /// Registry without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn(&HostEvent) + 'static) -> Subscription {
        let id = {
            let mut state = self.0.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.by_id.insert(id, Rc::new(listener));
            id
        };
        let weak = Rc::downgrade(&self.0);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().by_id.remove(&id);
            }
        })
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// Listeners may subscribe or unsubscribe while being called; changes take
    /// effect from the next emit.
    pub fn emit(&self, event: &HostEvent) {
        let listeners: Vec<Listener> = self.0.borrow().by_id.values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.0.borrow().by_id.len()
    }

    /// True if nothing is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
