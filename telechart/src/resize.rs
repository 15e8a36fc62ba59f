// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container resize notifications.
//!
//! A [`ResizeSignal`] stands in for the container-sizing collaborator: the host calls
//! [`ResizeSignal::resize`] with the new width, and every live [`ResizeSubscription`] sees the
//! latest width the next time it polls. Subscriptions unregister themselves on drop, so a
//! chart that has been unmounted leaves no listener behind.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use tracing::trace;

#[derive(Debug, Default)]
struct Inner {
    width: Option<f64>,
    next_id: u64,
    // Pending width per listener, cleared when taken.
    listeners: HashMap<u64, Option<f64>>,
}

/// A single-threaded source of container widths.
#[derive(Clone, Debug, Default)]
pub struct ResizeSignal {
    inner: Rc<RefCell<Inner>>,
}

impl ResizeSignal {
    /// Creates a signal with no known width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signal with an initial container width.
    pub fn with_width(width: f64) -> Self {
        let signal = Self::new();
        signal.inner.borrow_mut().width = Some(width);
        signal
    }

    /// Reports a new container width to every listener.
    pub fn resize(&self, width: f64) {
        let mut inner = self.inner.borrow_mut();
        if !width.is_finite() || inner.width == Some(width) {
            return;
        }
        inner.width = Some(width);
        for pending in inner.listeners.values_mut() {
            *pending = Some(width);
        }
        trace!(width, listeners = inner.listeners.len(), "container resized");
    }

    /// Returns the latest known width.
    pub fn width(&self) -> Option<f64> {
        self.inner.borrow().width
    }

    /// Registers a listener. It is removed when the returned guard is dropped.
    pub fn subscribe(&self) -> ResizeSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, None);
        ResizeSubscription {
            id,
            inner: Rc::clone(&self.inner),
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// A live registration on a [`ResizeSignal`].
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    inner: Rc<RefCell<Inner>>,
}

impl ResizeSubscription {
    /// Takes the width reported since the last call, if any.
    pub fn take_pending(&self) -> Option<f64> {
        self.inner
            .borrow_mut()
            .listeners
            .get_mut(&self.id)
            .and_then(Option::take)
    }

    /// Returns the signal's latest known width.
    pub fn current_width(&self) -> Option<f64> {
        self.inner.borrow().width
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.inner.borrow_mut().listeners.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriptions_see_each_resize_once() {
        let signal = ResizeSignal::with_width(640.0);
        let sub = signal.subscribe();
        assert_eq!(sub.current_width(), Some(640.0));
        assert_eq!(sub.take_pending(), None);

        signal.resize(800.0);
        assert_eq!(sub.take_pending(), Some(800.0));
        assert_eq!(sub.take_pending(), None);

        signal.resize(800.0);
        assert_eq!(sub.take_pending(), None);
    }

    #[test]
    fn dropping_a_subscription_releases_the_listener() {
        let signal = ResizeSignal::new();
        let a = signal.subscribe();
        let b = signal.subscribe();
        assert_eq!(signal.listener_count(), 2);
        drop(a);
        assert_eq!(signal.listener_count(), 1);
        drop(b);
        assert_eq!(signal.listener_count(), 0);
    }
}
