#![forbid(unsafe_code)]

//! Published stage state.
//!
//! The stage exposes its pointer position, button state and wheel-capture
//! flag as [`Observable`] cells. Hosts subscribe once and are called back on
//! every real change; equal writes are swallowed so a pointer that sits still
//! produces no traffic.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: listeners are called with no borrow held, so a
//!   listener may write the same cell. The nested round finishes before the
//!   outer one continues.
//! - **Leaked listeners**: a listener lives exactly as long as its
//!   [`Subscription`]. Dead entries are dropped on the next change.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{trace, trace_span};
use web_time::Instant;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

/// Shared, versioned value with change listeners.
///
/// Clones are handles to the same cell.
///
/// # Invariants
///
/// 1. `version` grows by one per accepted write.
/// 2. Writing the current value changes nothing and calls no listener.
/// 3. Listeners run in subscription order.
pub struct Observable<T> {
    cell: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("Observable")
            .field("value", &cell.value)
            .field("version", &cell.version)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.cell.borrow().value.clone()
    }

    /// Store `value` and call listeners. Returns `false` for an equal write.
    pub fn set(&self, value: T) -> bool {
        let live = {
            let mut cell = self.cell.borrow_mut();
            if cell.value == value {
                return false;
            }
            cell.value = value.clone();
            cell.version += 1;
            cell.listeners.retain(|w| w.strong_count() > 0);
            cell.listeners
                .iter()
                .filter_map(Weak::upgrade)
                .collect::<Vec<Listener<T>>>()
        };
        if !live.is_empty() {
            Self::publish(&live, &value);
        }
        true
    }

    /// Register a listener. Dropping the guard removes it.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Listener<T> = Rc::new(listener);
        self.cell.borrow_mut().listeners.push(Rc::downgrade(&strong));
        Subscription {
            _listener: Box::new(strong),
        }
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.borrow().version
    }

    /// Registered listeners, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.cell.borrow().listeners.len()
    }

    fn publish(listeners: &[Listener<T>], value: &T) {
        let subscribers = listeners.len() as u64;
        let started = Instant::now();
        let span = trace_span!(
            "observable.notify",
            subscribers,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();
        for listener in listeners {
            listener(value);
        }
        let duration_us = started.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
        trace!(duration_us, subscribers, "observable propagated");
    }
}

/// Keeps a listener registered while alive.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
