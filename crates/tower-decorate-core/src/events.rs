//! Listener hooks for wrapper events.
//!
//! Each wrapper defines its own event enum and exposes `on_*` builder
//! methods that register closures here. Listeners run synchronously on the
//! calling task, in registration order.
//!
//! A listener that panics is skipped: the panic is logged at warn level with
//! the operation name and the event, and the wrapped call carries on as if
//! the listener had returned.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// An event emitted by a wrapper around a named operation.
pub trait WrapperEvent: Send + Sync + fmt::Debug {
    /// Name of the wrapped operation the event belongs to.
    fn operation_name(&self) -> &str;
}

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Closures registered for one wrapper's events.
///
/// Cloning is cheap and the clone calls the same closures.
pub struct EventListeners<E> {
    listeners: Vec<Listener<E>>,
}

impl<E: WrapperEvent> EventListeners<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers `listener`. It sees every event emitted afterwards.
    pub fn add<F>(&mut self, listener: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Calls every listener with `event`.
    ///
    /// Returns how many listeners panicked.
    pub fn emit(&self, event: &E) -> usize {
        let mut panicked = 0;
        for listener in &self.listeners {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| listener(event))) {
                panicked += 1;
                warn!(
                    operation = %event.operation_name(),
                    event = ?event,
                    "event listener for {} panicked: {}",
                    event.operation_name(),
                    panic_message(payload.as_ref())
                );
            }
        }
        panicked
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: WrapperEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// Text of a panic payload raised by `panic!` with a literal or a format string.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
