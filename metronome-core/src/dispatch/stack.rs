//! Chain-of-responsibility timeout stack
//!
//! ```text
//!   push ─►  ┌───────────┐  ◄─ dispatch starts here
//!            │ handler 3 │  ── false ─┐
//!            ├───────────┤            ▼
//!            │ handler 2 │  ── true  ─► stop
//!            ├───────────┤
//!            │ handler 1 │     (not asked)
//!            ├───────────┤
//!            │ handler 0 │     (not asked)
//!            └───────────┘
//! ```
//!
//! A handler returns `true` only for timeouts it scheduled itself. Returning
//! `true` for a handle it does not own hides that timeout from the handlers
//! below.

use core::cell::{Cell, RefCell};

use heapless::Vec;
use metronome_hal::{Cookie, TimeoutHandle, TimeoutScheduler};

/// Maximum number of handlers on the stack
pub const CAPACITY: usize = 4;

/// Errors from modifying the dispatch stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The stack already holds [`CAPACITY`] handlers
    Full,
    /// A timeout is being dispatched; the stack cannot change until it
    /// returns
    Busy,
    /// The handler is already on the stack
    AlreadyActive,
}

/// A consumer of timeouts
///
/// `timers` is the OS timeout service, for handlers that reschedule.
/// Returns `true` if the timeout was recognized and handled (consumed).
pub trait TimeoutHandler {
    fn on_timeout(&self, timers: &dyn TimeoutScheduler, handle: TimeoutHandle, cookie: Cookie)
        -> bool;
}

impl<F> TimeoutHandler for F
where
    F: Fn(&dyn TimeoutScheduler, TimeoutHandle, Cookie) -> bool,
{
    fn on_timeout(
        &self,
        timers: &dyn TimeoutScheduler,
        handle: TimeoutHandle,
        cookie: Cookie,
    ) -> bool {
        self(timers, handle, cookie)
    }
}

/// Bounded LIFO of timeout handlers
///
/// The stack borrows its handlers; each must outlive the stack. All methods
/// take `&self` so that handlers and their owners can share the stack on the
/// single event-loop thread.
pub struct TimeoutDispatchStack<'a> {
    handlers: RefCell<Vec<&'a dyn TimeoutHandler, CAPACITY>>,
    dispatching: Cell<bool>,
}

impl Default for TimeoutDispatchStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TimeoutDispatchStack<'a> {
    /// Create an empty stack
    pub const fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Add a handler on top of the stack
    ///
    /// Fails with [`DispatchError::Full`] when [`CAPACITY`] handlers are
    /// already pushed; the stack is left unchanged.
    pub fn push(&self, handler: &'a dyn TimeoutHandler) -> Result<(), DispatchError> {
        if self.dispatching.get() {
            #[cfg(feature = "defmt")]
            defmt::warn!("timeout stack: push during dispatch");
            return Err(DispatchError::Busy);
        }

        let mut handlers = self.handlers.borrow_mut();
        if handlers.push(handler).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("timeout stack: full ({} handlers)", CAPACITY);
            return Err(DispatchError::Full);
        }
        Ok(())
    }

    /// Remove the handler on top of the stack
    ///
    /// Returns `false` if the stack was already empty. That is not an error.
    /// Also returns `false`, leaving the stack unchanged, when called from
    /// inside a dispatch.
    pub fn pop(&self) -> bool {
        if self.dispatching.get() {
            #[cfg(feature = "defmt")]
            defmt::warn!("timeout stack: pop during dispatch");
            return false;
        }
        self.handlers.borrow_mut().pop().is_some()
    }

    /// Remove `handler` if it is on top of the stack
    ///
    /// Returns `false` and leaves the stack unchanged if another handler is
    /// on top.
    pub fn pop_handler(&self, handler: &dyn TimeoutHandler) -> bool {
        if !self.is_top(handler) {
            return false;
        }
        self.pop()
    }

    /// Check whether `handler` is the top handler
    pub fn is_top(&self, handler: &dyn TimeoutHandler) -> bool {
        self.handlers
            .borrow()
            .last()
            .is_some_and(|top| same_handler(*top, handler))
    }

    /// Check whether `handler` is anywhere on the stack
    pub fn contains(&self, handler: &dyn TimeoutHandler) -> bool {
        self.handlers
            .borrow()
            .iter()
            .any(|h| same_handler(*h, handler))
    }

    /// Number of handlers on the stack
    pub fn depth(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    pub fn is_full(&self) -> bool {
        self.depth() == CAPACITY
    }

    /// Offer a timeout to the handlers, newest first
    ///
    /// Stops at the first handler that consumes it. Returns whether any
    /// handler did. This is the app-wide timeout callback; the OS glue
    /// forwards its one timeout event here.
    pub fn dispatch(
        &self,
        timers: &dyn TimeoutScheduler,
        handle: TimeoutHandle,
        cookie: Cookie,
    ) -> bool {
        if self.dispatching.replace(true) {
            #[cfg(feature = "defmt")]
            defmt::warn!("timeout stack: nested dispatch ignored");
            return false;
        }

        // Handlers run without the stack borrowed
        let handlers = self.handlers.borrow().clone();

        let consumed = handlers
            .iter()
            .rev()
            .any(|handler| handler.on_timeout(timers, handle, cookie));

        self.dispatching.set(false);

        #[cfg(feature = "defmt")]
        {
            if !consumed {
                defmt::trace!("timeout stack: {} unclaimed", handle);
            }
        }

        consumed
    }
}

/// Identity comparison of two handler references
///
/// Zero-sized handler types may share an address; give them distinct
/// instances a field if they need telling apart.
fn same_handler(a: &dyn TimeoutHandler, b: &dyn TimeoutHandler) -> bool {
    let a = a as *const dyn TimeoutHandler as *const ();
    let b = b as *const dyn TimeoutHandler as *const ();
    a == b
}
