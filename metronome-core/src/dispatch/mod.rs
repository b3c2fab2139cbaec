//! Timeout dispatch stack
//!
//! The watch OS delivers every timeout to one app-wide callback. The dispatch
//! stack is that callback: screens push a handler while they are visible, and
//! each timeout is offered to the handlers from the top down until one claims
//! it.

pub mod stack;

pub use stack::{DispatchError, TimeoutDispatchStack, TimeoutHandler, CAPACITY};
