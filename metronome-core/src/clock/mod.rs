//! High-resolution hardware clock
//!
//! One free-running 32-bit counter, configured for a tick rate and read
//! directly for interval measurement.

pub mod counter;
pub mod ticks;

pub use counter::{ClockError, HardwareClock, CONTROL_ENABLE_COUNT_UP, MAX_RELOAD};
pub use ticks::Ticks;
