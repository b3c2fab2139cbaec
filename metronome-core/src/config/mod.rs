//! Configuration types
//!
//! Timing parameters for the spinner and the hardware clock.

pub mod types;

pub use types::*;
