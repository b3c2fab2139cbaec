//! Board-agnostic timing core for the Metronome watch app
//!
//! This crate contains the timing logic shared by the app's screens that
//! does not depend on the watch OS or the MCU directly:
//!
//! - Timeout dispatch stack multiplexing the OS's single timeout callback
//! - Accelerating up/down repeat controller ("spinner")
//! - Free-running hardware counter for precise interval measurement
//! - Tempo arithmetic and tap-tempo detection
//! - Configuration type definitions
//!
//! Everything runs on the app's single event-loop thread. No operation
//! blocks; long presses and repeats are scheduled timeouts.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod spinner;
pub mod tempo;
