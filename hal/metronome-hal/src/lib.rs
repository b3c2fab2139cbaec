//! Metronome Hardware and Platform Abstraction Layer
//!
//! This crate defines the capabilities the timing core consumes from the
//! watch platform and its MCU. Chip crates (and the watch OS glue) implement
//! them; the core never touches hardware or OS services directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Watch app screens (presentation)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  metronome-core                          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  metronome-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ metronome-hal-│       │  mock (host   │
//! │    stm32f2    │       │  test doubles)│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`registers::RegisterAccess`] - 32-bit memory-mapped register access
//! - [`timeout::TimeoutScheduler`] - The OS one-shot timeout service
//! - [`click::ClickConfig`] - Per-screen button click registration

#![no_std]
#![deny(unsafe_code)]

pub mod click;
pub mod registers;
pub mod timeout;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use click::{ButtonId, ClickConfig, ClickEvent, ClickKind};
pub use registers::{ClockGate, CounterLayout, RegisterAccess};
pub use timeout::{Cookie, TimeoutHandle, TimeoutScheduler};
