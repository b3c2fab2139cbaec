//! STM32F2-specific HAL for the Metronome watch app
//!
//! This crate provides the watch MCU's implementation of the
//! `metronome-hal` register traits, plus the addresses of the peripherals
//! the timing core drives.
//!
//! # Usage
//!
//! ```ignore
//! let regs = metronome_hal_stm32f2::timer::take_tim5().unwrap();
//! let clock = HardwareClock::new(regs, TIM5, SYSTEM_CLOCK_HZ);
//! ```
//!
//! The counter peripheral can be taken once; the core owns it from then on.

#![no_std]

pub mod mmio;
pub mod timer;

pub use mmio::Mmio;
pub use timer::{take_tim5, SYSTEM_CLOCK_HZ, TIM5};

// Re-export shared types from metronome-hal
pub use metronome_hal::registers::{ClockGate, CounterLayout, RegisterAccess};
