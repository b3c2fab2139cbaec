//! Counter peripheral used for high-resolution timing
//!
//! TIM5 is a 32-bit general-purpose timer on APB1. The watch OS leaves it
//! unused, so the app may claim it as a free-running counter.

use core::sync::atomic::{AtomicBool, Ordering};

use metronome_hal::registers::{ClockGate, CounterLayout};

use crate::mmio::Mmio;

/// System clock feeding the APB1 timers
pub const SYSTEM_CLOCK_HZ: u32 = 32_000_000;

/// TIM5 register block base
pub const TIM5_BASE: u32 = 0x4000_0C00;

/// RCC APB1 peripheral clock enable register
pub const RCC_APB1ENR: u32 = 0x4002_3840;

/// RCC APB1 peripheral clock enable in low-power mode register
pub const RCC_APB1LPENR: u32 = 0x4002_3860;

/// TIM5 enable bit in both APB1 enable registers
pub const RCC_APB1_TIM5EN: u8 = 3;

/// TIM5 register addresses
pub const TIM5: CounterLayout = CounterLayout::new(
    TIM5_BASE,
    ClockGate {
        enable: RCC_APB1ENR,
        low_power_enable: RCC_APB1LPENR,
        bit: RCC_APB1_TIM5EN,
    },
);

static TIM5_TAKEN: AtomicBool = AtomicBool::new(false);

/// Claim register access for TIM5
///
/// The accessor reaches only the TIM5 block and its two RCC gate registers.
/// Returns `None` after the first call; there is one physical counter.
pub fn take_tim5() -> Option<Mmio> {
    if TIM5_TAKEN.swap(true, Ordering::AcqRel) {
        return None;
    }
    // SAFETY: TIM5 is a real peripheral of this MCU, and the flag above
    // hands out exactly one accessor for it
    Some(unsafe { Mmio::new(TIM5) })
}
