//! Free-running counter driver
//!
//! Drives a general-purpose timer peripheral as an up-counter that never
//! reloads before the full 32-bit range is used:
//!
//! ```text
//! init(tps):  gate on (run + sleep) ─► CR1 = enable|up ─► PSC = sysclk/tps
//!             ─► ARR = 0xFFFF_FFFF ─► CR2 = 0 ─► start()
//! start():    EGR |= UG            (counter restarts from 0)
//! deinit():   CR1 = 0 ─► gate off (run + sleep)
//! ```

use core::num::NonZeroU32;

use metronome_hal::{CounterLayout, RegisterAccess};

use super::ticks::Ticks;
use crate::config::{ClockConfig, ConfigError};

/// Control register value: counter enable and update-request source,
/// counting up
pub const CONTROL_ENABLE_COUNT_UP: u32 = 0x0000_0005;

/// Auto-reload value so the counter runs the full 32-bit range
pub const MAX_RELOAD: u32 = 0xFFFF_FFFF;

/// Update generation bit in the event generation register
const EGR_UG: u32 = 1 << 0;

/// Errors from configuring the hardware clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The requested tick rate is unusable
    Config(ConfigError),
    /// The clock is already configured; call `deinit` first
    AlreadyConfigured,
}

impl From<ConfigError> for ClockError {
    fn from(e: ConfigError) -> Self {
        ClockError::Config(e)
    }
}

/// High-resolution clock over one counter peripheral
///
/// Owns register access to the peripheral, so at most one clock exists per
/// physical counter.
pub struct HardwareClock<R> {
    regs: R,
    layout: CounterLayout,
    system_clock_hz: u32,
    ticks_per_second: Option<NonZeroU32>,
}

impl<R: RegisterAccess> HardwareClock<R> {
    /// Create an unconfigured clock
    ///
    /// The peripheral is not touched until [`init`](Self::init).
    pub fn new(regs: R, layout: CounterLayout, system_clock_hz: u32) -> Self {
        Self {
            regs,
            layout,
            system_clock_hz,
            ticks_per_second: None,
        }
    }

    /// Power up the counter and start it at `ticks_per_second`
    pub fn init(&mut self, ticks_per_second: u32) -> Result<(), ClockError> {
        if self.ticks_per_second.is_some() {
            #[cfg(feature = "defmt")]
            defmt::warn!("hw clock: init while configured");
            return Err(ClockError::AlreadyConfigured);
        }

        let config = ClockConfig {
            ticks_per_second,
            system_clock_hz: self.system_clock_hz,
        };
        if let Err(e) = config.validate() {
            #[cfg(feature = "defmt")]
            defmt::warn!("hw clock: rejected tick rate {}: {}", ticks_per_second, e);
            return Err(e.into());
        }
        let (Some(rate), Some(prescaler)) =
            (NonZeroU32::new(ticks_per_second), config.prescaler())
        else {
            return Err(ConfigError::ZeroTickRate.into());
        };

        let gate = self.layout.gate;
        self.regs.set_bits(gate.enable, gate.mask());
        self.regs.set_bits(gate.low_power_enable, gate.mask());

        self.regs.write32(self.layout.control(), CONTROL_ENABLE_COUNT_UP);
        self.regs.write32(self.layout.prescaler(), prescaler);
        self.regs.write32(self.layout.auto_reload(), MAX_RELOAD);
        self.regs.write32(self.layout.control2(), 0);

        self.ticks_per_second = Some(rate);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "hw clock: {} ticks/s, prescaler {}",
            ticks_per_second,
            prescaler
        );

        self.start();
        Ok(())
    }

    /// Force an update event so counting restarts from a known state
    pub fn start(&mut self) {
        self.regs.set_bits(self.layout.event_generation(), EGR_UG);
    }

    /// Current counter value
    pub fn get_time(&mut self) -> Ticks {
        Ticks(self.regs.read32(self.layout.counter()))
    }

    /// Stop the counter and cut its clock in run and sleep modes
    pub fn deinit(&mut self) {
        self.regs.write32(self.layout.control(), 0);

        let gate = self.layout.gate;
        self.regs.clear_bits(gate.enable, gate.mask());
        self.regs.clear_bits(gate.low_power_enable, gate.mask());

        self.ticks_per_second = None;
    }

    /// Configured tick rate, or `None` while unconfigured
    pub fn ticks_per_second(&self) -> Option<u32> {
        self.ticks_per_second.map(NonZeroU32::get)
    }

    pub fn is_running(&self) -> bool {
        self.ticks_per_second.is_some()
    }

    /// Convert a tick count to whole milliseconds at the configured rate
    pub fn ticks_to_ms(&self, ticks: u32) -> Option<u32> {
        let rate = self.ticks_per_second?;
        let ms = u64::from(ticks) * 1000 / u64::from(rate.get());
        Some(u32::try_from(ms).unwrap_or(u32::MAX))
    }

    /// Milliseconds elapsed since an earlier reading
    pub fn elapsed_ms(&mut self, since: Ticks) -> Option<u32> {
        let now = self.get_time();
        self.ticks_to_ms(now.elapsed_since(since))
    }

    /// Give back the register accessor
    pub fn release(self) -> R {
        self.regs
    }

    #[cfg(test)]
    pub(crate) fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }
}
