//! Tap-tempo detection
//!
//! The user taps a button on the beat; the time between consecutive taps,
//! measured on the hardware clock, sets the tempo.

use metronome_hal::RegisterAccess;

use super::Tempo;
use crate::clock::{HardwareClock, Ticks};

/// Taps further apart than this start a new measurement
pub const TAP_RESET_MS: u32 = 2000;

/// Tap-tempo detector
#[derive(Debug, Clone, Default)]
pub struct TapTempo {
    last_tap: Option<Ticks>,
}

impl TapTempo {
    pub const fn new() -> Self {
        Self { last_tap: None }
    }

    /// Record a tap at the clock's current time
    ///
    /// Returns the tempo implied by the interval since the previous tap.
    /// Returns `None` for the first tap, after a pause longer than
    /// [`TAP_RESET_MS`], or if the clock is not running. A stopped clock is
    /// not read.
    pub fn tap<R: RegisterAccess>(&mut self, clock: &mut HardwareClock<R>) -> Option<Tempo> {
        let ticks_per_second = clock.ticks_per_second()?;
        let now = clock.get_time();
        self.record(now, ticks_per_second)
    }

    /// Record a tap at counter reading `now`
    pub fn record(&mut self, now: Ticks, ticks_per_second: u32) -> Option<Tempo> {
        let previous = self.last_tap.replace(now)?;
        let ticks = now.elapsed_since(previous);
        let ms = u64::from(ticks) * 1000 / u64::from(ticks_per_second.max(1));

        if ms == 0 || ms > u64::from(TAP_RESET_MS) {
            return None;
        }
        Tempo::from_interval_ms(ms as u32)
    }

    /// Forget the previous tap
    pub fn reset(&mut self) {
        self.last_tap = None;
    }

    pub fn is_measuring(&self) -> bool {
        self.last_tap.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metronome_hal::mock::MockRegisters;
    use metronome_hal_stm32f2::{SYSTEM_CLOCK_HZ, TIM5};

    #[test]
    fn test_first_tap_starts_measurement() {
        let mut taps = TapTempo::new();
        assert_eq!(taps.record(Ticks(0), 1000), None);
        assert!(taps.is_measuring());
    }

    #[test]
    fn test_second_tap_sets_tempo() {
        let mut taps = TapTempo::new();
        taps.record(Ticks(1000), 1000);
        assert_eq!(taps.record(Ticks(1500), 1000), Some(Tempo::new(120)));
        assert_eq!(taps.record(Ticks(2100), 1000), Some(Tempo::new(100)));
    }

    #[test]
    fn test_tap_across_counter_wrap() {
        let mut taps = TapTempo::new();
        taps.record(Ticks(u32::MAX - 249), 1000);
        assert_eq!(taps.record(Ticks(250), 1000), Some(Tempo::new(120)));
    }

    #[test]
    fn test_long_pause_restarts() {
        let mut taps = TapTempo::new();
        taps.record(Ticks(0), 1000);
        assert_eq!(taps.record(Ticks(2001), 1000), None);
        assert_eq!(taps.record(Ticks(2601), 1000), Some(Tempo::new(100)));
    }

    #[test]
    fn test_reset() {
        let mut taps = TapTempo::new();
        taps.record(Ticks(0), 1000);
        taps.reset();
        assert!(!taps.is_measuring());
        assert_eq!(taps.record(Ticks(500), 1000), None);
    }

    #[test]
    fn test_tap_reads_hardware_clock() {
        let regs = MockRegisters::new().with_update_event(TIM5.event_generation(), TIM5.counter());
        let mut clock = HardwareClock::new(regs, TIM5, SYSTEM_CLOCK_HZ);
        let mut taps = TapTempo::new();

        assert_eq!(taps.tap(&mut clock), None);
        assert!(clock.regs_mut().reads().is_empty());
        assert!(!taps.is_measuring());

        clock.init(10_000).unwrap();
        assert_eq!(taps.tap(&mut clock), None);
        clock.regs_mut().set(TIM5.counter(), 7500);
        assert_eq!(taps.tap(&mut clock), Some(Tempo::new(80)));
    }
}
