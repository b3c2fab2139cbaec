//! Tempo arithmetic and tap-tempo detection

pub mod tap;

pub use tap::{TapTempo, TAP_RESET_MS};

/// Tempo shown when the app starts
pub const DEFAULT_BPM: u8 = 96;

/// Milliseconds per minute
pub const MS_PER_MINUTE: u32 = 60_000;

/// Metronome tempo in beats per minute
///
/// Ranges over the full `u8`; 0 bpm means stopped and has no beat interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tempo(u8);

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_BPM)
    }
}

impl Tempo {
    pub const MIN: Tempo = Tempo(0);
    pub const MAX: Tempo = Tempo(u8::MAX);

    pub const fn new(bpm: u8) -> Self {
        Self(bpm)
    }

    pub const fn bpm(self) -> u8 {
        self.0
    }

    /// Raise by one bpm; returns `false` at the maximum
    pub fn increment(&mut self) -> bool {
        match self.0.checked_add(1) {
            Some(bpm) => {
                self.0 = bpm;
                true
            }
            None => false,
        }
    }

    /// Lower by one bpm; returns `false` at zero
    pub fn decrement(&mut self) -> bool {
        match self.0.checked_sub(1) {
            Some(bpm) => {
                self.0 = bpm;
                true
            }
            None => false,
        }
    }

    /// Time between beats
    ///
    /// Integer division, so up to 1 ms short. `None` at 0 bpm.
    pub fn beat_interval_ms(self) -> Option<u32> {
        MS_PER_MINUTE.checked_div(u32::from(self.0))
    }

    /// Tempo whose beats are `interval_ms` apart
    ///
    /// Clamped to 1..=255 bpm. `None` for a zero interval.
    pub fn from_interval_ms(interval_ms: u32) -> Option<Self> {
        let bpm = MS_PER_MINUTE.checked_div(interval_ms)?;
        let bpm = bpm.clamp(1, u32::from(u8::MAX));
        Some(Self(bpm as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    use metronome_hal::mock::MockScheduler;
    use metronome_hal::{ButtonId, ClickEvent, ClickKind};

    use crate::dispatch::TimeoutDispatchStack;
    use crate::spinner::RepeatController;

    #[test]
    fn test_default_tempo() {
        assert_eq!(Tempo::default().bpm(), 96);
        assert_eq!(Tempo::default().beat_interval_ms(), Some(625));
    }

    #[test]
    fn test_increment_saturates() {
        let mut tempo = Tempo::new(254);
        assert!(tempo.increment());
        assert!(!tempo.increment());
        assert_eq!(tempo, Tempo::MAX);
    }

    #[test]
    fn test_decrement_saturates() {
        let mut tempo = Tempo::new(1);
        assert!(tempo.decrement());
        assert!(!tempo.decrement());
        assert_eq!(tempo, Tempo::MIN);
    }

    #[test]
    fn test_beat_interval_truncates() {
        assert_eq!(Tempo::new(120).beat_interval_ms(), Some(500));
        assert_eq!(Tempo::new(7).beat_interval_ms(), Some(8571));
        assert_eq!(Tempo::new(0).beat_interval_ms(), None);
    }

    #[test]
    fn test_from_interval() {
        assert_eq!(Tempo::from_interval_ms(500), Some(Tempo::new(120)));
        assert_eq!(Tempo::from_interval_ms(100), Some(Tempo::new(255)));
        assert_eq!(Tempo::from_interval_ms(120_000), Some(Tempo::new(1)));
        assert_eq!(Tempo::from_interval_ms(0), None);
    }

    #[test]
    fn test_spinner_drives_tempo() {
        let timers = MockScheduler::new();
        let tempo = Cell::new(Tempo::new(250));
        let up = || {
            let mut t = tempo.get();
            t.increment();
            tempo.set(t);
        };
        let down = || {
            let mut t = tempo.get();
            t.decrement();
            tempo.set(t);
        };
        let spinner = RepeatController::new(1, &up, &down);
        let stack = TimeoutDispatchStack::new();
        spinner.activate(&stack).unwrap();

        spinner.handle_click(ClickEvent::new(ButtonId::Up, ClickKind::LongStart), &timers);
        for _ in 0..10 {
            let (handle, cookie) = timers.fire_next().unwrap();
            assert!(stack.dispatch(&timers, handle, cookie));
        }

        assert_eq!(tempo.get(), Tempo::MAX);
    }
}
