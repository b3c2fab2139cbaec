//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hold time before a pressed button starts repeating (ms)
pub const DEFAULT_REPEAT_DELAY_MS: u32 = 500;

/// Repeats at the normal interval before switching to the fast interval
pub const DEFAULT_FAST_REPEAT_THRESHOLD: u32 = 10;

/// Normal repeat interval (ms)
pub const DEFAULT_REPEAT_INTERVAL_MS: u32 = 100;

/// Fast repeat interval (ms)
pub const DEFAULT_FAST_REPEAT_INTERVAL_MS: u32 = 50;

/// Default hardware clock resolution (1 ms ticks)
pub const DEFAULT_TICKS_PER_SECOND: u32 = 1000;

/// Reference system clock of the watch MCU
pub const DEFAULT_SYSTEM_CLOCK_HZ: u32 = 32_000_000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A repeat interval is zero
    ZeroInterval,
    /// The long-press delay is zero
    ZeroDelay,
    /// The requested tick rate is zero
    ZeroTickRate,
    /// The requested tick rate exceeds the system clock
    TickRateTooHigh,
}

/// Spinner timing configuration
///
/// Fields may be changed freely before the spinner's clicks are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpinnerConfig {
    /// Hold time before repeating starts (long-click delay)
    pub start_repeat_delay_ms: u32,
    /// Repeats must exceed this count before the fast interval is used
    pub fast_repeat_threshold: u32,
    /// Interval between repeats until the threshold is passed
    pub repeat_interval_ms: u32,
    /// Interval between repeats after the threshold is passed
    pub fast_repeat_interval_ms: u32,
    /// Switch to the fast interval at all ("fast increment" setting)
    pub acceleration: bool,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            start_repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            fast_repeat_threshold: DEFAULT_FAST_REPEAT_THRESHOLD,
            repeat_interval_ms: DEFAULT_REPEAT_INTERVAL_MS,
            fast_repeat_interval_ms: DEFAULT_FAST_REPEAT_INTERVAL_MS,
            acceleration: true,
        }
    }
}

impl SpinnerConfig {
    /// Check the configuration for values that would stall or flood the
    /// event loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_repeat_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.repeat_interval_ms == 0 || self.fast_repeat_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    /// Interval to use for the next repeat after `changes` repeats
    ///
    /// Always the normal interval while acceleration is off.
    pub fn interval_after(&self, changes: u32) -> u32 {
        if self.acceleration && changes > self.fast_repeat_threshold {
            self.fast_repeat_interval_ms
        } else {
            self.repeat_interval_ms
        }
    }
}

/// Hardware clock configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Counter resolution
    pub ticks_per_second: u32,
    /// Clock feeding the counter's prescaler
    pub system_clock_hz: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            system_clock_hz: DEFAULT_SYSTEM_CLOCK_HZ,
        }
    }
}

impl ClockConfig {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.ticks_per_second > self.system_clock_hz {
            return Err(ConfigError::TickRateTooHigh);
        }
        Ok(())
    }

    /// Prescaler value for the requested tick rate
    ///
    /// Truncating division; the real rate may be off by up to one tick per
    /// second. Returns `None` for a zero tick rate.
    pub fn prescaler(&self) -> Option<u32> {
        self.system_clock_hz.checked_div(self.ticks_per_second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_defaults() {
        let config = SpinnerConfig::default();
        assert_eq!(config.start_repeat_delay_ms, 500);
        assert_eq!(config.fast_repeat_threshold, 10);
        assert_eq!(config.repeat_interval_ms, 100);
        assert_eq!(config.fast_repeat_interval_ms, 50);
        assert!(config.acceleration);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_spinner_rejects_zero_interval() {
        let config = SpinnerConfig {
            fast_repeat_interval_ms: 0,
            ..SpinnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let config = SpinnerConfig {
            start_repeat_delay_ms: 0,
            ..SpinnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDelay));
    }

    #[test]
    fn test_interval_switches_after_threshold() {
        let config = SpinnerConfig::default();
        assert_eq!(config.interval_after(1), 100);
        assert_eq!(config.interval_after(10), 100);
        assert_eq!(config.interval_after(11), 50);
    }

    #[test]
    fn test_no_acceleration_keeps_normal_interval() {
        let config = SpinnerConfig {
            acceleration: false,
            ..SpinnerConfig::default()
        };
        assert_eq!(config.interval_after(11), 100);
        assert_eq!(config.interval_after(u32::MAX), 100);
    }

    #[test]
    fn test_prescaler_truncates() {
        assert_eq!(ClockConfig::new(1000).prescaler(), Some(32_000));
        assert_eq!(ClockConfig::new(3).prescaler(), Some(10_666_666));
        assert_eq!(ClockConfig::new(0).prescaler(), None);
    }

    #[test]
    fn test_clock_validation() {
        assert_eq!(ClockConfig::default().validate(), Ok(()));
        assert_eq!(
            ClockConfig::new(0).validate(),
            Err(ConfigError::ZeroTickRate)
        );
        assert_eq!(
            ClockConfig::new(64_000_000).validate(),
            Err(ConfigError::TickRateTooHigh)
        );
    }
}
