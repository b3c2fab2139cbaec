//! Memory-mapped register abstractions
//!
//! Peripheral drivers in the core describe their work as reads and writes of
//! 32-bit registers at absolute addresses. Chip crates back this with volatile
//! pointer accesses; tests back it with a simulated register file.

/// 32-bit register access
///
/// Implementations should perform exactly one bus access per call, in call
/// order, with no caching.
pub trait RegisterAccess {
    /// Read the register at `addr`
    fn read32(&mut self, addr: u32) -> u32;

    /// Write `value` to the register at `addr`
    fn write32(&mut self, addr: u32, value: u32);

    /// Read-modify-write the register at `addr`
    fn modify32<F>(&mut self, addr: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(addr);
        self.write32(addr, f(value));
    }

    /// Set the bits in `mask`, leaving the rest untouched
    fn set_bits(&mut self, addr: u32, mask: u32) {
        self.modify32(addr, |v| v | mask);
    }

    /// Clear the bits in `mask`, leaving the rest untouched
    fn clear_bits(&mut self, addr: u32, mask: u32) {
        self.modify32(addr, |v| v & !mask);
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read32(&mut self, addr: u32) -> u32 {
        (**self).read32(addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        (**self).write32(addr, value);
    }
}

/// Clock gate for a peripheral on the bus clock controller
///
/// The peripheral only receives a clock while `bit` is set in `enable`; it
/// keeps it during sleep only while `bit` is also set in `low_power_enable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockGate {
    /// Peripheral clock enable register
    pub enable: u32,
    /// Peripheral clock enable in low-power (sleep) mode register
    pub low_power_enable: u32,
    /// Bit of this peripheral in both registers
    pub bit: u8,
}

impl ClockGate {
    pub const fn mask(&self) -> u32 {
        1 << self.bit
    }
}

/// Register addresses of a general-purpose counter peripheral
///
/// The register offsets are fixed by the timer IP block; only the base
/// address and clock gate differ between instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterLayout {
    pub base: u32,
    pub gate: ClockGate,
}

impl CounterLayout {
    const CR1: u32 = 0x00;
    const CR2: u32 = 0x04;
    const SR: u32 = 0x10;
    const EGR: u32 = 0x14;
    const CNT: u32 = 0x24;
    const PSC: u32 = 0x28;
    const ARR: u32 = 0x2C;

    /// Size of one timer register block
    pub const BLOCK_SIZE: u32 = 0x400;

    pub const fn new(base: u32, gate: ClockGate) -> Self {
        Self { base, gate }
    }

    /// Control register 1
    pub const fn control(&self) -> u32 {
        self.base + Self::CR1
    }

    /// Control register 2
    pub const fn control2(&self) -> u32 {
        self.base + Self::CR2
    }

    /// Status register
    pub const fn status(&self) -> u32 {
        self.base + Self::SR
    }

    /// Event generation register
    pub const fn event_generation(&self) -> u32 {
        self.base + Self::EGR
    }

    /// Free-running counter
    pub const fn counter(&self) -> u32 {
        self.base + Self::CNT
    }

    /// Prescaler
    pub const fn prescaler(&self) -> u32 {
        self.base + Self::PSC
    }

    /// Auto-reload value
    pub const fn auto_reload(&self) -> u32 {
        self.base + Self::ARR
    }

    /// Check whether `addr` is a word-aligned register of this counter,
    /// either in its block or one of its two clock gate registers
    pub const fn owns(&self, addr: u32) -> bool {
        if addr % 4 != 0 {
            return false;
        }
        let in_block = addr >= self.base && addr - self.base < Self::BLOCK_SIZE;
        in_block || addr == self.gate.enable || addr == self.gate.low_power_enable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets() {
        let gate = ClockGate {
            enable: 0x4002_3840,
            low_power_enable: 0x4002_3860,
            bit: 3,
        };
        let layout = CounterLayout::new(0x4000_0C00, gate);

        assert_eq!(layout.control(), 0x4000_0C00);
        assert_eq!(layout.control2(), 0x4000_0C04);
        assert_eq!(layout.status(), 0x4000_0C10);
        assert_eq!(layout.event_generation(), 0x4000_0C14);
        assert_eq!(layout.counter(), 0x4000_0C24);
        assert_eq!(layout.prescaler(), 0x4000_0C28);
        assert_eq!(layout.auto_reload(), 0x4000_0C2C);
        assert_eq!(gate.mask(), 0b1000);
    }

    #[test]
    fn test_layout_owns_block_and_gate() {
        let gate = ClockGate {
            enable: 0x4002_3840,
            low_power_enable: 0x4002_3860,
            bit: 3,
        };
        let layout = CounterLayout::new(0x4000_0C00, gate);

        assert!(layout.owns(layout.counter()));
        assert!(layout.owns(0x4000_0FFC));
        assert!(layout.owns(0x4002_3840));
        assert!(layout.owns(0x4002_3860));

        assert!(!layout.owns(0));
        assert!(!layout.owns(0x4000_1000));
        assert!(!layout.owns(0x4000_0BFC));
        assert!(!layout.owns(0x4000_0C02));
        assert!(!layout.owns(0x4002_3844));
    }
}
