//! Volatile memory-mapped register access

use core::ptr::{read_volatile, write_volatile};

use metronome_hal::{CounterLayout, RegisterAccess};

/// Direct bus access to one counter peripheral's registers
///
/// Every call inside the window is a single volatile load or store. The
/// window is the counter's register block plus its two clock gate registers
/// (see [`CounterLayout::owns`]). Reads outside it return 0 and writes
/// outside it are dropped, so safe code cannot reach arbitrary memory.
pub struct Mmio {
    layout: CounterLayout,
}

impl Mmio {
    /// Create an accessor for the registers of `layout`
    ///
    /// # Safety
    ///
    /// `layout` must describe a real peripheral of this MCU, and the caller
    /// must not create a second accessor for the same peripheral. Use
    /// [`crate::timer::take_tim5`] instead where possible.
    pub const unsafe fn new(layout: CounterLayout) -> Self {
        Self { layout }
    }

    /// Register window of this accessor
    pub const fn layout(&self) -> CounterLayout {
        self.layout
    }
}

impl RegisterAccess for Mmio {
    fn read32(&mut self, addr: u32) -> u32 {
        if !self.layout.owns(addr) {
            #[cfg(feature = "defmt")]
            defmt::warn!("mmio: read outside window at {=u32:#x}", addr);
            return 0;
        }
        // SAFETY: addr is an aligned register of the peripheral this
        // accessor was created for
        unsafe { read_volatile(addr as usize as *const u32) }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        if !self.layout.owns(addr) {
            #[cfg(feature = "defmt")]
            defmt::warn!("mmio: write outside window at {=u32:#x}", addr);
            return;
        }
        // SAFETY: addr is an aligned register of the peripheral this
        // accessor was created for
        unsafe { write_volatile(addr as usize as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TIM5;

    #[test]
    fn test_out_of_window_access_dropped() {
        // Addresses outside the window never reach the bus, so this is
        // safe to run on the host
        let mut mmio = unsafe { Mmio::new(TIM5) };
        mmio.write32(0, 0);
        mmio.write32(0x2000_0000, 0xDEAD_BEEF);
        assert_eq!(mmio.read32(0), 0);
        assert_eq!(mmio.read32(TIM5.base + 0x400), 0);
        assert_eq!(mmio.layout(), TIM5);
    }
}
