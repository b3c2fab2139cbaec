//! Raw counter readings

/// A reading of the free-running counter
///
/// The counter wraps at 2^32 ticks. Intervals are computed with modular
/// arithmetic, so a single wrap between two readings still gives the right
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Ticks elapsed from `earlier` to `self`
    pub const fn elapsed_since(self, earlier: Ticks) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Reading `ticks` after `self`
    pub const fn wrapping_add(self, ticks: u32) -> Ticks {
        Ticks(self.0.wrapping_add(ticks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_without_wrap() {
        assert_eq!(Ticks(1500).elapsed_since(Ticks(1000)), 500);
        assert_eq!(Ticks(7).elapsed_since(Ticks(7)), 0);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let before = Ticks(u32::MAX - 9);
        let after = Ticks(20);
        assert_eq!(after.elapsed_since(before), 30);
        assert_eq!(before.wrapping_add(30), after);
    }
}
