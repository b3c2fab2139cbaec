//! Button click abstractions
//!
//! The watch OS recognizes clicks per screen. A screen declares which kinds of
//! click it wants on which buttons; the OS then delivers [`ClickEvent`]s for
//! them while the screen is on top.

/// Physical watch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonId {
    /// Left side button
    Back = 0,
    /// Top right button
    Up = 1,
    /// Middle right button
    Select = 2,
    /// Bottom right button
    Down = 3,
}

impl ButtonId {
    /// Get the button as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a button from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ButtonId::Back),
            1 => Some(ButtonId::Up),
            2 => Some(ButtonId::Select),
            3 => Some(ButtonId::Down),
            _ => None,
        }
    }
}

/// Kind of recognized click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickKind {
    /// Short press and release
    Single,
    /// Button has been held for the long-click delay
    LongStart,
    /// Button released after a long click started
    LongRelease,
}

/// A click delivered to the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClickEvent {
    pub button: ButtonId,
    pub kind: ClickKind,
}

impl ClickEvent {
    pub const fn new(button: ButtonId, kind: ClickKind) -> Self {
        Self { button, kind }
    }
}

/// Per-screen click registration
///
/// Passed to a screen's click configuration step. Registering a button twice
/// replaces the earlier registration for that click kind.
pub trait ClickConfig {
    /// Deliver [`ClickKind::Single`] for `button`
    fn single_click(&mut self, button: ButtonId);

    /// Deliver [`ClickKind::LongStart`] after `button` is held for
    /// `delay_ms`, and [`ClickKind::LongRelease`] when it is let go
    fn long_click(&mut self, button: ButtonId, delay_ms: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_from_u8() {
        for id in [ButtonId::Back, ButtonId::Up, ButtonId::Select, ButtonId::Down] {
            assert_eq!(ButtonId::from_u8(id.as_u8()), Some(id));
        }
        assert_eq!(ButtonId::from_u8(4), None);
    }
}
