//! One-shot timeout service
//!
//! The watch OS offers exactly one application-wide timeout callback. Timers
//! are scheduled with a delay and a cookie; when one expires the OS calls the
//! app's single handler with the timer's handle and cookie.

use core::num::NonZeroU32;

/// Caller-supplied value carried through a scheduled timeout
pub type Cookie = u32;

/// Opaque identifier for one scheduled timeout
///
/// The OS uses `0` to mean "no timer"; that value never becomes a handle.
/// Code that tracks an optional timer holds an `Option<TimeoutHandle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeoutHandle(NonZeroU32);

impl TimeoutHandle {
    /// Wrap a raw OS handle, mapping the "no timer" value to `None`
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Get the raw OS handle
    pub const fn raw(self) -> u32 {
        self.0.get()
    }
}

/// OS timeout scheduling
///
/// Methods take `&self`: the service is reached through the app context and
/// may be used from inside a timeout callback.
pub trait TimeoutScheduler {
    /// Schedule a one-shot timeout `delay_ms` from now
    ///
    /// When it fires, the app-wide handler receives the returned handle and
    /// `cookie`. Returns `None` if the OS could not allocate a timer.
    fn schedule(&self, delay_ms: u32, cookie: Cookie) -> Option<TimeoutHandle>;

    /// Cancel a scheduled timeout
    ///
    /// Cancelling a timeout that already fired or was already cancelled is a
    /// no-op.
    fn cancel(&self, handle: TimeoutHandle);
}

impl<T: TimeoutScheduler + ?Sized> TimeoutScheduler for &T {
    fn schedule(&self, delay_ms: u32, cookie: Cookie) -> Option<TimeoutHandle> {
        (**self).schedule(delay_ms, cookie)
    }

    fn cancel(&self, handle: TimeoutHandle) {
        (**self).cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_no_timer() {
        assert_eq!(TimeoutHandle::from_raw(0), None);
    }

    #[test]
    fn test_raw_round_trip() {
        let handle = TimeoutHandle::from_raw(42);
        assert_eq!(handle.map(TimeoutHandle::raw), Some(42));
    }
}
