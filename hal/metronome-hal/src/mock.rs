//! Mock implementations for host testing
//!
//! These stand in for the MCU and the watch OS so that timing logic can be
//! exercised without hardware.

use core::cell::RefCell;

use heapless::{LinearMap, Vec};

use crate::click::{ButtonId, ClickConfig};
use crate::registers::RegisterAccess;
use crate::timeout::{Cookie, TimeoutHandle, TimeoutScheduler};

/// Maximum distinct registers in the simulated file
pub const MOCK_REGISTERS: usize = 16;

/// Maximum writes kept in the write log
pub const MOCK_WRITE_LOG: usize = 64;

/// Simulated register file
///
/// Unwritten registers read as zero. Every read and write is appended to a
/// log so tests can check access order. Optionally emulates a timer's update event:
/// writing bit 0 of the event register zeroes the counter register and the
/// bit self-clears, as on the real peripheral.
#[derive(Default)]
pub struct MockRegisters {
    values: LinearMap<u32, u32, MOCK_REGISTERS>,
    writes: Vec<(u32, u32), MOCK_WRITE_LOG>,
    reads: Vec<u32, MOCK_WRITE_LOG>,
    update_event: Option<(u32, u32)>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate update generation: a write of bit 0 to `event_addr` resets
    /// `counter_addr`
    pub fn with_update_event(mut self, event_addr: u32, counter_addr: u32) -> Self {
        self.update_event = Some((event_addr, counter_addr));
        self
    }

    /// Current value of a register, without logging
    pub fn get(&self, addr: u32) -> u32 {
        self.values.get(&addr).copied().unwrap_or(0)
    }

    /// Set a register as the hardware would, without logging
    pub fn set(&mut self, addr: u32, value: u32) {
        if self.values.insert(addr, value).is_err() {
            panic!("mock register file full at {:#010x}", addr);
        }
    }

    /// All writes since creation or the last [`clear_log`](Self::clear_log)
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    /// Writes to one register, oldest first
    pub fn writes_to(&self, addr: u32) -> impl Iterator<Item = u32> + '_ {
        self.writes
            .iter()
            .filter(move |(a, _)| *a == addr)
            .map(|(_, v)| *v)
    }

    /// Addresses read since creation or the last
    /// [`clear_log`](Self::clear_log)
    pub fn reads(&self) -> &[u32] {
        &self.reads
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }
}

impl RegisterAccess for MockRegisters {
    fn read32(&mut self, addr: u32) -> u32 {
        let _ = self.reads.push(addr);
        self.get(addr)
    }

    fn write32(&mut self, addr: u32, value: u32) {
        let _ = self.writes.push((addr, value));

        match self.update_event {
            Some((event, counter)) if addr == event && value & 1 != 0 => {
                self.set(counter, 0);
                self.set(event, value & !1);
            }
            _ => self.set(addr, value),
        }
    }
}

/// Maximum timers pending at once in [`MockScheduler`]
pub const MOCK_PENDING: usize = 16;

/// Maximum schedule calls recorded by [`MockScheduler`]
pub const MOCK_SCHEDULE_LOG: usize = 64;

/// A timeout waiting to fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimeout {
    pub handle: TimeoutHandle,
    pub cookie: Cookie,
    pub delay_ms: u32,
    pub due_ms: u64,
}

#[derive(Default)]
struct SchedulerState {
    next_handle: u32,
    now_ms: u64,
    pending: Vec<PendingTimeout, MOCK_PENDING>,
    scheduled: Vec<(u32, Cookie), MOCK_SCHEDULE_LOG>,
    cancels: u32,
}

/// Simulated OS timeout service
///
/// Handles are allocated from 1 upward and never reused. Once
/// [`MOCK_PENDING`] timeouts are pending, `schedule` returns `None`. Time only
/// moves when a timeout is fired with [`fire_next`](Self::fire_next).
#[derive(Default)]
pub struct MockScheduler {
    state: RefCell<SchedulerState>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the earliest pending timeout
    ///
    /// Advances simulated time to its due time and removes it from the
    /// queue. Ties fire in scheduling order. The caller forwards the result to
    /// the app-wide timeout handler.
    pub fn fire_next(&self) -> Option<(TimeoutHandle, Cookie)> {
        let mut state = self.state.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(i, p)| (p.due_ms, *i))
            .map(|(i, _)| i)?;
        let fired = state.pending.remove(index);
        state.now_ms = fired.due_ms;
        Some((fired.handle, fired.cookie))
    }

    /// Simulated milliseconds since creation
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_pending(&self, handle: TimeoutHandle) -> bool {
        self.state
            .borrow()
            .pending
            .iter()
            .any(|p| p.handle == handle)
    }

    /// Pending timeout for `handle`, if any
    pub fn pending(&self, handle: TimeoutHandle) -> Option<PendingTimeout> {
        self.state
            .borrow()
            .pending
            .iter()
            .find(|p| p.handle == handle)
            .copied()
    }

    /// Every `(delay_ms, cookie)` passed to `schedule`, oldest first
    pub fn scheduled(&self) -> Vec<(u32, Cookie), MOCK_SCHEDULE_LOG> {
        self.state.borrow().scheduled.clone()
    }

    /// Delay of the most recent `schedule` call
    pub fn last_delay(&self) -> Option<u32> {
        self.state.borrow().scheduled.last().map(|(d, _)| *d)
    }

    /// Number of `cancel` calls, including ones for stale handles
    pub fn cancel_count(&self) -> u32 {
        self.state.borrow().cancels
    }
}

impl TimeoutScheduler for MockScheduler {
    fn schedule(&self, delay_ms: u32, cookie: Cookie) -> Option<TimeoutHandle> {
        let mut state = self.state.borrow_mut();
        let due_ms = state.now_ms + u64::from(delay_ms);
        let handle = TimeoutHandle::from_raw(state.next_handle.wrapping_add(1))?;

        // Out of timers, like the OS with its timer pool exhausted
        state
            .pending
            .push(PendingTimeout {
                handle,
                cookie,
                delay_ms,
                due_ms,
            })
            .ok()?;
        state.next_handle = handle.raw();
        let _ = state.scheduled.push((delay_ms, cookie));
        Some(handle)
    }

    fn cancel(&self, handle: TimeoutHandle) {
        let mut state = self.state.borrow_mut();
        state.cancels += 1;
        state.pending.retain(|p| p.handle != handle);
    }
}

/// One registration made through [`ClickConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegistration {
    Single(ButtonId),
    Long { button: ButtonId, delay_ms: u32 },
}

/// Click configuration that records what a screen asked for
#[derive(Default)]
pub struct RecordingClickConfig {
    registrations: Vec<ClickRegistration, 16>,
}

impl RecordingClickConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> &[ClickRegistration] {
        &self.registrations
    }

    pub fn has(&self, registration: ClickRegistration) -> bool {
        self.registrations.contains(&registration)
    }
}

impl ClickConfig for RecordingClickConfig {
    fn single_click(&mut self, button: ButtonId) {
        let _ = self.registrations.push(ClickRegistration::Single(button));
    }

    fn long_click(&mut self, button: ButtonId, delay_ms: u32) {
        let _ = self
            .registrations
            .push(ClickRegistration::Long { button, delay_ms });
    }
}
