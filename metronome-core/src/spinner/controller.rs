//! Repeat controller state machine
//!
//! Per direction:
//!
//! ```text
//!            Single ─► step once
//!
//!   Idle ── LongStart ──► Repeating ── timeout ─► step, reschedule ─┐
//!    ▲     (step once,     │    ▲                                    │
//!    │      schedule)      │    └────────────────────────────────────┘
//!    └──── LongRelease ────┘
//!          (cancel)
//! ```
//!
//! Both directions share one change counter. Once it passes the configured
//! threshold, repeats are rescheduled at the fast interval.

use core::cell::Cell;
use core::ops::Deref;

use metronome_hal::{ButtonId, ClickConfig, ClickEvent, ClickKind};
use metronome_hal::{Cookie, TimeoutHandle, TimeoutScheduler};

use crate::config::{ConfigError, SpinnerConfig};
use crate::dispatch::{DispatchError, TimeoutDispatchStack, TimeoutHandler};

/// Extra click configuration run after the spinner's own
pub type ClickSetup<'a> = &'a dyn Fn(&mut dyn ClickConfig);

/// Spin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Button that drives this direction
    pub const fn button(self) -> ButtonId {
        match self {
            Direction::Up => ButtonId::Up,
            Direction::Down => ButtonId::Down,
        }
    }

    pub const fn from_button(button: ButtonId) -> Option<Self> {
        match button {
            ButtonId::Up => Some(Direction::Up),
            ButtonId::Down => Some(Direction::Down),
            ButtonId::Back | ButtonId::Select => None,
        }
    }
}

/// Accelerating up/down repeat controller
///
/// Construct once per screen. Activate it while the screen is visible and
/// deactivate it when the screen disappears, preferably through
/// [`activate_scoped`](Self::activate_scoped), which cannot be forgotten.
/// A spinner left active on a hidden screen keeps firing into that screen.
pub struct RepeatController<'a> {
    cookie: Cookie,
    config: Cell<SpinnerConfig>,
    up: &'a dyn Fn(),
    down: &'a dyn Fn(),
    extra_clicks: Option<ClickSetup<'a>>,
    up_timer: Cell<Option<TimeoutHandle>>,
    down_timer: Cell<Option<TimeoutHandle>>,
    changes: Cell<u32>,
}

impl<'a> RepeatController<'a> {
    /// Create a spinner calling `up` and `down` for each change
    ///
    /// `cookie` tags this spinner's timeouts; give each spinner that can be
    /// active at the same time a distinct one.
    pub fn new(cookie: Cookie, up: &'a dyn Fn(), down: &'a dyn Fn()) -> Self {
        Self {
            cookie,
            config: Cell::new(SpinnerConfig::default()),
            up,
            down,
            extra_clicks: None,
            up_timer: Cell::new(None),
            down_timer: Cell::new(None),
            changes: Cell::new(0),
        }
    }

    /// Use `config` instead of the default timing
    ///
    /// Fails if `config` does not validate.
    pub fn with_config(self, config: SpinnerConfig) -> Result<Self, ConfigError> {
        self.set_config(config)?;
        Ok(self)
    }

    /// Chain a screen's own click setup (e.g. a Select handler) after the
    /// spinner's
    pub fn with_extra_clicks(mut self, setup: ClickSetup<'a>) -> Self {
        self.extra_clicks = Some(setup);
        self
    }

    pub fn config(&self) -> SpinnerConfig {
        self.config.get()
    }

    /// Replace the timing configuration
    ///
    /// The long-press delay takes effect at the next click configuration.
    /// An invalid `config` is rejected and the current one kept.
    pub fn set_config(&self, config: SpinnerConfig) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            #[cfg(feature = "defmt")]
            defmt::warn!("spinner {}: rejected config: {}", self.cookie, e);
            return Err(e);
        }
        self.config.set(config);
        Ok(())
    }

    pub fn cookie(&self) -> Cookie {
        self.cookie
    }

    /// Repeats since the last long press started
    pub fn change_count(&self) -> u32 {
        self.changes.get()
    }

    /// Check whether a repeat timer is outstanding for `direction`
    pub fn is_repeating(&self, direction: Direction) -> bool {
        self.slot(direction).get().is_some()
    }

    /// Register the spinner's timeout handler
    ///
    /// Fails without side effects if the dispatch stack is full; the
    /// spinner then only reacts to single clicks. Fails with
    /// [`DispatchError::AlreadyActive`] if the handler is already on the
    /// stack, so one [`deactivate`](Self::deactivate) always undoes one
    /// successful activation.
    pub fn activate(&'a self, stack: &TimeoutDispatchStack<'a>) -> Result<(), DispatchError> {
        let pushed = if stack.contains(self) {
            Err(DispatchError::AlreadyActive)
        } else {
            stack.push(self)
        };

        match pushed {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("spinner {}: active", self.cookie);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("spinner {}: activation failed: {}", self.cookie, e);
                Err(e)
            }
        }
    }

    /// Activate for the lifetime of the returned guard
    ///
    /// Dropping the guard deactivates the spinner. Deactivation only pops
    /// the stack while the spinner is on top; if another handler was pushed
    /// above it and never removed, the spinner's handler stays on the stack.
    /// Use [`ActiveSpinner::deactivate`] to find out.
    pub fn activate_scoped<'s>(
        &'a self,
        stack: &'s TimeoutDispatchStack<'a>,
        timers: &'s dyn TimeoutScheduler,
    ) -> Result<ActiveSpinner<'s, 'a>, DispatchError> {
        self.activate(stack)?;
        Ok(ActiveSpinner {
            spinner: self,
            stack,
            timers,
        })
    }

    /// Cancel outstanding repeats and remove the handler from the stack
    ///
    /// Returns `false` if the spinner's handler was not on top of the stack;
    /// the stack is then left as it is.
    pub fn deactivate(&self, stack: &TimeoutDispatchStack<'_>, timers: &dyn TimeoutScheduler) -> bool {
        self.cancel_repeat(Direction::Up, timers);
        self.cancel_repeat(Direction::Down, timers);

        let popped = stack.pop_handler(self);

        #[cfg(feature = "defmt")]
        {
            if popped {
                defmt::debug!("spinner {}: inactive", self.cookie);
            } else {
                defmt::warn!("spinner {}: not on top of timeout stack", self.cookie);
            }
        }

        popped
    }

    /// Register the spinner's clicks, then any extra click setup
    pub fn configure_clicks(&self, clicks: &mut dyn ClickConfig) {
        let delay_ms = self.config.get().start_repeat_delay_ms;

        for direction in [Direction::Up, Direction::Down] {
            clicks.single_click(direction.button());
            clicks.long_click(direction.button(), delay_ms);
        }

        if let Some(setup) = self.extra_clicks {
            setup(clicks);
        }
    }

    /// Handle a click delivered to the screen
    ///
    /// Returns `false` for buttons other than Up and Down so the screen can
    /// handle them.
    pub fn handle_click(&self, event: ClickEvent, timers: &dyn TimeoutScheduler) -> bool {
        let Some(direction) = Direction::from_button(event.button) else {
            return false;
        };

        match event.kind {
            ClickKind::Single => self.step(direction),
            ClickKind::LongStart => self.start_repeat(direction, timers),
            ClickKind::LongRelease => self.cancel_repeat(direction, timers),
        }
        true
    }

    fn step(&self, direction: Direction) {
        match direction {
            Direction::Up => (self.up)(),
            Direction::Down => (self.down)(),
        }
    }

    fn slot(&self, direction: Direction) -> &Cell<Option<TimeoutHandle>> {
        match direction {
            Direction::Up => &self.up_timer,
            Direction::Down => &self.down_timer,
        }
    }

    /// Begin repeating: schedule the first repeat and change once right away
    fn start_repeat(&self, direction: Direction, timers: &dyn TimeoutScheduler) {
        // A missed release would otherwise leave an orphaned timer
        if let Some(stale) = self.slot(direction).take() {
            timers.cancel(stale);
        }

        let interval = self.config.get().repeat_interval_ms;
        self.schedule_repeat(direction, interval, timers);
        self.changes.set(0);

        self.step(direction);
    }

    /// Schedule the next repeat; without a timer the long press just stops
    fn schedule_repeat(
        &self,
        direction: Direction,
        interval: u32,
        timers: &dyn TimeoutScheduler,
    ) {
        let handle = timers.schedule(interval, self.cookie);

        #[cfg(feature = "defmt")]
        {
            if handle.is_none() {
                defmt::warn!("spinner {}: no timer for repeat", self.cookie);
            }
        }

        self.slot(direction).set(handle);
    }

    fn cancel_repeat(&self, direction: Direction, timers: &dyn TimeoutScheduler) {
        if let Some(handle) = self.slot(direction).take() {
            timers.cancel(handle);
        }
    }

    fn direction_for(&self, handle: TimeoutHandle) -> Option<Direction> {
        if self.up_timer.get() == Some(handle) {
            Some(Direction::Up)
        } else if self.down_timer.get() == Some(handle) {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

impl TimeoutHandler for RepeatController<'_> {
    fn on_timeout(
        &self,
        timers: &dyn TimeoutScheduler,
        handle: TimeoutHandle,
        cookie: Cookie,
    ) -> bool {
        if cookie != self.cookie {
            return false;
        }
        let Some(direction) = self.direction_for(handle) else {
            return false;
        };

        let changes = self.changes.get().saturating_add(1);
        self.changes.set(changes);
        let interval = self.config.get().interval_after(changes);

        self.step(direction);

        self.schedule_repeat(direction, interval, timers);

        #[cfg(feature = "defmt")]
        defmt::trace!("spinner {}: repeat {} in {} ms", self.cookie, changes, interval);

        true
    }
}

/// An activated spinner
///
/// Deactivates the spinner when dropped. Hold it for exactly as long as the
/// owning screen is visible.
pub struct ActiveSpinner<'s, 'a> {
    spinner: &'a RepeatController<'a>,
    stack: &'s TimeoutDispatchStack<'a>,
    timers: &'s dyn TimeoutScheduler,
}

impl ActiveSpinner<'_, '_> {
    /// Handle a click with the scheduler the spinner was activated with
    pub fn handle_click(&self, event: ClickEvent) -> bool {
        self.spinner.handle_click(event, self.timers)
    }

    /// Deactivate now
    ///
    /// Returns whether the handler came off the stack; `false` means another
    /// handler is still above it and the spinner's handler was left in place.
    pub fn deactivate(self) -> bool {
        let popped = self.spinner.deactivate(self.stack, self.timers);
        core::mem::forget(self);
        popped
    }
}

impl<'a> Deref for ActiveSpinner<'_, 'a> {
    type Target = RepeatController<'a>;

    fn deref(&self) -> &Self::Target {
        self.spinner
    }
}

impl Drop for ActiveSpinner<'_, '_> {
    fn drop(&mut self) {
        self.spinner.deactivate(self.stack, self.timers);
    }
}
