use std::time::{Duration, Instant};

use tracing::debug;

/// Default length of a timed session.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 60;

/// Granularity of the countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Shortest period a countdown accepts. Shorter values are clamped up to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was due, or the countdown is not running.
    Idle,
    /// One or more seconds elapsed; carries the remaining value.
    Ticked(u32),
    /// The countdown reached zero during this call. Reported once per run.
    Expired,
}

/// Repeating schedule that stays armed until it is dropped.
#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    next_due: Instant,
}

impl Interval {
    fn starting_at(now: Instant, period: Duration) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Count the periods that have come due at `now` and move past them.
    fn take_due(&mut self, now: Instant) -> u32 {
        if now < self.next_due {
            return 0;
        }
        let behind = now.duration_since(self.next_due).as_nanos() / self.period.as_nanos();
        let due = u32::try_from(behind + 1).unwrap_or(u32::MAX);
        self.next_due += self.period * due;
        due
    }
}

/// Restartable countdown with one-second granularity.
///
/// The countdown owns its repeating schedule. `stop` and `reset` drop the
/// schedule synchronously, so a stopped countdown can never report another
/// tick. Callers drive it by calling [`Countdown::poll`] from their event
/// loop with the current instant.
#[derive(Debug, Clone)]
pub struct Countdown {
    initial_secs: u32,
    remaining_secs: u32,
    period: Duration,
    schedule: Option<Interval>,
}

impl Countdown {
    pub fn new(initial_secs: u32) -> Self {
        Self::with_period(initial_secs, TICK_PERIOD)
    }

    /// `period` is clamped to at least [`MIN_TICK_PERIOD`].
    pub fn with_period(initial_secs: u32, period: Duration) -> Self {
        Self {
            initial_secs,
            remaining_secs: initial_secs,
            period: period.max(MIN_TICK_PERIOD),
            schedule: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    /// Arm the schedule. Does nothing if already running or out of time.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() || self.remaining_secs == 0 {
            return false;
        }
        self.schedule = Some(Interval::starting_at(now, self.period));
        debug!(remaining = self.remaining_secs, "countdown started");
        true
    }

    /// Halt ticking, keeping the remaining value.
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            debug!(remaining = self.remaining_secs, "countdown stopped");
        }
    }

    /// Stop and restore the configured initial value.
    pub fn reset(&mut self) {
        self.stop();
        self.remaining_secs = self.initial_secs;
    }

    /// Decrement by one second. Stops itself when zero is reached.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.schedule = None;
            debug!("countdown expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked(self.remaining_secs)
        }
    }

    /// Fire every tick that has come due by `now`.
    pub fn poll(&mut self, now: Instant) -> TickOutcome {
        let due = match self.schedule.as_mut() {
            Some(schedule) => schedule.take_due(now),
            None => return TickOutcome::Idle,
        };

        let mut outcome = TickOutcome::Idle;
        for _ in 0..due {
            outcome = self.tick();
            if outcome == TickOutcome::Expired {
                break;
            }
        }
        outcome
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}
