//! Poll state
//!
//! Cadence and suspend/resume bookkeeping for the poll loop.

use std::time::Duration;

use crate::config::POLL_PERIOD_MIN;

/// Externally visible state of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Cycling normally
    Running,
    /// Suspend requested; the current cycle will finish first
    SuspendRequested,
    /// Idle until resumed
    Suspended,
    /// Worker has exited after a shutdown
    Stopped,
}

/// Loop state owned by the poller (always accessed under its lock)
#[derive(Debug, Clone)]
pub struct PollState {
    /// Requested delay between cycles (seconds), stored as given
    poll_period: f64,

    /// Floor applied when the period is read (seconds)
    poll_period_min: f64,

    suspend_requested: bool,
    suspended: bool,
    shutdown_requested: bool,
    stopped: bool,
}

impl PollState {
    pub fn new(poll_period: f64, poll_period_min: f64) -> Self {
        Self {
            poll_period,
            poll_period_min,
            suspend_requested: false,
            suspended: false,
            shutdown_requested: false,
            stopped: false,
        }
    }

    /// The period as last set, before clamping
    pub fn poll_period(&self) -> f64 {
        self.poll_period
    }

    pub fn poll_period_min(&self) -> f64 {
        self.poll_period_min
    }

    /// Store a new period. Out-of-range values are accepted here and floored
    /// on every read.
    pub fn set_poll_period(&mut self, seconds: f64) {
        self.poll_period = seconds;
    }

    /// The delay the loop actually sleeps for
    ///
    /// NaN and anything below the floor read as the floor. A period too large
    /// to represent also falls back to the floor, and a floor that cannot be
    /// represented falls back to `POLL_PERIOD_MIN`.
    pub fn effective_period(&self) -> Duration {
        let floor = Duration::try_from_secs_f64(self.poll_period_min)
            .ok()
            .filter(|floor| !floor.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(POLL_PERIOD_MIN));
        let seconds = self.poll_period.max(self.poll_period_min);
        Duration::try_from_secs_f64(seconds).map_or(floor, |period| period.max(floor))
    }

    pub fn request_suspend(&mut self) {
        self.suspend_requested = true;
    }

    /// Consume a pending suspend request at a cycle boundary
    pub fn begin_suspend(&mut self) -> bool {
        if !self.suspend_requested {
            return false;
        }
        self.suspend_requested = false;
        self.suspended = true;
        true
    }

    /// Leave suspension. Returns false if the loop was not suspended.
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.suspended, false)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.stopped = true;
        self.suspended = false;
        self.suspend_requested = false;
    }

    pub fn state(&self) -> PollerState {
        if self.stopped {
            PollerState::Stopped
        } else if self.suspended {
            PollerState::Suspended
        } else if self.suspend_requested {
            PollerState::SuspendRequested
        } else {
            PollerState::Running
        }
    }
}
