//! Control surface
//!
//! Setters and getters used by glue code. Every operation takes the same
//! lock as the poll loop, so while a cycle is in flight they wait for it to
//! finish; none of them performs I/O.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver};

use crate::cache::{Field, Reading, Snapshot};
use crate::error::{IdsError, Result};

use super::{PollerState, Shared};

/// Clonable handle onto a poller's shared state
#[derive(Clone)]
pub struct ControlSurface {
    shared: Arc<Shared>,
}

impl ControlSurface {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    // =========================================================================
    // Suspend / resume
    // =========================================================================

    /// Ask the loop to suspend once the current cycle completes
    pub fn request_suspend(&self) {
        let mut inner = self.shared.inner.lock();
        inner.state.request_suspend();
        tracing::info!("Suspend requested");
    }

    /// Wake a suspended loop. A no-op when not suspended.
    pub fn resume(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.state.resume() {
            tracing::info!("Resume requested");
            self.shared.wake.notify_all();
        } else {
            tracing::debug!("Resume ignored: poller is {:?}", inner.state.state());
        }
    }

    pub(crate) fn request_shutdown(&self) {
        let mut inner = self.shared.inner.lock();
        inner.state.request_shutdown();
        self.shared.wake.notify_all();
        tracing::info!("Shutdown requested");
    }

    pub fn state(&self) -> PollerState {
        self.shared.inner.lock().state.state()
    }

    // =========================================================================
    // Poll period
    // =========================================================================

    /// Store a new poll period (seconds). Values below the floor are kept
    /// as given and floored each time the loop reads them.
    pub fn set_poll_period(&self, seconds: f64) {
        let mut inner = self.shared.inner.lock();
        inner.state.set_poll_period(seconds);
        if seconds.is_nan() || seconds < inner.state.poll_period_min() {
            tracing::debug!(
                "Poll period {} below floor {}, will be clamped",
                seconds,
                inner.state.poll_period_min()
            );
        }
    }

    /// The poll period as last set
    pub fn poll_period(&self) -> f64 {
        self.shared.inner.lock().state.poll_period()
    }

    /// The delay the loop will actually use
    pub fn effective_poll_period(&self) -> Duration {
        self.shared.inner.lock().state.effective_period()
    }

    // =========================================================================
    // Cached values
    // =========================================================================

    /// Last published value of one field
    pub fn read(&self, field: Field) -> Result<Reading> {
        self.shared
            .inner
            .lock()
            .cache
            .get(field)
            .ok_or_else(|| IdsError::UnknownParameter(field.name()))
    }

    /// Copy of every cached value
    pub fn snapshot(&self) -> Snapshot {
        self.shared.inner.lock().cache.snapshot()
    }

    // =========================================================================
    // Refresh notification
    // =========================================================================

    /// Install the callback run after every cycle, replacing any previous one.
    ///
    /// The callback runs on the poll thread with the state lock held; it must
    /// not call back into this surface.
    pub fn set_refresh_callback(&self, callback: impl FnMut(&Snapshot) + Send + 'static) {
        self.shared.inner.lock().hooks.set_callback(Some(Box::new(callback)));
    }

    pub fn clear_refresh_callback(&self) {
        self.shared.inner.lock().hooks.set_callback(None);
    }

    /// Receive a snapshot after every cycle. At most `capacity` snapshots are
    /// queued; later ones are dropped until the receiver catches up.
    pub fn subscribe(&self, capacity: usize) -> Receiver<Snapshot> {
        let (tx, rx) = bounded(capacity.max(1));
        self.shared.inner.lock().hooks.subscribe(tx);
        rx
    }

    // =========================================================================
    // Parameter access by name
    // =========================================================================

    /// Write a parameter by name
    ///
    /// - `POLL_PERIOD`: new period in seconds
    /// - `SUSPEND_POLLER`: non-zero requests a suspend
    /// - `RESUME_POLLER`: non-zero resumes
    pub fn write_param(&self, name: &str, value: f64) -> Result<()> {
        match name.parse::<Param>()? {
            Param::PollPeriod => self.set_poll_period(value),
            Param::SuspendPoller => {
                if value != 0.0 {
                    self.request_suspend();
                }
            }
            Param::ResumePoller => {
                if value != 0.0 {
                    self.resume();
                }
            }
            Param::Value(field) => return Err(IdsError::ReadOnlyParameter(field.name())),
        }
        Ok(())
    }

    /// Read a parameter by name
    pub fn read_param(&self, name: &str) -> Result<ParamValue> {
        match name.parse::<Param>()? {
            Param::Value(field) => self.read(field).map(ParamValue::from),
            Param::PollPeriod => Ok(ParamValue::Float64(self.poll_period())),
            Param::SuspendPoller => Ok(ParamValue::Bool(matches!(
                self.state(),
                PollerState::SuspendRequested | PollerState::Suspended
            ))),
            Param::ResumePoller => Ok(ParamValue::Bool(self.state() == PollerState::Running)),
        }
    }
}

// =============================================================================
// Parameter names
// =============================================================================

/// Every parameter exposed to glue code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// A read-only cached value
    Value(Field),
    PollPeriod,
    SuspendPoller,
    ResumePoller,
}

impl Param {
    pub fn name(&self) -> String {
        match self {
            Param::Value(field) => field.name(),
            Param::PollPeriod => "POLL_PERIOD".to_string(),
            Param::SuspendPoller => "SUSPEND_POLLER".to_string(),
            Param::ResumePoller => "RESUME_POLLER".to_string(),
        }
    }

    /// All parameter names, cached values first
    pub fn all() -> Vec<Param> {
        Field::ALL
            .iter()
            .copied()
            .map(Param::Value)
            .chain([Param::PollPeriod, Param::SuspendPoller, Param::ResumePoller])
            .collect()
    }
}

impl FromStr for Param {
    type Err = IdsError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "POLL_PERIOD" => Ok(Param::PollPeriod),
            "SUSPEND_POLLER" => Ok(Param::SuspendPoller),
            "RESUME_POLLER" => Ok(Param::ResumePoller),
            _ => name.parse().map(Param::Value),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Value of a parameter read by name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int64(i64),
    Bool(bool),
    Float64(f64),
}

impl From<Reading> for ParamValue {
    fn from(reading: Reading) -> Self {
        match reading {
            Reading::Int64(v) => ParamValue::Int64(v),
            Reading::Bool(v) => ParamValue::Bool(v),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int64(v) => write!(f, "{}", v),
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Float64(v) => write!(f, "{}", v),
        }
    }
}
