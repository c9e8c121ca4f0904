//! Poller Module
//!
//! Background engine that refreshes the value cache on a fixed cadence.
//!
//! ## Architecture
//! - One dedicated worker thread runs the poll loop
//! - One coarse lock guards poll state, the value cache and refresh hooks
//! - The worker holds the lock for a full cycle and releases it only while
//!   sleeping between cycles or while suspended
//! - Control operations and cache reads come from any thread
//!
//! ## State Machine
//! ```text
//!            request_suspend()             end of cycle
//!  Running ───────────────────► SuspendRequested ──────────► Suspended
//!     ▲                                                          │
//!     └─────────────────────────── resume() ─────────────────────┘
//! ```
//! `shutdown()` moves any state to `Stopped` at the next boundary.

mod state;
mod hooks;
mod engine;
mod control;

use parking_lot::{Condvar, Mutex};

use crate::cache::ValueCache;

pub use state::{PollState, PollerState};
pub use hooks::RefreshCallback;
pub use engine::{Poller, PollerHandle};
pub use control::{ControlSurface, Param, ParamValue};

/// State shared between the worker and every control surface
pub(crate) struct Shared {
    /// The single coarse lock
    pub(crate) inner: Mutex<Inner>,

    /// Signalled on resume and shutdown
    pub(crate) wake: Condvar,
}

/// Everything behind the lock
pub(crate) struct Inner {
    pub(crate) state: PollState,
    pub(crate) cache: ValueCache,
    pub(crate) hooks: hooks::RefreshHooks,
}

impl Shared {
    pub(crate) fn new(state: PollState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                cache: ValueCache::new(),
                hooks: hooks::RefreshHooks::default(),
            }),
            wake: Condvar::new(),
        }
    }
}
