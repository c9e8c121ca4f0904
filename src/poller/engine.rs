//! Poll engine
//!
//! The worker loop and its per-cycle algorithm.

use std::ops::Deref;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::cache::{Quantity, Snapshot};
use crate::client::RpcClient;
use crate::config::Config;
use crate::error::{IdsError, Result};
use crate::transport::Transport;

use super::control::ControlSurface;
use super::{Inner, PollState, Shared};

/// Name of the worker thread
const WORKER_NAME: &str = "ids-poller";

/// A poll engine that has not been started yet
///
/// Created once per instrument. Register refresh hooks through `controls()`
/// before `spawn()` to observe the very first cycle.
pub struct Poller<T: Transport> {
    client: RpcClient<T>,
    shared: Arc<Shared>,
}

impl<T: Transport + 'static> Poller<T> {
    /// Create an engine around `transport`
    pub fn new(transport: T, config: &Config) -> Result<Self> {
        config.validate()?;

        let state = PollState::new(config.poll_period, config.poll_period_min);

        Ok(Self {
            client: RpcClient::new(transport, config),
            shared: Arc::new(Shared::new(state)),
        })
    }

    /// Control surface for this engine
    pub fn controls(&self) -> ControlSurface {
        ControlSurface::new(Arc::clone(&self.shared))
    }

    /// Run one cycle on the calling thread (no sleep, no suspend handling)
    pub fn poll_once(&mut self) -> Snapshot {
        let mut inner = self.shared.inner.lock();
        run_cycle(&mut self.client, &mut inner)
    }

    /// Start the worker thread
    pub fn spawn(self) -> Result<PollerHandle> {
        let controls = self.controls();

        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || self.run())?;

        Ok(PollerHandle {
            controls,
            worker: Some(worker),
        })
    }

    /// The poll loop
    ///
    /// The lock is held from the start of a cycle until the worker blocks,
    /// either on resume or on the inter-cycle sleep; both waits release it.
    fn run(mut self) {
        let shared = Arc::clone(&self.shared);
        let mut inner = shared.inner.lock();

        tracing::info!("Poller started ({})", self.client.transport().peer());

        while !inner.state.shutdown_requested() {
            // Step 1: read the period once per cycle, floored
            let period = inner.state.effective_period();

            // Steps 2-4: battery, cache, notify
            let started = Instant::now();
            let snapshot = run_cycle(&mut self.client, &mut inner);
            tracing::trace!(
                "Cycle {} took {:?}, next in {:?}",
                snapshot.cycle,
                started.elapsed(),
                period
            );

            // Step 5: suspend at the cycle boundary
            if inner.state.begin_suspend() {
                tracing::info!("Poller suspended after cycle {}", snapshot.cycle);
                while inner.state.is_suspended() && !inner.state.shutdown_requested() {
                    shared.wake.wait(&mut inner);
                }
                if inner.state.shutdown_requested() {
                    break;
                }
                tracing::info!("Poller resumed");
            }

            // Step 6: sleep without the lock
            let deadline = Instant::now() + period;
            while !inner.state.shutdown_requested() {
                if shared.wake.wait_until(&mut inner, deadline).timed_out() {
                    break;
                }
            }
        }

        inner.state.mark_stopped();
        tracing::info!("Poller stopped");
    }
}

/// One full pass over the battery
///
/// Each call is independent: a failed call leaves its cached value as it was
/// and the rest of the battery still runs.
fn run_cycle<T: Transport>(client: &mut RpcClient<T>, inner: &mut Inner) -> Snapshot {
    let mut failed = 0;

    for quantity in Quantity::BATTERY {
        let refreshed = client
            .call_typed(quantity.method(), quantity.shape())
            .map(|result| inner.cache.apply(quantity, result))
            .unwrap_or(false);

        if !refreshed {
            failed += 1;
        }
    }

    let cycle = inner.cache.finish_cycle();
    if failed > 0 {
        tracing::debug!(
            "Cycle {}: {} of {} values stale",
            cycle,
            failed,
            Quantity::BATTERY.len()
        );
    }

    let snapshot = inner.cache.snapshot();
    inner.hooks.notify(&snapshot);
    snapshot
}

// =============================================================================
// Handle to a running engine
// =============================================================================

/// A running poll engine
///
/// Dereferences to its `ControlSurface`. Dropping the handle detaches the
/// worker, which then runs for the rest of the process.
pub struct PollerHandle {
    controls: ControlSurface,
    worker: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// A clonable control surface for other threads
    pub fn controls(&self) -> ControlSurface {
        self.controls.clone()
    }

    /// Whether the worker thread has exited
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |w| w.is_finished())
    }

    /// Stop the loop at the next boundary and wait for the worker
    pub fn shutdown(mut self) -> Result<()> {
        self.controls.request_shutdown();
        self.join_worker()
    }

    /// Wait for the worker without asking it to stop
    pub fn join(mut self) -> Result<()> {
        self.join_worker()
    }

    /// Wait until `pred` holds for the latest snapshot, or `timeout` expires
    pub fn wait_for(&self, timeout: Duration, pred: impl Fn(&Snapshot) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if pred(&self.controls.snapshot()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn join_worker(&mut self) -> Result<()> {
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| IdsError::Worker("poll worker panicked".to_string())),
            None => Ok(()),
        }
    }
}

impl Deref for PollerHandle {
    type Target = ControlSurface;

    fn deref(&self) -> &Self::Target {
        &self.controls
    }
}
