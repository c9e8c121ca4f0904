//! Refresh hooks
//!
//! Consumers notified at the end of every poll cycle. Hooks run on the
//! worker thread with the state lock held, so a callback must not call back
//! into the control surface.

use crossbeam::channel::{Sender, TrySendError};

use crate::cache::Snapshot;

/// Callback invoked with the snapshot of each completed cycle
pub type RefreshCallback = Box<dyn FnMut(&Snapshot) + Send>;

#[derive(Default)]
pub(crate) struct RefreshHooks {
    callback: Option<RefreshCallback>,
    subscribers: Vec<Sender<Snapshot>>,
}

impl RefreshHooks {
    pub(crate) fn set_callback(&mut self, callback: Option<RefreshCallback>) {
        self.callback = callback;
    }

    pub(crate) fn subscribe(&mut self, sender: Sender<Snapshot>) {
        self.subscribers.push(sender);
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver a snapshot. Full subscriber queues lose this snapshot;
    /// disconnected subscribers are dropped.
    pub(crate) fn notify(&mut self, snapshot: &Snapshot) {
        if let Some(callback) = self.callback.as_mut() {
            callback(snapshot);
        }

        self.subscribers.retain(|tx| match tx.try_send(*snapshot) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Subscriber queue full, dropping cycle {}", snapshot.cycle);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}
