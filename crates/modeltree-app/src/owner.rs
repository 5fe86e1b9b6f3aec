/// Owner-thread action queue.
///
/// Worker threads hold an [`OwnerHandle`] and push boxed actions; the owner
/// thread drains the [`OwnerQueue`] against its state, either once per frame
/// with [`OwnerQueue::pump`] or blocking with [`OwnerQueue::pump_blocking`].
/// Actions run in the order they were sent.
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use modeltree_core::batch::{OwnerAction, OwnerDispatch};
use std::time::Duration;
use tracing::debug;

/// Maximum number of actions run per [`OwnerQueue::pump`] call.
///
/// Keeps a burst of queued work from stalling the owner for a whole frame.
pub const MAX_ACTIONS_PER_PUMP: usize = 64;

/// Receiving end, owned by the owner thread.
///
/// Dropping the queue closes it: actions sent afterwards are dropped unrun,
/// which waiting workers observe as a closed reply channel.
pub struct OwnerQueue<S> {
    tx: Sender<OwnerAction<S>>,
    rx: Receiver<OwnerAction<S>>,
}

impl<S> Default for OwnerQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> OwnerQueue<S> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A sending handle for worker threads.
    pub fn handle(&self) -> OwnerHandle<S> {
        OwnerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run queued actions without blocking, at most
    /// [`MAX_ACTIONS_PER_PUMP`] of them. Returns how many ran.
    pub fn pump(&self, state: &mut S) -> usize {
        let mut ran = 0usize;
        while ran < MAX_ACTIONS_PER_PUMP {
            let action = match self.rx.try_recv() {
                Ok(a) => a,
                Err(_) => break,
            };
            action(state);
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one action and run it.
    ///
    /// Returns `false` if nothing arrived in time.
    pub fn pump_blocking(&self, state: &mut S, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(action) => {
                action(state);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Number of actions waiting to run.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Cloneable sending side of an [`OwnerQueue`].
pub struct OwnerHandle<S> {
    tx: Sender<OwnerAction<S>>,
}

// Derive would require `S: Clone`.
impl<S> Clone for OwnerHandle<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> OwnerDispatch<S> for OwnerHandle<S> {
    fn run_on_owner(&self, action: OwnerAction<S>) {
        if self.tx.send(action).is_err() {
            debug!("Owner queue closed, action dropped");
        }
    }
}
