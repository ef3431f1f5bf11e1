//! Outstanding-job counter with a fire-once "all done" signal.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TrackerState {
    outstanding: usize,
    /// Bumped every time the count leaves zero.
    epoch: u64,
}

impl TrackerState {
    fn fired_for(self, epoch: u64) -> bool {
        self.epoch > epoch || self.outstanding == 0
    }
}

/// Counts queued + running jobs and signals when the count drops to zero.
///
/// The count lives inside the watch value and is only mutated under the
/// channel's write lock, so `begin`/`finish` from different tasks can neither
/// lose an update nor fire an epoch that was already rearmed.
#[derive(Debug)]
pub struct CompletionTracker {
    state: watch::Sender<TrackerState>,
}

impl CompletionTracker {
    /// Idle tracker: nothing outstanding, current signal already fired.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(TrackerState::default());
        Self { state }
    }

    /// Account for one newly submitted job.
    ///
    /// Returns `true` when the tracker was idle and has been rearmed.
    pub fn begin(&self) -> bool {
        let mut rearmed = false;
        self.state.send_modify(|state| {
            if state.outstanding == 0 {
                state.epoch += 1;
                rearmed = true;
            }
            state.outstanding += 1;
        });
        rearmed
    }

    /// Account for one finished job; fires the signal when nothing is left.
    pub fn finish(&self) {
        self.state.send_modify(|state| {
            debug_assert!(state.outstanding > 0, "finish without matching begin");
            state.outstanding = state.outstanding.saturating_sub(1);
        });
    }

    /// Jobs currently queued or running.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.state.borrow().outstanding
    }

    /// Signal for the current round of work.
    #[must_use]
    pub fn done(&self) -> Done {
        let rx = self.state.subscribe();
        let epoch = rx.borrow().epoch;
        Done { rx, epoch }
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire-once completion signal.
///
/// Clones share the same round; once a handle reports done it keeps doing so.
/// Await it directly or call [`Done::wait`].
#[derive(Debug, Clone)]
pub struct Done {
    rx: watch::Receiver<TrackerState>,
    epoch: u64,
}

impl Done {
    /// Non-blocking check.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.rx.borrow().fired_for(self.epoch)
    }

    /// Wait until the signal fires.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let epoch = self.epoch;
        // Err only when the tracker is gone, which means no job can still run.
        let _ = rx.wait_for(|state| state.fired_for(epoch)).await;
    }
}

impl IntoFuture for Done {
    type Output = ();
    type IntoFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move { self.wait().await })
    }
}
