/*
[INPUT]:  Refresh callbacks supplied by the UI and a delay
[OUTPUT]: Delayed one-shot callback execution with cancellation handles
[POS]:    Scheduling layer - post-settlement balance/history refresh
[UPDATE]: When refresh timing or cancellation semantics change
*/

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Re-pulls some piece of UI state. Must be safe to run more than once.
pub type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

/// Delay after an order settles; the balance indexer trails finality.
pub const ORDER_REFRESH_DELAY: Duration = Duration::from_millis(5000);
/// Delay after a deposit or withdraw settles.
pub const TRANSFER_REFRESH_DELAY: Duration = Duration::from_millis(3000);

/// Arms delayed refreshes. Clones share one cancellation scope.
#[derive(Debug, Clone, Default)]
pub struct RefreshScheduler {
    root: CancellationToken,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback once, `delay` after this call, each on its own task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&self, callbacks: &[RefreshCallback], delay: Duration) -> RefreshHandle {
        let token = self.root.child_token();
        let tasks = callbacks
            .iter()
            .map(|callback| {
                let callback = Arc::clone(callback);
                let token = token.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => false,
                        _ = tokio::time::sleep(delay) => {
                            callback();
                            true
                        }
                    }
                })
            })
            .collect::<Vec<_>>();

        debug!(
            callbacks = tasks.len(),
            delay_ms = delay.as_millis() as u64,
            "refresh armed"
        );
        RefreshHandle { token, tasks }
    }

    /// Cancel every pending refresh; anything armed afterwards never fires.
    pub fn cancel_all(&self) {
        self.root.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }
}

/// Pending refreshes from one `arm` call.
pub struct RefreshHandle {
    token: CancellationToken,
    tasks: Vec<JoinHandle<bool>>,
}

impl RefreshHandle {
    /// Drop callbacks that have not fired yet. Already-run callbacks stay run.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every callback to fire or be cancelled; returns how many ran.
    pub async fn wait(self) -> usize {
        let mut ran = 0;
        for task in self.tasks {
            if let Ok(true) = task.await {
                ran += 1;
            }
        }
        ran
    }
}

impl fmt::Debug for RefreshHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshHandle")
            .field("callbacks", &self.tasks.len())
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}
