//! Periodic auto-save driver.

use super::{AutoSaveOutcome, SessionInner};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A running auto-save loop owned by one session.
///
/// The first tick fires one full period after spawn. Dropping the task cancels it without
/// waiting; [`AutoSaveTask::cancel`] also joins it.
#[derive(Debug)]
pub(crate) struct AutoSaveTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl AutoSaveTask {
    pub(crate) fn spawn(inner: Arc<SessionInner>, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "auto-save started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match inner.auto_save_tick().await {
                            AutoSaveOutcome::Saved(count) => {
                                debug!(count, "auto-save tick saved drafts")
                            }
                            AutoSaveOutcome::Skipped => debug!("auto-save tick skipped"),
                            // Logged in auto_save_tick; retried next tick.
                            AutoSaveOutcome::Failed => {}
                        }
                    }
                }
            }

            info!("auto-save stopped");
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop the loop and wait for it to exit.
    pub(crate) async fn cancel(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for AutoSaveTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
