//! Polling loop implementation.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiError;

use super::config::PollerConfig;
use super::types::{PollSnapshot, StatusCarrier};

/// Handle to one spawned polling task.
///
/// Dropping the handle cancels the task the same way [`PollHandle::cancel`]
/// does; an already-scheduled tick never issues another request after either.
pub struct PollHandle<R> {
    snapshot_rx: watch::Receiver<PollSnapshot<R>>,
    cancel_tx: watch::Sender<bool>,
}

impl<R: Clone> PollHandle<R> {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> PollSnapshot<R> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.snapshot_rx.borrow().finished
    }

    /// Stop polling immediately. Idempotent.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Wait until polling stops (terminal status, error, or cancellation)
    /// and return the final snapshot.
    pub async fn wait_terminal(&mut self) -> PollSnapshot<R> {
        loop {
            {
                let snapshot = self.snapshot_rx.borrow();
                if snapshot.finished {
                    return snapshot.clone();
                }
            }
            if self.snapshot_rx.changed().await.is_err() {
                return self.snapshot_rx.borrow().clone();
            }
        }
    }
}

/// Spawn a polling task for one operation identifier.
///
/// Fetches immediately, then re-fetches after `interval_ms` for as long as
/// the response status is pending. Any terminal status, transport error, or
/// cancellation stops the task permanently. An empty identifier yields an
/// already-finished handle without issuing a request.
pub fn spawn_poller<R, F, Fut>(
    config: &PollerConfig,
    operation_id: impl Into<String>,
    fetch: F,
) -> PollHandle<R>
where
    R: StatusCarrier + Clone + Send + Sync + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
{
    let operation_id = operation_id.into();
    let interval = Duration::from_millis(config.interval_ms);

    let (snapshot_tx, snapshot_rx) = watch::channel(PollSnapshot::default());
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        if operation_id.is_empty() {
            snapshot_tx.send_modify(|s| s.finished = true);
            return;
        }

        loop {
            // Liveness guard: a cancel that landed while this tick was
            // scheduled must win over the scheduled request.
            if *cancel_rx.borrow() {
                break;
            }

            match fetch(operation_id.clone()).await {
                Ok(response) => {
                    let status = response.processing_status();
                    let pending = status.is_pending();
                    snapshot_tx.send_modify(|s| {
                        s.polls += 1;
                        s.last = Some(response);
                        s.finished = !pending;
                    });

                    if !pending {
                        debug!(
                            operation_id = %operation_id,
                            status = status.as_str(),
                            "Operation resolved, polling stopped"
                        );
                        return;
                    }
                }
                Err(e) => {
                    warn!(operation_id = %operation_id, error = %e, "Polling failed");
                    snapshot_tx.send_modify(|s| {
                        s.error = Some(e.to_string());
                        s.finished = true;
                    });
                    return;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                res = cancel_rx.changed() => {
                    if res.is_err() {
                        // Handle dropped; nobody is observing anymore.
                        break;
                    }
                }
            }
        }

        snapshot_tx.send_modify(|s| s.finished = true);
        debug!(operation_id = %operation_id, "Polling cancelled");
    });

    PollHandle {
        snapshot_rx,
        cancel_tx,
    }
}
