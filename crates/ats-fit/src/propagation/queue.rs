use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{StatusDispatcher, StatusUpdate, StatusUpdater};
use crate::config::PropagationConfig;

/// Bounded queue drained by a fixed pool of delivery workers.
///
/// Must be created inside a Tokio runtime. No deduplication: the same application id
/// dispatched twice is delivered twice, in no guaranteed order.
#[derive(Clone)]
pub struct PropagationQueue {
    sender: mpsc::Sender<StatusUpdate>,
}

/// Worker handles; they finish once every queue handle is dropped and the backlog is drained.
pub struct PropagationWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl PropagationWorkers {
    pub async fn drain(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                error!(error = %err, "status propagation worker panicked");
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl PropagationQueue {
    pub fn spawn(
        updater: Arc<dyn StatusUpdater>,
        config: &PropagationConfig,
    ) -> (Self, PropagationWorkers) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let policy = RetryPolicy {
            max_attempts: config.max_attempts.max(1),
            backoff: config.retry_backoff,
        };

        let handles = (0..config.workers.max(1))
            .map(|worker| {
                let receiver = Arc::clone(&receiver);
                let updater = Arc::clone(&updater);
                tokio::spawn(async move {
                    loop {
                        let next = receiver.lock().await.recv().await;
                        match next {
                            Some(update) => deliver(updater.as_ref(), update, policy, worker).await,
                            None => break,
                        }
                    }
                })
            })
            .collect();

        (Self { sender }, PropagationWorkers { handles })
    }
}

impl StatusDispatcher for PropagationQueue {
    fn dispatch(&self, update: StatusUpdate) {
        match self.sender.try_send(update) {
            Ok(()) => {}
            Err(TrySendError::Full(update)) => warn!(
                application_id = %update.application_id,
                status_id = update.status_id,
                "status queue full, update dropped"
            ),
            Err(TrySendError::Closed(update)) => warn!(
                application_id = %update.application_id,
                status_id = update.status_id,
                "status queue closed, update dropped"
            ),
        }
    }
}

async fn deliver(updater: &dyn StatusUpdater, update: StatusUpdate, policy: RetryPolicy, worker: usize) {
    for attempt in 1..=policy.max_attempts {
        match updater.update_status(&update).await {
            Ok(receipt) if receipt.ok => {
                info!(
                    worker,
                    attempt,
                    application_id = %update.application_id,
                    status_id = update.status_id,
                    http_status = receipt.http_status,
                    reply = %receipt.bamboohr_reply,
                    "status propagated"
                );
                return;
            }
            Ok(receipt) => warn!(
                worker,
                attempt,
                application_id = %update.application_id,
                http_status = receipt.http_status,
                reply = %receipt.bamboohr_reply,
                "ATS rejected status update"
            ),
            Err(err) => warn!(
                worker,
                attempt,
                application_id = %update.application_id,
                error = %err,
                "status update failed"
            ),
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    error!(
        application_id = %update.application_id,
        status_id = update.status_id,
        attempts = policy.max_attempts,
        "status update abandoned"
    );
}
