//! Fire-and-forget propagation of computed statuses back to the origin ATS.
//!
//! The analysis pipeline only sees [`StatusDispatcher`]; dispatching never blocks and never
//! reports failure to the caller. Delivery, retries and logging happen on the worker side.

pub mod client;
pub mod queue;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::resolver::RecordId;
use crate::analysis::status::AtsStatus;

pub use client::{status_updater, AtsStatusClient, RelayStatusClient};
pub use queue::{PropagationQueue, PropagationWorkers};

/// Body of a status-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub application_id: RecordId,
    pub status_id: u32,
}

impl StatusUpdate {
    pub fn new(application_id: RecordId, status: AtsStatus) -> Self {
        Self {
            application_id,
            status_id: status.code(),
        }
    }
}

/// Envelope describing what the ATS answered. A non-JSON reply is still a valid receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReceipt {
    pub ok: bool,
    pub http_status: u16,
    pub bamboohr_reply: String,
    pub application_id: RecordId,
    pub updated_to: u32,
}

/// Non-blocking submission of status updates.
pub trait StatusDispatcher: Send + Sync {
    fn dispatch(&self, update: StatusUpdate);
}

/// Dispatcher for offline runs; updates are logged and discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDispatcher;

impl StatusDispatcher for DisabledDispatcher {
    fn dispatch(&self, update: StatusUpdate) {
        info!(
            application_id = %update.application_id,
            status_id = update.status_id,
            "status propagation disabled, update skipped"
        );
    }
}

/// Transport that performs one status update against the ATS.
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusReceipt, PropagationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PropagationError {
    #[error("missing ATS setting {0}")]
    MissingSetting(&'static str),
    #[error("ATS base url {0} cannot carry a status path")]
    InvalidBaseUrl(String),
    #[error("application id {0:?} is not a routable path segment")]
    UnroutableApplicationId(String),
    #[error("status update request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status relay answered {http_status} with an unreadable receipt: {body}")]
    UnreadableReceipt { http_status: u16, body: String },
}
