//! HTTP transports for status updates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde_json::json;

use super::{PropagationError, StatusReceipt, StatusUpdate, StatusUpdater};
use crate::config::{AtsConfig, PropagationConfig};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const EMPTY_REPLY: &str = "No response body";

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Pick the transport configured for this deployment.
pub fn status_updater(ats: &AtsConfig, propagation: &PropagationConfig) -> Arc<dyn StatusUpdater> {
    match &propagation.relay_url {
        Some(url) => Arc::new(RelayStatusClient::new(url.clone())),
        None => Arc::new(AtsStatusClient::new(ats)),
    }
}

/// Posts status changes straight to the ATS applicant-tracking API.
#[derive(Clone)]
pub struct AtsStatusClient {
    client: reqwest::Client,
    base_url: Option<String>,
    access_token: Option<String>,
}

impl AtsStatusClient {
    pub fn new(config: &AtsConfig) -> Self {
        Self {
            client: http_client(),
            base_url: config.api_base_url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// The application id is appended as one percent-encoded path segment, so ids carrying
    /// `/`, `?` or `#` cannot leave the status path.
    fn status_url(&self, update: &StatusUpdate) -> Result<Url, PropagationError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(PropagationError::MissingSetting("BAMBOOHR_COMPANY_DOMAIN"))?;
        let application_id = update.application_id.key();
        if matches!(application_id.as_str(), "." | "..") {
            return Err(PropagationError::UnroutableApplicationId(application_id));
        }

        let invalid_base = || PropagationError::InvalidBaseUrl(base_url.to_string());
        let mut url = Url::parse(base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|()| invalid_base())?
            .pop_if_empty()
            .extend([
                "api",
                "v1",
                "applicant_tracking",
                "applications",
                application_id.as_str(),
                "status",
            ]);
        Ok(url)
    }
}

#[async_trait]
impl StatusUpdater for AtsStatusClient {
    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusReceipt, PropagationError> {
        let url = self.status_url(update)?;
        let token = self
            .access_token
            .as_deref()
            .ok_or(PropagationError::MissingSetting("ACCESS_TOKEN"))?;

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .json(&json!({ "status_id": update.status_id }))
            .send()
            .await?;

        let status = response.status();
        // The ATS often answers with an empty body or plain "OK".
        let reply = response.text().await?;

        Ok(StatusReceipt {
            ok: status.is_success(),
            http_status: status.as_u16(),
            bamboohr_reply: if reply.is_empty() {
                EMPTY_REPLY.to_string()
            } else {
                reply
            },
            application_id: update.application_id.clone(),
            updated_to: update.status_id,
        })
    }
}

/// Posts `{application_id, status_id}` to a relay endpoint that answers with a receipt.
#[derive(Clone)]
pub struct RelayStatusClient {
    client: reqwest::Client,
    url: String,
}

impl RelayStatusClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl StatusUpdater for RelayStatusClient {
    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusReceipt, PropagationError> {
        let response = self.client.post(&self.url).json(update).send().await?;
        let http_status = response.status().as_u16();
        let body = response.bytes().await?;

        serde_json::from_slice::<StatusReceipt>(&body).map_err(|_| {
            PropagationError::UnreadableReceipt {
                http_status,
                body: String::from_utf8_lossy(&body).to_string(),
            }
        })
    }
}
