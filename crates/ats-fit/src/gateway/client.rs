use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::resolver::RawRecord;
use crate::config::GatewayConfig;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("missing gateway setting {0}")]
    MissingSetting(&'static str),
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Error fetching {endpoint}: {body}")]
    Upstream {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("unexpected gateway payload for {endpoint}: missing `{field}`")]
    Shape {
        endpoint: String,
        field: &'static str,
    },
}

/// One page of offers as reported by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferPage {
    pub total: Value,
    pub offers: Vec<RawRecord>,
}

#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }

    /// GET `{base_url}/proxy/{endpoint}` with the gateway credentials.
    pub async fn fetch(&self, endpoint: &str) -> Result<Value, GatewayError> {
        let secret = self
            .config
            .secret_key
            .as_deref()
            .ok_or(GatewayError::MissingSetting("NANGO_SECRET_KEY"))?;
        let connection_id = self
            .config
            .connection_id
            .as_deref()
            .ok_or(GatewayError::MissingSetting("CONNECTION_ID"))?;

        let url = format!(
            "{}/proxy/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        );
        debug!(%url, "fetching from gateway");

        let response = self
            .client
            .get(url)
            .bearer_auth(secret)
            .header("Provider-Config-Key", &self.config.provider_config_key)
            .header("Connection-Id", connection_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!(endpoint, status = status.as_u16(), %body, "gateway request rejected");
            return Err(GatewayError::Upstream {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    pub async fn candidates(&self) -> Result<Vec<RawRecord>, GatewayError> {
        let payload = self.fetch("candidates").await?;
        records(&payload, "candidates", "candidates")
    }

    pub async fn offers(&self) -> Result<OfferPage, GatewayError> {
        let payload = self.fetch("offers").await?;
        let total = payload
            .pointer("/meta/total_count")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(OfferPage {
            total,
            offers: records(&payload, "offers", "offers")?,
        })
    }
}

fn records(
    payload: &Value,
    endpoint: &str,
    field: &'static str,
) -> Result<Vec<RawRecord>, GatewayError> {
    let items = payload
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::Shape {
            endpoint: endpoint.to_string(),
            field,
        })?;
    Ok(items.iter().filter_map(Value::as_object).cloned().collect())
}
