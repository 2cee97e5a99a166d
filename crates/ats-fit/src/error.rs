use crate::config::ConfigError;
use crate::connectors::ConnectorError;
use crate::gateway::GatewayError;
use crate::propagation::PropagationError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    InvalidPayload { status: StatusCode, message: String },
    Gateway(GatewayError),
    Connector(ConnectorError),
    Propagation(PropagationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::InvalidPayload { message, .. } => write!(f, "invalid payload: {}", message),
            AppError::Gateway(err) => write!(f, "{}", err),
            AppError::Connector(err) => write!(f, "{}", err),
            AppError::Propagation(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::InvalidPayload { .. } => None,
            AppError::Gateway(err) => Some(err),
            AppError::Connector(err) => Some(err),
            AppError::Propagation(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidPayload { status, message } => (*status, json!({ "error": message })),
            AppError::Gateway(GatewayError::Upstream { status, body, .. }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                json!({ "error": body }),
            ),
            AppError::Connector(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": format!("{} connector failed", err.kind().label()),
                    "details": err.details(),
                }),
            ),
            AppError::Propagation(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to update status", "details": err.to_string() }),
            ),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Gateway(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidPayload {
            status: value.status(),
            message: value.body_text(),
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

impl From<ConnectorError> for AppError {
    fn from(value: ConnectorError) -> Self {
        Self::Connector(value)
    }
}

impl From<PropagationError> for AppError {
    fn from(value: PropagationError) -> Self {
        Self::Propagation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::ConnectorKind;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn connector_failures_carry_details() {
        let response = AppError::from(ConnectorError::Failed {
            kind: ConnectorKind::Workable,
            details: "boom".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = body(response).await;
        assert_eq!(payload["error"], "Workable connector failed");
        assert_eq!(payload["details"], "boom");
    }

    #[tokio::test]
    async fn upstream_gateway_status_is_preserved() {
        let response = AppError::from(GatewayError::Upstream {
            endpoint: "candidates".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body(response).await["error"], "unauthorized");
    }

    #[tokio::test]
    async fn bad_requests_are_client_errors() {
        let response = AppError::bad_request("Missing candidate data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(response).await["error"], "Missing candidate data");
    }
}
