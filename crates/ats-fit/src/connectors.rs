//! Per-provider connector scripts that export raw jobs, profiles and applications.

use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::ConnectorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    BambooHr,
    Workable,
    Ceipal,
    HrFlow,
}

impl ConnectorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::BambooHr => "BambooHR",
            Self::Workable => "Workable",
            Self::Ceipal => "Ceipal",
            Self::HrFlow => "HRFlow",
        }
    }

    /// Candidate feeds are wrapped as `{total, results}`; data feeds pass through.
    fn wraps_results(self) -> bool {
        matches!(self, Self::Ceipal | Self::HrFlow)
    }
}

/// Interpret connector stdout. Output that is not JSON is returned as `{"raw_output": ...}`.
pub fn payload_from_output(kind: ConnectorKind, stdout: &str) -> Value {
    match serde_json::from_str::<Value>(stdout) {
        Ok(parsed) if kind.wraps_results() => {
            let total = parsed.as_array().map_or(0, Vec::len);
            json!({ "total": total, "results": parsed })
        }
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(connector = kind.label(), "non-JSON connector output, returning raw text");
            json!({ "raw_output": stdout })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("{} connector is not configured", .0.label())]
    NotConfigured(ConnectorKind),
    #[error("{} connector failed: {details}", .kind.label())]
    Failed { kind: ConnectorKind, details: String },
}

impl ConnectorError {
    pub fn kind(&self) -> ConnectorKind {
        match self {
            Self::NotConfigured(kind) | Self::Failed { kind, .. } => *kind,
        }
    }

    pub fn details(&self) -> String {
        match self {
            Self::NotConfigured(kind) => format!("no script path configured for {}", kind.label()),
            Self::Failed { details, .. } => details.clone(),
        }
    }
}

/// Runs connector scripts through the configured interpreter.
#[derive(Debug, Clone)]
pub struct ConnectorRunner {
    config: ConnectorConfig,
}

impl ConnectorRunner {
    pub fn new(config: ConnectorConfig) -> Self {
        Self { config }
    }

    fn script(&self, kind: ConnectorKind) -> Option<&PathBuf> {
        match kind {
            ConnectorKind::BambooHr => self.config.bamboohr.as_ref(),
            ConnectorKind::Workable => self.config.workable.as_ref(),
            ConnectorKind::Ceipal => self.config.ceipal.as_ref(),
            ConnectorKind::HrFlow => self.config.hrflow.as_ref(),
        }
    }

    pub async fn run(&self, kind: ConnectorKind) -> Result<Value, ConnectorError> {
        let script = self
            .script(kind)
            .ok_or(ConnectorError::NotConfigured(kind))?;

        info!(connector = kind.label(), script = %script.display(), "running connector");

        let output = Command::new(&self.config.interpreter)
            .arg(script)
            .output()
            .await
            .map_err(|err| ConnectorError::Failed {
                kind,
                details: err.to_string(),
            })?;

        if !output.status.success() {
            let details = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(connector = kind.label(), status = %output.status, %details, "connector exited with failure");
            return Err(ConnectorError::Failed { kind, details });
        }

        Ok(payload_from_output(
            kind,
            &String::from_utf8_lossy(&output.stdout),
        ))
    }
}
