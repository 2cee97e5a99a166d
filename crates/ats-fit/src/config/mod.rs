use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
///
/// Loaded once at startup; components receive the section they need at construction time.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ats: AtsConfig,
    pub propagation: PropagationConfig,
    pub gateway: GatewayConfig,
    pub connectors: ConnectorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (environment, map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment =
            AppEnvironment::from_str(&var("APP_ENV").unwrap_or_else(|| "development".to_string()));

        let host = var("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_number(var("APP_PORT"), "APP_PORT", 3002u16)?;

        let log_level = var("APP_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let company_domain = var("BAMBOOHR_COMPANY_DOMAIN");
        let api_base_url = var("BAMBOOHR_API_BASE_URL").or_else(|| {
            company_domain
                .as_ref()
                .map(|domain| format!("https://{domain}.bamboohr.com"))
        });

        let propagation = PropagationConfig {
            queue_capacity: parse_number(var("STATUS_QUEUE_CAPACITY"), "STATUS_QUEUE_CAPACITY", 256)?,
            workers: parse_number(var("STATUS_WORKERS"), "STATUS_WORKERS", 4)?,
            max_attempts: parse_number(var("STATUS_MAX_ATTEMPTS"), "STATUS_MAX_ATTEMPTS", 1)?,
            retry_backoff: Duration::from_millis(parse_number(
                var("STATUS_RETRY_BACKOFF_MS"),
                "STATUS_RETRY_BACKOFF_MS",
                500u64,
            )?),
            relay_url: var("STATUS_RELAY_URL"),
        };

        let gateway = GatewayConfig {
            base_url: var("NANGO_BASE_URL").unwrap_or_else(|| "https://api.nango.dev".to_string()),
            secret_key: var("NANGO_SECRET_KEY"),
            provider_config_key: var("PROVIDER_CONFIG_KEY")
                .unwrap_or_else(|| "recruitee".to_string()),
            connection_id: var("CONNECTION_ID"),
        };

        let connectors = ConnectorConfig {
            interpreter: var("CONNECTOR_INTERPRETER").unwrap_or_else(|| "python3".to_string()),
            bamboohr: var("BAMBOOHR_CONNECTOR_PATH").map(PathBuf::from),
            workable: var("WORKABLE_CONNECTOR_PATH").map(PathBuf::from),
            ceipal: var("CEIPAL_CONNECTOR_PATH").map(PathBuf::from),
            hrflow: var("HRFLOW_CONNECTOR_PATH").map(PathBuf::from),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            ats: AtsConfig {
                company_domain,
                access_token: var("ACCESS_TOKEN"),
                api_base_url,
            },
            propagation: propagation.validated()?,
            gateway,
            connectors,
        })
    }
}

fn parse_number<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Origin ATS credentials used for status updates.
#[derive(Debug, Clone, Default)]
pub struct AtsConfig {
    pub company_domain: Option<String>,
    pub access_token: Option<String>,
    pub api_base_url: Option<String>,
}

/// Status propagation queue and retry policy.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    /// When set, updates are posted to this relay endpoint instead of the ATS directly.
    pub relay_url: Option<String>,
}

impl PropagationConfig {
    fn validated(self) -> Result<Self, ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::MustBePositive("STATUS_QUEUE_CAPACITY"));
        }
        if self.workers == 0 {
            return Err(ConfigError::MustBePositive("STATUS_WORKERS"));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::MustBePositive("STATUS_MAX_ATTEMPTS"));
        }
        Ok(self)
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            workers: 4,
            max_attempts: 1,
            retry_backoff: Duration::from_millis(500),
            relay_url: None,
        }
    }
}

/// Connector gateway proxy credentials.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret_key: Option<String>,
    pub provider_config_key: String,
    pub connection_id: Option<String>,
}

/// Per-provider connector scripts.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub interpreter: String,
    pub bamboohr: Option<PathBuf>,
    pub workable: Option<PathBuf>,
    pub ceipal: Option<PathBuf>,
    pub hrflow: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    MustBePositive(&'static str),
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a valid number (got '{value}')")
            }
            ConfigError::MustBePositive(key) => write!(f, "{key} must be greater than zero"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidNumber { .. } | ConfigError::MustBePositive(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let config = load_with(&[]).expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3002);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.propagation.max_attempts, 1);
        assert_eq!(config.gateway.provider_config_key, "recruitee");
        assert_eq!(config.connectors.interpreter, "python3");
        assert!(config.ats.api_base_url.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let config = load_with(&[("APP_HOST", "localhost")]).expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3002));
    }

    #[test]
    fn derives_ats_base_url_from_company_domain() {
        let config = load_with(&[
            ("BAMBOOHR_COMPANY_DOMAIN", "acme"),
            ("ACCESS_TOKEN", "token-1"),
        ])
        .expect("config loads");
        assert_eq!(
            config.ats.api_base_url.as_deref(),
            Some("https://acme.bamboohr.com")
        );
        assert_eq!(config.ats.access_token.as_deref(), Some("token-1"));
    }

    #[test]
    fn rejects_invalid_numbers_and_zero_workers() {
        let err = load_with(&[("APP_PORT", "not-a-port")]).unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));

        let err = load_with(&[("STATUS_WORKERS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::MustBePositive("STATUS_WORKERS")));
    }
}
