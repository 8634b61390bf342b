use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::logging::LoggingConfig;

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/v1/data/CORE/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("logging: {0}")]
    Logging(String),
}

/// Upstream access credential. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: Url,
    pub token: Option<ApiToken>,
    pub timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(base_url: &str, token: Option<ApiToken>, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            name: "IEX_BASE_URL",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                name: "IEX_BASE_URL",
                reason: "cannot be used as a base".to_string(),
            });
        }
        Ok(Self { base_url, token, timeout })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let token = std::env::var("IEX_AUTH_TOKEN").ok().and_then(ApiToken::new);
        let base_url = std::env::var("IEX_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = parse_var("UPSTREAM_TIMEOUT_SECS", "a number of seconds", DEFAULT_TIMEOUT_SECS)?;
        let port = parse_var("PORT", "a port number", DEFAULT_PORT)?;
        let bind_addr = parse_var("BIND_ADDR", "an IP address", IpAddr::from([0, 0, 0, 0]))?;

        let logging = LoggingConfig::from_env();
        logging.validate().map_err(ConfigError::Logging)?;

        Ok(Self {
            upstream: UpstreamConfig::new(&base_url, token, Duration::from_secs(timeout_secs))?,
            logging,
            bind_addr,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, expected, value }),
        _ => Ok(default),
    }
}
