use std::{fmt, time::Duration};
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

/// Process-wide settings, read once at startup and handed to the server
/// and the gateway. Missing Stripe keys are not an error here: the calls
/// that need them fail instead.
#[derive(Clone)]
pub struct Config {
    pub secret_key: Option<String>,
    pub publishable_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub webhook_tolerance_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let base_url = get("BASE_URL")
            .unwrap_or_else(|| format!("http://{}:{}", host, port))
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = parse_or("STRIPE_TIMEOUT_SECS", get("STRIPE_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        // A zero reqwest timeout fails every call before it is sent.
        if timeout_secs == 0 {
            return Err(ConfigError::Zero {
                key: "STRIPE_TIMEOUT_SECS",
            });
        }
        let webhook_tolerance_secs = parse_or(
            "WEBHOOK_TOLERANCE_SECS",
            get("WEBHOOK_TOLERANCE_SECS"),
            DEFAULT_WEBHOOK_TOLERANCE_SECS,
        )?;

        Ok(Self {
            secret_key: get("STRIPE_SECRET_KEY"),
            publishable_key: get("STRIPE_PUBLISHABLE_KEY"),
            webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
            host,
            port,
            base_url,
            api_base: get("STRIPE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            webhook_tolerance_secs,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn success_url(&self) -> String {
        format!("{}/success", self.base_url)
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &redact(&self.secret_key))
            .field("publishable_key", &self.publishable_key)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}
