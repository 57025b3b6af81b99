use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis_client::DEFAULT_ENDPOINT;

const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client configuration loaded from environment variables.
/// Every value has a default; only malformed values are an error.
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub settle_delay: Duration,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settle_ms: u64 = parse_or(&lookup, "SETTLE_DELAY_MS", DEFAULT_SETTLE_DELAY_MS)?;
        let timeout_secs: u64 =
            parse_or(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Config {
            endpoint: lookup("ATS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            settle_delay: Duration::from_millis(settle_ms),
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
