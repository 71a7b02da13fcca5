//! Environment configuration
//!
//! Bot credentials are optional: without them the HTTP API still serves
//! forecasts and the bot endpoints answer 503.

use crate::error::{BotError, Result};
use sales_forecast::config::DEFAULT_ARTIFACT_PATH;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Upper bound applied to requested horizons unless overridden
pub const DEFAULT_MAX_FORECAST_DAYS: usize = 90;

/// Horizon used when a request names none
pub const DEFAULT_FORECAST_DAYS: usize = 7;

/// Runtime configuration for the server and bot
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Bot API token (`TELEGRAM_TOKEN`)
    pub telegram_token: Option<String>,
    /// Public base URL the bot API should call back (`WEBHOOK_URL`)
    pub webhook_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Model artifact location (`MODEL_PATH`)
    pub model_path: PathBuf,
    /// Requests above this horizon are clamped to it (`FORECAST_MAX_DAYS`)
    pub max_forecast_days: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            webhook_url: None,
            host: "0.0.0.0".to_string(),
            port: 8080,
            model_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            max_forecast_days: DEFAULT_MAX_FORECAST_DAYS,
        }
    }
}

impl BotConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port: u16 = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| BotError::Config(format!("PORT must be a valid number, got {}", raw)))?,
            None => defaults.port,
        };

        let max_forecast_days = match get("FORECAST_MAX_DAYS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(BotError::Config(format!(
                        "FORECAST_MAX_DAYS must be a positive number, got {}",
                        raw
                    )))
                }
            },
            None => defaults.max_forecast_days,
        };

        Ok(Self {
            telegram_token: get("TELEGRAM_TOKEN"),
            webhook_url: get("WEBHOOK_URL").map(|url| url.trim_end_matches('/').to_string()),
            host: get("HOST").unwrap_or(defaults.host),
            port,
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            max_forecast_days,
        })
    }

    pub fn bot_enabled(&self) -> bool {
        self.telegram_token.is_some()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| BotError::Config(format!("Invalid HOST:PORT {}:{}", self.host, self.port)))
    }

    /// Full callback URL registered with the bot API
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.webhook_url.as_ref().map(|base| format!("{}/webhook", base))
    }
}
