//! Shared application state

use crate::config::{BotConfig, DEFAULT_FORECAST_DAYS};
use crate::error::{BotError, Result};
use crate::telegram::TelegramClient;
use sales_forecast::{ForecastRecord, ForecasterService, ReadyState, ServiceStatus};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub forecaster: Arc<ForecasterService>,
    pub telegram: Option<Arc<TelegramClient>>,
    pub config: Arc<BotConfig>,
}

impl AppState {
    /// Build the forecaster and, when a token is configured, the bot client
    pub fn new(config: BotConfig) -> Result<Self> {
        let forecaster = ForecasterService::new(config.model_path.clone())?;
        let telegram = match &config.telegram_token {
            Some(token) => Some(Arc::new(TelegramClient::new(token)?)),
            None => None,
        };
        Ok(Self::from_parts(config, forecaster, telegram))
    }

    pub fn from_parts(
        config: BotConfig,
        forecaster: ForecasterService,
        telegram: Option<Arc<TelegramClient>>,
    ) -> Self {
        Self {
            forecaster: Arc::new(forecaster),
            telegram,
            config: Arc::new(config),
        }
    }

    /// Turn a raw `days` parameter into a horizon, clamped to the configured
    /// maximum. Missing means the default horizon.
    pub fn resolve_days(&self, raw: Option<&str>) -> Result<usize> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(DEFAULT_FORECAST_DAYS.min(self.config.max_forecast_days));
        };

        let days: i64 = raw
            .parse()
            .map_err(|_| BotError::BadRequest(format!("days must be an integer, got {}", raw)))?;
        if days < 1 {
            return Err(BotError::BadRequest(format!(
                "days must be positive, got {}",
                days
            )));
        }

        Ok((days as u64).min(self.config.max_forecast_days as u64) as usize)
    }

    /// Train or load the model off the async runtime
    pub async fn ensure_ready(&self) -> Result<ReadyState> {
        let forecaster = Arc::clone(&self.forecaster);
        Ok(tokio::task::spawn_blocking(move || forecaster.ensure_ready()).await??)
    }

    /// Forecast `days` days off the async runtime
    pub async fn forecast(&self, days: usize) -> Result<Vec<ForecastRecord>> {
        let forecaster = Arc::clone(&self.forecaster);
        Ok(tokio::task::spawn_blocking(move || forecaster.forecast(days)).await??)
    }

    pub async fn status(&self) -> Result<ServiceStatus> {
        let forecaster = Arc::clone(&self.forecaster);
        Ok(tokio::task::spawn_blocking(move || forecaster.status()).await?)
    }
}
