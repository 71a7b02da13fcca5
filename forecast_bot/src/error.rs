//! Error types for the forecast_bot crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_forecast::ForecastError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the delivery layer
#[derive(Debug, Error)]
pub enum BotError {
    /// Invalid or missing environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed client request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The bot is not configured
    #[error("Bot disabled: {0}")]
    BotDisabled(String),

    /// Bot API call failed
    #[error("Telegram API error: {0}")]
    Telegram(String),

    /// Error from the forecasting core
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// A blocking forecast task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, BotError>;

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Telegram(err.to_string())
    }
}

impl From<tokio::task::JoinError> for BotError {
    fn from(err: tokio::task::JoinError) -> Self {
        BotError::Task(err.to_string())
    }
}

impl BotError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BotError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BotError::BotDisabled(_) => StatusCode::SERVICE_UNAVAILABLE,
            BotError::Telegram(_) => StatusCode::BAD_GATEWAY,
            BotError::Forecast(ForecastError::InvalidRange(_))
            | BotError::Forecast(ForecastError::InvalidParameter(_)) => StatusCode::BAD_REQUEST,
            BotError::Forecast(ForecastError::NotReady(_)) => StatusCode::SERVICE_UNAVAILABLE,
            BotError::Config(_)
            | BotError::Forecast(_)
            | BotError::Task(_)
            | BotError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
