//! HTTP route handlers

use crate::commands::process_update;
use crate::error::{BotError, Result};
use crate::render;
use crate::state::AppState;
use crate::telegram::Update;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use sales_forecast::forecast::to_csv;
use sales_forecast::{ForecastRecord, ForecastSummary, ModelSource};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    /// Requested horizon; parsed by hand so bad values get a JSON error
    pub days: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub days: usize,
    pub forecast: Vec<ForecastRecord>,
    pub summary: ForecastSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_ready: bool,
    pub model_source: Option<ModelSource>,
    pub bot_enabled: bool,
    pub version: String,
}

/// Status page
pub async fn home(State(state): State<AppState>) -> Result<Html<String>> {
    let status = state.status().await?;
    Ok(Html(render::status_page(&status, state.config.bot_enabled())))
}

/// Readiness probe
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let status = state.status().await?;
    Ok(Json(HealthResponse {
        status: if status.ready { "ok" } else { "starting" }.to_string(),
        model_ready: status.ready,
        model_source: status.source,
        bot_enabled: state.config.bot_enabled(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// `GET /forecast?days=N`
pub async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>> {
    let days = state.resolve_days(query.days.as_deref())?;
    let forecast = state.forecast(days).await?;
    let summary = ForecastSummary::from_records(&forecast)?;

    info!(days, "forecast served");
    Ok(Json(ForecastResponse {
        success: true,
        days,
        forecast,
        summary,
    }))
}

/// `GET /forecast.csv?days=N`
pub async fn forecast_csv(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Response> {
    let days = state.resolve_days(query.days.as_deref())?;
    let forecast = state.forecast(days).await?;
    let body = to_csv(&forecast)?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

/// Register `{WEBHOOK_URL}/webhook` with the bot API
pub async fn set_webhook(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let client = state
        .telegram
        .as_ref()
        .ok_or_else(|| BotError::BotDisabled("TELEGRAM_TOKEN is not set".to_string()))?;
    let url = state
        .config
        .webhook_endpoint()
        .ok_or_else(|| BotError::Config("WEBHOOK_URL is not set".to_string()))?;

    client.set_webhook(&url).await?;
    info!(%url, "webhook registered");

    Ok(Json(serde_json::json!({
        "success": true,
        "webhook_url": url,
    })))
}

/// Receive a bot update. The reply is produced in the background so the
/// bot API gets its acknowledgement immediately.
pub async fn webhook(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Update>, JsonRejection>,
) -> Result<StatusCode> {
    if state.telegram.is_none() {
        return Err(BotError::BotDisabled("TELEGRAM_TOKEN is not set".to_string()));
    }
    let Json(update) = payload.map_err(|e| BotError::BadRequest(e.body_text()))?;

    tokio::spawn(process_update(state, update));
    Ok(StatusCode::OK)
}
