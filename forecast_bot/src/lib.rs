//! # forecast_bot
//!
//! HTTP API and Telegram bot in front of the sales forecasting core.
//!
//! - `GET /` status page
//! - `GET /health` readiness
//! - `GET /forecast?days=N` JSON forecast, `GET /forecast.csv?days=N` CSV
//! - `GET /set_webhook`, `POST /webhook` bot transport

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;
pub mod telegram;

pub use crate::config::BotConfig;
pub use crate::error::{BotError, Result};
pub use crate::state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the router with middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .route("/forecast", get(routes::forecast))
        .route("/forecast.csv", get(routes::forecast_csv))
        .route("/set_webhook", get(routes::set_webhook))
        .route("/webhook", post(routes::webhook))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
