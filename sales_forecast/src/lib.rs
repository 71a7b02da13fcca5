//! # Sales Forecast
//!
//! A Rust library for daily sales forecasting with a bagged regression-tree
//! model over calendar features.
//!
//! ## Features
//!
//! - Synthetic sales history (linear trend, weekly and monthly seasonality, noise)
//! - Cyclical calendar feature encoding shared by training and prediction
//! - Random forest regressor with hold-out MAE/RMSE evaluation
//! - A single JSON model artifact, written atomically and restored on start-up
//! - A thread-safe forecaster service that trains or loads on first use
//!
//! ## Quick Start
//!
//! ```no_run
//! use sales_forecast::ForecasterService;
//!
//! let service = ForecasterService::new("sales_model.json")?;
//!
//! // Loads the artifact if present, otherwise trains and writes it
//! service.ensure_ready()?;
//!
//! for day in service.forecast(7)? {
//!     println!("{} {:.2}", day.date, day.predicted_sales);
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod forecast;
pub mod models;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{GeneratorConfig, ModelConfig};
pub use crate::data::{HistoricalRecord, SalesDataGenerator};
pub use crate::error::{ForecastError, Result};
pub use crate::features::FeatureVector;
pub use crate::forecast::{ForecastRecord, ForecastSummary};
pub use crate::models::{ModelSource, ReadyState, SalesModel, TrainingReport};
pub use crate::service::{ForecasterService, ServiceStatus, MAX_FORECAST_DAYS};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
