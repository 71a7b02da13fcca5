//! # Sales Forecast Workspace
//!
//! Facade over the workspace crates: the forecasting core in
//! [`sales_forecast`] and its numeric layer in [`forecast_math`].
//!
//! ## Example
//!
//! ```no_run
//! use sales_forecast_workspace::ForecasterService;
//!
//! let service = ForecasterService::new("sales_model.json")?;
//! let week = service.forecast(7)?;
//! assert_eq!(week.len(), 7);
//! # Ok::<(), sales_forecast_workspace::ForecastError>(())
//! ```

pub use forecast_math;
pub use sales_forecast;

pub use sales_forecast::{
    ForecastError, ForecastRecord, ForecastSummary, ForecasterService, GeneratorConfig,
    ModelConfig, ReadyState,
};
