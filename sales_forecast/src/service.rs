//! Forecaster service: the single entry point used by delivery code
//!
//! The service owns one [`SalesModel`] behind a read/write lock. Predictions
//! share the read side; the train-or-load transition takes the write side
//! and re-checks readiness, so concurrent callers initialise the model at
//! most once.

use crate::config::{GeneratorConfig, ModelConfig};
use crate::data::HistoricalRecord;
use crate::error::{ForecastError, Result};
use crate::features::FeatureVector;
use crate::forecast::ForecastRecord;
use crate::models::{ModelSource, ReadyState, SalesModel, TrainingReport};
use crate::utils::{future_dates, today};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Longest horizon a single forecast may request
pub const MAX_FORECAST_DAYS: usize = 100_000;

/// Snapshot of the service for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub ready: bool,
    pub source: Option<ModelSource>,
    pub artifact_path: PathBuf,
    pub last_report: Option<TrainingReport>,
}

/// Owns the forecasting model and produces day-by-day forecasts
#[derive(Debug)]
pub struct ForecasterService {
    model: RwLock<SalesModel>,
}

impl ForecasterService {
    /// Service with default hyperparameters and unseeded synthetic history
    pub fn new(artifact_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(artifact_path, ModelConfig::default(), GeneratorConfig::default())
    }

    pub fn with_config(
        artifact_path: impl Into<PathBuf>,
        config: ModelConfig,
        generator: GeneratorConfig,
    ) -> Result<Self> {
        Ok(Self {
            model: RwLock::new(SalesModel::new(artifact_path, config, generator)?),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, SalesModel> {
        self.model.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SalesModel> {
        self.model.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ready(&self) -> bool {
        self.read().is_trained()
    }

    /// Make sure a model is in memory, loading the artifact or training one.
    ///
    /// Calling this on a ready service does nothing.
    pub fn ensure_ready(&self) -> Result<ReadyState> {
        if self.is_ready() {
            return Ok(ReadyState::AlreadyReady);
        }

        let mut model = self.write();
        if model.is_trained() {
            return Ok(ReadyState::AlreadyReady);
        }
        model.load_if_available()
    }

    /// Train a new model, replacing the one in memory and on disk
    pub fn retrain(&self, records: Option<&[HistoricalRecord]>) -> Result<TrainingReport> {
        self.write().train(records)
    }

    /// Forecast `days` days starting tomorrow
    pub fn forecast(&self, days: usize) -> Result<Vec<ForecastRecord>> {
        self.forecast_from(today(), days)
    }

    /// Forecast `days` days starting the day after `start`
    pub fn forecast_from(&self, start: NaiveDate, days: usize) -> Result<Vec<ForecastRecord>> {
        if days == 0 || days > MAX_FORECAST_DAYS {
            return Err(ForecastError::InvalidRange(format!(
                "days must be between 1 and {}, got {}",
                MAX_FORECAST_DAYS, days
            )));
        }

        self.ensure_ready()?;

        let dates = future_dates(start, days)?;
        let features: Vec<FeatureVector> = dates.iter().map(|&d| FeatureVector::from_date(d)).collect();
        let predictions = self.read().predict(&features)?;

        debug!(days, first = %dates[0], "forecast generated");

        Ok(dates
            .into_iter()
            .zip(predictions)
            .map(|(date, predicted_sales)| ForecastRecord {
                date,
                predicted_sales,
            })
            .collect())
    }

    pub fn status(&self) -> ServiceStatus {
        let model = self.read();
        ServiceStatus {
            ready: model.is_trained(),
            source: model.source(),
            artifact_path: model.artifact_path().to_path_buf(),
            last_report: model.training_report().cloned(),
        }
    }
}
