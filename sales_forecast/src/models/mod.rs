//! Forecasting models for daily sales

use crate::data::HistoricalRecord;
use crate::error::Result;
use crate::features::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Hold-out evaluation of a freshly trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Mean Absolute Error on the held-out records
    pub mae: f64,
    /// Root Mean Squared Error on the held-out records
    pub rmse: f64,
    /// Records used for fitting
    pub train_size: usize,
    /// Records held out for evaluation
    pub test_size: usize,
    /// When training finished
    pub trained_at: DateTime<Utc>,
}

/// Where the in-memory model came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSource {
    /// Restored from the artifact file
    Loaded,
    /// Fitted in this process
    Trained,
}

/// Outcome of a train-or-load transition
#[derive(Debug, Clone, PartialEq)]
pub enum ReadyState {
    /// A model was already in memory; nothing happened
    AlreadyReady,
    /// The model was restored from the artifact
    Loaded,
    /// The model was fitted and written to the artifact
    Trained(TrainingReport),
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict sales for each encoded day
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Evaluation recorded when the model was trained
    fn report(&self) -> &TrainingReport;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on sales history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on historical records
    fn train(&self, records: &[HistoricalRecord]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod artifact;
pub mod random_forest;
pub mod sales_model;

pub use random_forest::{RandomForestModel, TrainedRandomForest};
pub use sales_model::SalesModel;
