//! Bagged regression-tree model over calendar features

use crate::config::ModelConfig;
use crate::data::{sales_values, HistoricalRecord};
use crate::error::{ForecastError, Result};
use crate::features::{encode_records, FeatureVector, FEATURE_NAMES};
use crate::models::{ForecastModel, TrainedForecastModel, TrainingReport};
use chrono::Utc;
use forecast_math::metrics::{mean_absolute_error, root_mean_squared_error};
use forecast_math::split::train_test_split;
use forecast_math::{MathError, RandomForestRegressor};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random forest regressor
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    /// Name of the model
    name: String,
    /// Hyperparameters
    config: ModelConfig,
}

/// Trained random forest regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedRandomForest {
    /// Name of the model
    name: String,
    /// Hyperparameters it was trained with
    config: ModelConfig,
    /// Fitted ensemble
    forest: RandomForestRegressor,
    /// Hold-out evaluation
    report: TrainingReport,
}

impl RandomForestModel {
    /// Create a new random forest model
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: model_name(&config),
            config,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

impl Default for RandomForestModel {
    fn default() -> Self {
        let config = ModelConfig::default();
        Self {
            name: model_name(&config),
            config,
        }
    }
}

fn model_name(config: &ModelConfig) -> String {
    format!(
        "Random Forest (trees={}, max_depth={})",
        config.n_estimators, config.max_depth
    )
}

fn select<T: Clone>(items: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| items[i].clone()).collect()
}

impl ForecastModel for RandomForestModel {
    type Trained = TrainedRandomForest;

    fn train(&self, records: &[HistoricalRecord]) -> Result<Self::Trained> {
        if records.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot train on an empty history".to_string(),
            ));
        }

        let features = encode_records(records);
        let targets = sales_values(records);

        let split = train_test_split(records.len(), self.config.test_ratio, self.config.split_seed)?;
        let train_x = select(&features, &split.train);
        let train_y = select(&targets, &split.train);
        let test_x = select(&features, &split.test);
        let test_y = select(&targets, &split.test);

        debug!(
            train = train_x.len(),
            test = test_x.len(),
            "fitting random forest"
        );

        let forest = RandomForestRegressor::fit(&train_x, &train_y, self.config.forest_params())?;

        let predicted = forest.predict(&test_x)?;
        let mae = mean_absolute_error(&test_y, &predicted)?;
        let rmse = root_mean_squared_error(&test_y, &predicted)?;

        Ok(TrainedRandomForest {
            name: self.name.clone(),
            config: self.config.clone(),
            forest,
            report: TrainingReport {
                mae,
                rmse,
                train_size: train_x.len(),
                test_size: test_x.len(),
                trained_at: Utc::now(),
            },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedRandomForest {
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn forest(&self) -> &RandomForestRegressor {
        &self.forest
    }

    /// Check that a model read from disk can serve predictions for the
    /// current feature layout
    pub fn validate(&self) -> Result<()> {
        if self.forest.n_features() != FEATURE_NAMES.len() {
            return Err(ForecastError::Deserialization(format!(
                "model expects {} features, the encoder produces {}",
                self.forest.n_features(),
                FEATURE_NAMES.len()
            )));
        }
        self.forest
            .validate()
            .map_err(|e| match e {
                MathError::InvalidInput(msg)
                | MathError::InsufficientData(msg)
                | MathError::CalculationError(msg) => ForecastError::Deserialization(msg),
            })
    }
}

impl TrainedForecastModel for TrainedRandomForest {
    fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
        let rows: Vec<Vec<f64>> = features.iter().map(FeatureVector::to_row).collect();
        Ok(self.forest.predict(&rows)?)
    }

    fn report(&self) -> &TrainingReport {
        &self.report
    }

    fn name(&self) -> &str {
        &self.name
    }
}
