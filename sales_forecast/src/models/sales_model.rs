//! The sales model: one estimator mirrored to one artifact file

use crate::config::{GeneratorConfig, ModelConfig};
use crate::data::{HistoricalRecord, SalesDataGenerator};
use crate::error::{ForecastError, Result};
use crate::features::FeatureVector;
use crate::models::artifact::{artifact_exists, load_model, save_model};
use crate::models::{
    ForecastModel, ModelSource, RandomForestModel, ReadyState, TrainedForecastModel,
    TrainedRandomForest, TrainingReport,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Trains, persists and restores the forecasting estimator.
///
/// Loading and training are alternative ways to initialise the model; a
/// model held in memory is always the one last written to or read from the
/// artifact path.
#[derive(Debug)]
pub struct SalesModel {
    estimator: RandomForestModel,
    generator: GeneratorConfig,
    artifact_path: PathBuf,
    trained: Option<(TrainedRandomForest, ModelSource)>,
}

impl SalesModel {
    /// Create an untrained model bound to `artifact_path`
    pub fn new(
        artifact_path: impl Into<PathBuf>,
        config: ModelConfig,
        generator: GeneratorConfig,
    ) -> Result<Self> {
        generator.validate()?;

        Ok(Self {
            estimator: RandomForestModel::new(config)?,
            generator,
            artifact_path: artifact_path.into(),
            trained: None,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// How the current model was obtained, if there is one
    pub fn source(&self) -> Option<ModelSource> {
        self.trained.as_ref().map(|(_, source)| *source)
    }

    /// Evaluation of the current model, if there is one
    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.trained.as_ref().map(|(model, _)| model.report())
    }

    /// Fit on `records`, or on freshly generated history when `None`,
    /// and overwrite the artifact.
    ///
    /// On failure the previous in-memory state is left untouched.
    pub fn train(&mut self, records: Option<&[HistoricalRecord]>) -> Result<TrainingReport> {
        let generated;
        let records: &[HistoricalRecord] = match records {
            Some(records) => records,
            None => {
                generated = SalesDataGenerator::new(self.generator.clone())?.generate()?;
                &generated
            }
        };

        info!(records = records.len(), model = self.estimator.name(), "training sales model");
        let trained = self.estimator.train(records)?;
        save_model(&trained, &self.artifact_path)?;

        let report = trained.report().clone();
        info!(
            mae = report.mae,
            rmse = report.rmse,
            artifact = %self.artifact_path.display(),
            "sales model trained"
        );

        self.trained = Some((trained, ModelSource::Trained));
        Ok(report)
    }

    /// Restore the artifact if one exists, otherwise train from scratch
    pub fn load_if_available(&mut self) -> Result<ReadyState> {
        if !artifact_exists(&self.artifact_path)? {
            info!(
                artifact = %self.artifact_path.display(),
                "no model artifact found, training a new model"
            );
            return self.train(None).map(ReadyState::Trained);
        }

        let artifact = load_model(&self.artifact_path)?;
        info!(
            artifact = %self.artifact_path.display(),
            saved_at = %artifact.saved_at,
            model = artifact.model.name(),
            "sales model loaded"
        );

        self.trained = Some((artifact.model, ModelSource::Loaded));
        Ok(ReadyState::Loaded)
    }

    /// Predict sales for each encoded day
    pub fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
        match &self.trained {
            Some((model, _)) => model.predict(features),
            None => Err(ForecastError::NotReady(
                "the sales model has not been trained or loaded".to_string(),
            )),
        }
    }
}
