//! Configuration for synthetic history and model fitting

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use forecast_math::{ForestParams, TreeParams};
use serde::{Deserialize, Serialize};

/// Default number of synthetic days used for training
pub const DEFAULT_PERIODS: usize = 365;

/// Default fraction of records held out for evaluation
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Default seed for the evaluation split
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Default artifact location, relative to the working directory
pub const DEFAULT_ARTIFACT_PATH: &str = "sales_model.json";

/// First day of every synthetic history
pub fn default_anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parameters for the synthetic history generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of consecutive days to generate
    pub periods: usize,
    /// Date of the first record
    pub start: NaiveDate,
    /// Seed for the noise term. `None` draws from OS entropy, which makes
    /// every freshly trained model different.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
            start: default_anchor_date(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Generator with a fixed noise seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_periods(mut self, periods: usize) -> Self {
        self.periods = periods;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            return Err(ForecastError::DataGeneration(
                "Period count must be positive".to_string(),
            ));
        }

        let last_offset = (self.periods - 1) as u64;
        if self
            .start
            .checked_add_days(chrono::Days::new(last_offset))
            .is_none()
        {
            return Err(ForecastError::DataGeneration(format!(
                "{} periods starting {} overflow the calendar",
                self.periods, self.start
            )));
        }

        Ok(())
    }
}

/// Hyperparameters for the bagged tree regressor and its evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth of every tree
    pub max_depth: usize,
    /// Minimum samples a node needs before it may be split
    pub min_samples_split: usize,
    /// Fraction of records held out for evaluation
    pub test_ratio: f64,
    /// Seed for the evaluation split
    pub split_seed: u64,
    /// Seed for bootstrap resampling inside the ensemble
    pub forest_seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
            test_ratio: DEFAULT_TEST_RATIO,
            split_seed: DEFAULT_SPLIT_SEED,
            forest_seed: DEFAULT_SPLIT_SEED,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Test ratio must be between 0 and 1, got {}",
                self.test_ratio
            )));
        }
        self.forest_params().validate()?;
        Ok(())
    }

    /// Translate into the ensemble parameters of the math layer
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
                min_samples_leaf: 1,
            },
            bootstrap: true,
            seed: self.forest_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = ModelConfig::default();
        assert_eq!(model.n_estimators, 100);
        assert_eq!(model.max_depth, 10);
        assert!(model.validate().is_ok());

        let generator = GeneratorConfig::default();
        assert_eq!(generator.periods, 365);
        assert_eq!(generator.start, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert!(generator.seed.is_none());
    }

    #[test]
    fn test_invalid_configs() {
        let model = ModelConfig {
            test_ratio: 1.5,
            ..ModelConfig::default()
        };
        assert!(matches!(
            model.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        let model = ModelConfig {
            n_estimators: 0,
            ..ModelConfig::default()
        };
        assert!(model.validate().is_err());

        let generator = GeneratorConfig::default().with_periods(0);
        assert!(matches!(
            generator.validate(),
            Err(ForecastError::DataGeneration(_))
        ));
    }
}
