//! # Forecast Math
//!
//! Numeric building blocks for the sales forecasting core.
//! This crate provides a CART regression tree, a bagged ensemble of
//! such trees, a reproducible train/test partition and the regression
//! error metrics used to evaluate a fitted model.

use thiserror::Error;

pub mod forest;
pub mod metrics;
pub mod split;
pub mod tree;

pub use forest::{ForestParams, RandomForestRegressor};
pub use tree::{RegressionTree, TreeParams};

/// Errors that can occur while fitting or evaluating a regressor
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecast math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Check that a feature matrix and target vector can be used for fitting.
///
/// Every row must have the same, non-zero width and there must be one
/// target per row.
pub(crate) fn validate_training_set(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot fit a regressor on zero samples".to_string(),
        ));
    }

    if features.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) don't match targets ({})",
            features.len(),
            targets.len()
        )));
    }

    let width = features[0].len();
    if width == 0 {
        return Err(MathError::InvalidInput(
            "Feature rows must have at least one column".to_string(),
        ));
    }

    if let Some(row) = features.iter().position(|row| row.len() != width) {
        return Err(MathError::InvalidInput(format!(
            "Row {} has {} columns, expected {}",
            row,
            features[row].len(),
            width
        )));
    }

    if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Training data contains NaN or infinite values".to_string(),
        ));
    }

    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_training_set() {
        let x = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(validate_training_set(&x, &[1.0, 2.0]).unwrap(), 2);

        assert!(matches!(
            validate_training_set(&[], &[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            validate_training_set(&x, &[1.0]),
            Err(MathError::InvalidInput(_))
        ));

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(validate_training_set(&ragged, &[1.0, 2.0]).is_err());

        let nan = vec![vec![f64::NAN], vec![1.0]];
        assert!(validate_training_set(&nan, &[1.0, 2.0]).is_err());
    }
}
