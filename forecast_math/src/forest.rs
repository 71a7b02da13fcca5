//! Bagged ensemble of regression trees
//!
//! Each tree is fitted on a bootstrap resample of the training rows and the
//! ensemble predicts the mean of its trees. Resampling is driven by a seeded
//! generator, so the same data and parameters always produce the same
//! forest.

use crate::tree::{RegressionTree, TreeParams};
use crate::{validate_training_set, MathError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Ensemble configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Growth limits applied to every tree
    pub tree: TreeParams,
    /// Fit each tree on a bootstrap resample instead of the full set
    pub bootstrap: bool,
    /// Seed for the bootstrap resampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    /// Validate the ensemble configuration
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "Number of estimators must be positive".to_string(),
            ));
        }
        self.tree.validate()
    }
}

/// A fitted random forest regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    params: ForestParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit the ensemble
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: ForestParams) -> Result<Self> {
        params.validate()?;
        let n_features = validate_training_set(features, targets)?;

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let mut sample: Vec<usize> = if params.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            trees.push(RegressionTree::fit_sample(
                features,
                targets,
                &mut sample,
                params.tree,
            ));
        }

        Ok(Self {
            params,
            n_features,
            trees,
        })
    }

    /// Check a forest that was read back from storage.
    ///
    /// Rejects an empty ensemble and any tree that disagrees with the forest
    /// on its input width or whose node links are broken.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(MathError::InvalidInput("Forest has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features {
                return Err(MathError::InvalidInput(format!(
                    "Tree {} expects {} features, forest expects {}",
                    i,
                    tree.n_features(),
                    self.n_features
                )));
            }
            tree.validate().map_err(|e| match e {
                MathError::InvalidInput(msg) => MathError::InvalidInput(format!("tree {}: {}", i, msg)),
                other => other,
            })?;
        }
        Ok(())
    }

    /// Predict a single row as the mean of all trees
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict_unchecked(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict every row
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        features.iter().map(|row| self.predict_row(row)).collect()
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
        let x = (0..n).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let y = (0..n).map(|i| 2.0 * i as f64 + 5.0).collect();
        (x, y)
    }

    #[test]
    fn test_forest_shape() {
        let (x, y) = linear_data(50);
        let params = ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, params).unwrap();

        assert_eq!(forest.trees().len(), 10);
        assert_eq!(forest.n_features(), 2);
        assert!(forest.trees().iter().all(|t| t.depth() <= 10));
    }

    #[test]
    fn test_predictions_stay_within_target_range() {
        let (x, y) = linear_data(80);
        let forest = RandomForestRegressor::fit(&x, &y, ForestParams::default()).unwrap();

        let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        for row in [vec![-10.0, 0.0], vec![40.0, 3.0], vec![1000.0, 6.0]] {
            let p = forest.predict_row(&row).unwrap();
            assert!(p >= min && p <= max, "{} outside [{}, {}]", p, min, max);
        }
    }

    #[test]
    fn test_tracks_the_signal() {
        let (x, y) = linear_data(100);
        let forest = RandomForestRegressor::fit(&x, &y, ForestParams::default()).unwrap();

        let low = forest.predict_row(&[10.0, 3.0]).unwrap();
        let high = forest.predict_row(&[90.0, 6.0]).unwrap();
        assert!(high > low);
        assert!((low - 25.0).abs() < 10.0);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = linear_data(40);
        let params = ForestParams {
            n_estimators: 5,
            ..ForestParams::default()
        };
        let a = RandomForestRegressor::fit(&x, &y, params).unwrap();
        let b = RandomForestRegressor::fit(&x, &y, params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_without_bootstrap_matches_single_tree() {
        let (x, y) = linear_data(30);
        let params = ForestParams {
            n_estimators: 3,
            bootstrap: false,
            ..ForestParams::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, params).unwrap();
        let tree = RegressionTree::fit(&x, &y, params.tree).unwrap();

        let row = [12.0, 5.0];
        approx::assert_relative_eq!(
            forest.predict_row(&row).unwrap(),
            tree.predict_row(&row).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_invalid_input() {
        let (x, y) = linear_data(10);
        let params = ForestParams {
            n_estimators: 0,
            ..ForestParams::default()
        };
        assert!(RandomForestRegressor::fit(&x, &y, params).is_err());
        assert!(matches!(
            RandomForestRegressor::fit(&[], &[], ForestParams::default()),
            Err(MathError::InsufficientData(_))
        ));

        let forest = RandomForestRegressor::fit(&x, &y, ForestParams::default()).unwrap();
        assert!(forest.predict_row(&[1.0]).is_err());
    }

    #[test]
    fn test_validate_fitted_forest() {
        let (x, y) = linear_data(20);
        let forest = RandomForestRegressor::fit(&x, &y, ForestParams::default()).unwrap();
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_broken_forest() {
        let (x, y) = linear_data(20);
        let params = ForestParams {
            n_estimators: 3,
            ..ForestParams::default()
        };
        let forest = RandomForestRegressor::fit(&x, &y, params).unwrap();

        let mut empty = forest.clone();
        empty.trees.clear();
        assert!(matches!(empty.validate(), Err(MathError::InvalidInput(_))));

        let mut wider = forest.clone();
        wider.n_features = 3;
        assert!(wider.validate().is_err());

        let narrow_x: Vec<Vec<f64>> = x.iter().map(|row| vec![row[0]]).collect();
        let narrow = RegressionTree::fit(&narrow_x, &y, TreeParams::default()).unwrap();
        let mut mixed = forest;
        mixed.trees.push(narrow);
        assert!(mixed.validate().is_err());
    }
}
