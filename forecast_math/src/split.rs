//! Reproducible train/test partitioning

use crate::{MathError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Rows used for fitting
    pub train: Vec<usize>,
    /// Rows held out for evaluation
    pub test: Vec<usize>,
}

/// Shuffle `0..len` with a seeded generator and hold out `test_ratio` of it.
///
/// The held-out size is `ceil(len * test_ratio)`, and both sides must end up
/// non-empty. The same `(len, test_ratio, seed)` always yields the same
/// partition.
pub fn train_test_split(len: usize, test_ratio: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Test ratio must be between 0 and 1, got {}",
            test_ratio
        )));
    }

    let test_size = (len as f64 * test_ratio).ceil() as usize;
    if len < 2 || test_size == 0 || test_size >= len {
        return Err(MathError::InsufficientData(format!(
            "Need at least 2 samples to split with ratio {}, got {}",
            test_ratio, len
        )));
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}
