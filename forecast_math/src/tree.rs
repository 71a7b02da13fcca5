//! CART regression tree
//!
//! Splits are chosen greedily to minimise the summed squared error of the
//! two children. Leaves predict the mean target of the samples that reach
//! them.

use crate::{validate_training_set, MathError, Result};
use serde::{Deserialize, Serialize};

/// Growth limits for a regression tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of the tree; the root sits at depth 0
    pub max_depth: usize,
    /// Minimum samples a node needs before it may be split
    pub min_samples_split: usize,
    /// Minimum samples each child of a split must keep
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    /// Validate the growth limits
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(MathError::InvalidInput(
                "Max depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(MathError::InvalidInput(
                "Min samples to split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(MathError::InvalidInput(
                "Min samples per leaf must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    params: TreeParams,
    n_features: usize,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit a tree on every row of `features`
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: TreeParams) -> Result<Self> {
        params.validate()?;
        validate_training_set(features, targets)?;

        let mut sample: Vec<usize> = (0..features.len()).collect();
        Ok(Self::fit_sample(features, targets, &mut sample, params))
    }

    /// Fit a tree on the rows named by `sample`, which may repeat.
    ///
    /// Inputs must already be validated.
    pub(crate) fn fit_sample(
        features: &[Vec<f64>],
        targets: &[f64],
        sample: &mut [usize],
        params: TreeParams,
    ) -> Self {
        let mut tree = Self {
            params,
            n_features: features[0].len(),
            nodes: Vec::new(),
        };
        tree.grow(features, targets, sample, 0);
        tree
    }

    fn grow(&mut self, x: &[Vec<f64>], y: &[f64], sample: &mut [usize], depth: usize) -> usize {
        let mean = sample.iter().map(|&i| y[i]).sum::<f64>() / sample.len() as f64;
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= self.params.max_depth || sample.len() < self.params.min_samples_split {
            return node_id;
        }

        let Some(split) = self.best_split(x, y, sample) else {
            return node_id;
        };

        // Partition in place: rows going left first
        let mut mid = 0;
        for k in 0..sample.len() {
            if x[sample[k]][split.feature] <= split.threshold {
                sample.swap(k, mid);
                mid += 1;
            }
        }

        let (left_rows, right_rows) = sample.split_at_mut(mid);
        let left = self.grow(x, y, left_rows, depth + 1);
        let right = self.grow(x, y, right_rows, depth + 1);

        self.nodes[node_id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_id
    }

    fn best_split(&self, x: &[Vec<f64>], y: &[f64], sample: &[usize]) -> Option<SplitCandidate> {
        let n = sample.len();
        let min_leaf = self.params.min_samples_leaf;
        let total_sum: f64 = sample.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = sample.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        if parent_sse <= 1e-12 {
            return None;
        }

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in 0..self.n_features {
            column.clear();
            column.extend(sample.iter().map(|&i| (x[i][feature], y[i])));
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for split_at in 1..n {
                let (prev_value, prev_target) = column[split_at - 1];
                left_sum += prev_target;
                left_sq += prev_target * prev_target;

                let value = column[split_at].0;
                if value == prev_value {
                    continue;
                }
                if split_at < min_leaf || n - split_at < min_leaf {
                    continue;
                }

                let left_n = split_at as f64;
                let right_n = (n - split_at) as f64;
                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / left_n)
                    + (right_sq - right_sum * right_sum / right_n);

                let improves = match &best {
                    Some(current) => sse < current.sse,
                    None => sse < parent_sse - 1e-12,
                };

                if improves {
                    let mut threshold = (prev_value + value) / 2.0;
                    if threshold >= value {
                        threshold = prev_value;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best
    }

    /// Check the structure of a tree that did not come from [`RegressionTree::fit`].
    ///
    /// Children always sit after their parent in `nodes`, so walks terminate.
    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(MathError::InvalidInput(
                "Tree must use at least one feature".to_string(),
            ));
        }
        if self.nodes.is_empty() {
            return Err(MathError::InvalidInput("Tree has no nodes".to_string()));
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(MathError::InvalidInput(format!(
                        "Leaf {} holds a non-finite value",
                        id
                    )));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= self.n_features {
                        return Err(MathError::InvalidInput(format!(
                            "Node {} splits on feature {} of {}",
                            id, feature, self.n_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(MathError::InvalidInput(format!(
                            "Node {} has a NaN threshold",
                            id
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(MathError::InvalidInput(format!(
                                "Node {} points at invalid child {}",
                                id, child
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Predict a single row. The row width is not checked.
    pub(crate) fn predict_unchecked(&self, row: &[f64]) -> f64 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Predict a single row
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(self.predict_unchecked(row))
    }

    /// Predict every row
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        features.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Number of input columns the tree was fitted on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Total number of nodes, splits and leaves
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], node: usize) -> usize {
            match &nodes[node] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}
