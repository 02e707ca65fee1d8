//! Regression tree (CART, MSE criterion)

use crate::error::{TriageError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Nodes with fewer samples become leaves
const MIN_SAMPLES_SPLIT: usize = 2;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf { value: f64 },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Best split found for a node
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Fully grown regression tree minimizing within-node squared error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    root: Option<TreeNode>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(TriageError::Shape {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(TriageError::Training("No training samples".to_string()));
        }

        self.n_features = x.ncols();
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(build_tree(x, y, indices));

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(TriageError::ModelNotFitted)?;

        if x.ncols() != self.n_features {
            return Err(TriageError::Shape {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.rows().into_iter().map(|row| predict_row(root, row)).collect())
    }
}

fn build_tree(x: &Array2<f64>, y: &Array1<f64>, indices: Vec<usize>) -> TreeNode {
    let n_samples = indices.len();
    let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n_samples as f64;

    if n_samples < MIN_SAMPLES_SPLIT || is_constant(y, &indices) {
        return TreeNode::Leaf { value: mean };
    }

    let candidate = match find_best_split(x, y, &indices) {
        Some(c) => c,
        None => return TreeNode::Leaf { value: mean },
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| x[[i, candidate.feature_idx]] <= candidate.threshold);

    // a split that separates nothing would recurse on the same rows forever
    if left_indices.is_empty() || right_indices.is_empty() {
        return TreeNode::Leaf { value: mean };
    }

    TreeNode::Split {
        feature_idx: candidate.feature_idx,
        threshold: candidate.threshold,
        left: Box::new(build_tree(x, y, left_indices)),
        right: Box::new(build_tree(x, y, right_indices)),
    }
}

/// Sort the node's samples once per feature and sweep prefix sums,
/// so each feature costs O(n log n) instead of O(n²).
fn find_best_split(x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<SplitCandidate> {
    let n = indices.len() as f64;
    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let parent_impurity = total_sq / n - (total_sum / n).powi(2);

    let mut best: Option<SplitCandidate> = None;
    let mut order: Vec<usize> = indices.to_vec();

    for feature_idx in 0..x.ncols() {
        let column = x.column(feature_idx);
        order.sort_by(|&a, &b| {
            column[a]
                .partial_cmp(&column[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(candidate) =
            sweep_feature(column, y, &order, feature_idx, parent_impurity, total_sum, total_sq)
        {
            if best.as_ref().map_or(true, |b| candidate.gain > b.gain) {
                best = Some(candidate);
            }
        }
    }

    best
}

fn sweep_feature(
    column: ArrayView1<f64>,
    y: &Array1<f64>,
    order: &[usize],
    feature_idx: usize,
    parent_impurity: f64,
    total_sum: f64,
    total_sq: f64,
) -> Option<SplitCandidate> {
    let n = order.len();
    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best_gain = 0.0;
    let mut best_threshold = None;

    for pos in 0..n - 1 {
        let yi = y[order[pos]];
        left_sum += yi;
        left_sq += yi * yi;

        let here = column[order[pos]];
        let next = column[order[pos + 1]];
        if next <= here {
            continue;
        }

        let lc = (pos + 1) as f64;
        let rc = (n - pos - 1) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;
        let left_impurity = left_sq / lc - (left_sum / lc).powi(2);
        let right_impurity = right_sq / rc - (right_sum / rc).powi(2);
        let weighted = (lc * left_impurity + rc * right_impurity) / n as f64;

        let gain = parent_impurity - weighted;
        if gain > best_gain {
            best_gain = gain;
            best_threshold = Some(split_threshold(here, next));
        }
    }

    best_threshold.map(|threshold| SplitCandidate {
        feature_idx,
        threshold,
        gain: best_gain,
    })
}

/// Midpoint of two distinct values that still sends `next` to the right.
/// For adjacent floats the midpoint rounds up to `next`.
fn split_threshold(here: f64, next: f64) -> f64 {
    let mid = here / 2.0 + next / 2.0;
    if mid >= next || !mid.is_finite() {
        here
    } else {
        mid
    }
}

fn is_constant(y: &Array1<f64>, indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| (y[i] - first).abs() < 1e-12)
}

fn predict_row(node: &TreeNode, row: ArrayView1<f64>) -> f64 {
    let mut node = node;
    loop {
        match node {
            TreeNode::Leaf { value } => return *value,
            TreeNode::Split { feature_idx, threshold, left, right } => {
                node = if row[*feature_idx] <= *threshold { left } else { right };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn next_up(v: f64) -> f64 {
        f64::from_bits(v.to_bits() + 1)
    }

    #[test]
    fn test_regressor_memorizes_training_data() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-12);
        }
    }

    #[test]
    fn test_step_function_threshold() {
        let x = array![[0.0], [1.0], [2.0], [10.0], [11.0], [12.0]];
        let y = array![1.0, 1.0, 1.0, 7.0, 7.0, 7.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();

        let preds = tree.predict(&array![[5.9], [6.1]]).unwrap();
        assert_eq!(preds[0], 1.0);
        assert_eq!(preds[1], 7.0);
    }

    #[test]
    fn test_adjacent_float_values_split() {
        // the naive midpoint of these two rounds up to `b`
        let a = next_up(1.0);
        let b = next_up(a);
        assert!((a + b) / 2.0 >= b);

        let x = array![[a], [b]];
        let y = array![0.0, 10.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), array![0.0, 10.0]);
    }

    #[test]
    fn test_split_threshold_separates() {
        for here in [1.0, 0.5, 1e300, f64::MAX / 2.0] {
            let next = next_up(here);
            let t = split_threshold(here, next);
            assert!(here <= t && t < next, "bad threshold between {} and {}", here, next);
        }
        assert_eq!(split_threshold(1.0, 3.0), 2.0);
    }

    #[test]
    fn test_duplicate_features_with_different_targets() {
        let x = array![[1.0], [1.0], [1.0]];
        let y = array![0.0, 3.0, 6.0];

        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&array![[1.0]]).unwrap()[0], 3.0);
    }

    #[test]
    fn test_wrong_feature_count() {
        let mut tree = DecisionTreeRegressor::new();
        tree.fit(&array![[1.0, 2.0], [2.0, 1.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            tree.predict(&array![[1.0]]),
            Err(TriageError::Shape { .. })
        ));
    }
}
