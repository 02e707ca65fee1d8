//! Random forest regressor

use crate::error::{TriageError, Result};
use super::decision_tree::DecisionTreeRegressor;
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bootstrap-aggregated regression trees, all features considered per split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    /// Number of trees
    pub n_estimators: usize,
    /// Seed; tree `i` uses `random_state + i`
    pub random_state: u64,
}

impl RandomForestRegressor {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            random_state: 42,
        }
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Fit the forest to training data
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
        if self.n_estimators == 0 {
            return Err(TriageError::Config("n_estimators must be at least 1".to_string()));
        }

        let base_seed = self.random_state;

        // Each tree owns its RNG, so the result does not depend on scheduling
        self.trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| -> Result<DecisionTreeRegressor> {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));
                let sample_indices: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot = y.select(Axis(0), &sample_indices);

                let mut tree = DecisionTreeRegressor::new();
                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self)
    }

    /// Mean of the per-tree predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(TriageError::ModelNotFitted);
        }

        let per_tree: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        let mut sum = Array1::<f64>::zeros(x.nrows());
        for preds in &per_tree {
            sum += preds;
        }
        Ok(sum / per_tree.len() as f64)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
