//! Seeded hold-out split

use crate::error::{TriageError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Result of a train/test split
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

impl Split {
    pub fn n_train(&self) -> usize {
        self.x_train.nrows()
    }

    pub fn n_test(&self) -> usize {
        self.x_test.nrows()
    }
}

/// Number of held-out rows: `ceil(test_size * n)`
pub fn test_count(n_samples: usize, test_size: f64) -> usize {
    (test_size * n_samples as f64).ceil() as usize
}

/// Shuffle rows with a seeded RNG and hold out `ceil(test_size * n)` of them
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<Split> {
    let n_samples = x.nrows();
    if n_samples != y.len() {
        return Err(TriageError::Shape {
            expected: format!("y length = {}", n_samples),
            actual: format!("y length = {}", y.len()),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TriageError::Config(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = test_count(n_samples, test_size);
    if n_test == 0 || n_test >= n_samples {
        return Err(TriageError::Data(format!(
            "test_size={} with {} samples leaves {} test and {} train rows",
            test_size,
            n_samples,
            n_test,
            n_samples.saturating_sub(n_test)
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(Split {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    })
}
