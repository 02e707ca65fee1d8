//! Linear model implementations

use crate::error::{TriageError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Retries once with a tiny ridge on the diagonal if the matrix is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    if let Some(x) = cholesky_factor_solve(a, b) {
        return Some(x);
    }

    let mut a_reg = a.clone();
    let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
    for k in 0..n {
        a_reg[[k, k]] += ridge;
    }
    cholesky_factor_solve(&a_reg, b)
}

/// A = L * L^T, then forward and backward substitution
fn cholesky_factor_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Matrix inversion using Gauss-Jordan elimination with partial pivoting (fallback)
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    if n != m.ncols() {
        return None;
    }

    let mut aug = Array2::<f64>::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }

        if max_row != col {
            for j in 0..2 * n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.slice(ndarray::s![.., n..]).to_owned())
}

/// Solve (X^T X + alpha * I) w = X^T y for centered data
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>, alpha: f64) -> Result<Array1<f64>> {
    let mut xtx = x.t().dot(x);
    if alpha > 0.0 {
        for i in 0..xtx.nrows() {
            xtx[[i, i]] += alpha;
        }
    }
    let xty = x.t().dot(y);

    if let Some(w) = cholesky_solve(&xtx, &xty) {
        return Ok(w);
    }

    matrix_inverse(&xtx)
        .map(|inv| inv.dot(&xty))
        .ok_or_else(|| {
            TriageError::Training("Matrix is singular, cannot solve least squares".to_string())
        })
}

/// Center features and target, returning the means needed to recover the intercept
fn center(x: &Array2<f64>, y: &Array1<f64>) -> Result<(Array2<f64>, Array1<f64>, Array1<f64>, f64)> {
    let x_mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| TriageError::Training("Cannot fit on an empty matrix".to_string()))?;
    let y_mean = y.mean().unwrap_or(0.0);
    let x_centered = x - &x_mean.view().insert_axis(Axis(0));
    let y_centered = y - y_mean;
    Ok((x_centered, y_centered, x_mean, y_mean))
}

fn check_lengths(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(TriageError::Shape {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }
    if x.nrows() == 0 {
        return Err(TriageError::Training("No training samples".to_string()));
    }
    Ok(())
}

/// Ordinary least squares with an intercept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
        }
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;
        let (x_c, y_c, x_mean, y_mean) = center(x, y)?;
        let coefficients = solve_normal_equations(&x_c, &y_c, 0.0)?;

        self.intercept = Some(y_mean - coefficients.dot(&x_mean));
        self.coefficients = Some(coefficients);
        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        linear_predict(self.coefficients.as_ref(), self.intercept, x)
    }
}

/// L2-regularized least squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    /// L2 regularization strength
    pub alpha: f64,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            alpha,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        check_lengths(x, y)?;
        if self.alpha < 0.0 {
            return Err(TriageError::Config(format!(
                "Ridge alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        let (x_c, y_c, x_mean, y_mean) = center(x, y)?;
        let coefficients = solve_normal_equations(&x_c, &y_c, self.alpha)?;

        self.intercept = Some(y_mean - coefficients.dot(&x_mean));
        self.coefficients = Some(coefficients);
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        linear_predict(self.coefficients.as_ref(), self.intercept, x)
    }
}

fn linear_predict(
    coefficients: Option<&Array1<f64>>,
    intercept: Option<f64>,
    x: &Array2<f64>,
) -> Result<Array1<f64>> {
    let coefficients = coefficients.ok_or(TriageError::ModelNotFitted)?;
    if x.ncols() != coefficients.len() {
        return Err(TriageError::Shape {
            expected: format!("{} features", coefficients.len()),
            actual: format!("{} features", x.ncols()),
        });
    }
    Ok(x.dot(coefficients) + intercept.unwrap_or(0.0))
}
