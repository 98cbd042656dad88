//! LU factorization with partial pivoting
//!
//! Just enough linear algebra for the Gaussian timbre model: solving
//! `A x = b` and reading off `log |det A|` for small covariance matrices.

use ndarray::{Array1, Array2};

/// Pivots at or below this magnitude (relative to the largest entry) mark
/// the matrix as singular
const SINGULAR_PIVOT: f64 = 1e-12;

/// `P A = L U`, with unit-diagonal `L` and `U` packed into one matrix
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Array2<f64>,
    perm: Vec<usize>,
    parity: f64,
}

impl LuDecomposition {
    /// Factor a square matrix
    ///
    /// Returns `None` if the matrix is not square, is empty, or is
    /// numerically singular.
    pub fn new(matrix: &Array2<f64>) -> Option<Self> {
        let n = matrix.nrows();
        if n == 0 || matrix.ncols() != n {
            return None;
        }

        let scale = matrix.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let tolerance = SINGULAR_PIVOT * scale.max(1.0);

        let mut lu = matrix.clone();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut parity = 1.0;

        for k in 0..n {
            let (pivot_row, pivot_abs) = (k..n)
                .map(|r| (r, lu[[r, k]].abs()))
                .fold((k, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

            if !pivot_abs.is_finite() || pivot_abs <= tolerance {
                return None;
            }

            if pivot_row != k {
                for c in 0..n {
                    lu.swap([k, c], [pivot_row, c]);
                }
                perm.swap(k, pivot_row);
                parity = -parity;
            }

            let pivot = lu[[k, k]];
            for r in (k + 1)..n {
                let factor = lu[[r, k]] / pivot;
                lu[[r, k]] = factor;
                for c in (k + 1)..n {
                    let upper = lu[[k, c]];
                    lu[[r, c]] -= factor * upper;
                }
            }
        }

        Some(Self { lu, perm, parity })
    }

    /// Dimension of the factored matrix
    pub fn dim(&self) -> usize {
        self.lu.nrows()
    }

    /// Solve `A x = b`
    ///
    /// `b` must have length [`dim`](Self::dim).
    pub fn solve(&self, b: &Array1<f64>) -> Array1<f64> {
        let n = self.dim();
        let mut x = Array1::<f64>::zeros(n);

        // Forward substitution with L (unit diagonal)
        for i in 0..n {
            let mut sum = b[self.perm[i]];
            for j in 0..i {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum;
        }

        // Back substitution with U
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum / self.lu[[i, i]];
        }

        x
    }

    /// Sign and natural log of the absolute determinant
    pub fn log_determinant(&self) -> (f64, f64) {
        let mut sign = self.parity;
        let mut log_abs = 0.0;
        for i in 0..self.dim() {
            let d = self.lu[[i, i]];
            if d < 0.0 {
                sign = -sign;
            }
            log_abs += d.abs().ln();
        }
        (sign, log_abs)
    }
}
