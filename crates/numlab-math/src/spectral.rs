// ─────────────────────────────────────────────────────────────────────
// NumLab — Spectral backend
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Eigenvalue, SVD and dense-solve kernels behind a trait.
//!
//! Callers work with `ndarray` arrays; [`NalgebraBackend`] copies them into
//! `nalgebra` matrices, runs the Schur / symmetric-QR / Golub-Kahan kernels
//! and copies the results back.

use log::debug;
use nalgebra::linalg::{Schur, SymmetricEigen, SVD};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use numlab_types::error::{NumLabError, NumLabResult};

/// Kernels the decomposition, PCA and root-finding code depend on.
pub trait SpectralBackend {
    /// Eigenvalues of a general real square matrix.
    fn eigenvalues(&self, a: &Array2<f64>) -> NumLabResult<Array1<Complex64>>;

    /// Eigen-decomposition of a real symmetric matrix.
    /// Returns `(eigenvalues, eigenvectors)`, eigenvectors column-wise, unsorted.
    fn symmetric_eigen(&self, a: &Array2<f64>) -> NumLabResult<(Array1<f64>, Array2<f64>)>;

    /// Thin SVD `A = U · diag(s) · Vt`, order of `s` unspecified.
    fn svd(&self, a: &Array2<f64>) -> NumLabResult<(Array2<f64>, Array1<f64>, Array2<f64>)>;

    /// Solve `A x = b` for complex square `A`.
    fn solve_complex(
        &self,
        a: &Array2<Complex64>,
        b: &Array1<Complex64>,
    ) -> NumLabResult<Array1<Complex64>>;

    /// Inverse of a complex square matrix.
    fn inverse_complex(&self, a: &Array2<Complex64>) -> NumLabResult<Array2<Complex64>>;
}

/// Default backend built on `nalgebra`.
#[derive(Debug, Clone)]
pub struct NalgebraBackend {
    /// Convergence threshold passed to the iterative kernels.
    pub eps: f64,
    /// Iteration cap (0 = iterate until convergence).
    pub max_iterations: usize,
}

impl Default for NalgebraBackend {
    fn default() -> Self {
        NalgebraBackend {
            eps: f64::EPSILON,
            max_iterations: 10_000,
        }
    }
}

impl NalgebraBackend {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        NalgebraBackend {
            max_iterations,
            ..Self::default()
        }
    }

    fn schur_eigenvalues(&self, a: &Array2<f64>) -> Option<Array1<Complex64>> {
        let schur = Schur::try_new(to_dmatrix(a), self.eps, self.max_iterations)?;
        let values = schur.complex_eigenvalues();
        Some(Array1::from_iter(
            values.iter().map(|z| Complex64::new(z.re, z.im)),
        ))
    }
}

const SIMILARITY_RETRIES: usize = 4;

/// Householder reflector `I − 2wwᵀ/(wᵀw)` from a fixed irregular `w`.
fn householder(n: usize, seed: usize) -> Array2<f64> {
    let w = Array1::from_shape_fn(n, |i| {
        (((i + 1) * (seed + 2)) as f64).sqrt().fract() + 0.25
    });
    let norm_sq = w.dot(&w);
    Array2::from_shape_fn((n, n), |(i, j)| {
        let delta = if i == j { 1.0 } else { 0.0 };
        delta - 2.0 * w[i] * w[j] / norm_sq
    })
}

fn require_square<T>(a: &Array2<T>, what: &str) -> NumLabResult<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(NumLabError::InvalidDimension(format!(
            "{what} requires a square matrix, got {rows}x{cols}"
        )));
    }
    Ok(rows)
}

fn to_dmatrix<T: nalgebra::Scalar + Copy>(a: &Array2<T>) -> DMatrix<T> {
    let (rows, cols) = a.dim();
    DMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
}

fn from_dmatrix<T: nalgebra::Scalar + Copy>(m: &DMatrix<T>) -> Array2<T> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

fn from_dvector<T: nalgebra::Scalar + Copy>(v: &DVector<T>) -> Array1<T> {
    Array1::from_iter(v.iter().copied())
}

impl SpectralBackend for NalgebraBackend {
    fn eigenvalues(&self, a: &Array2<f64>) -> NumLabResult<Array1<Complex64>> {
        let n = require_square(a, "eigenvalues")?;
        if n == 0 {
            return Ok(Array1::zeros(0));
        }
        if let Some(values) = self.schur_eigenvalues(a) {
            return Ok(values);
        }
        // Francis QR can cycle on structured input such as a companion
        // matrix with a symmetric spectrum; an orthogonal similarity keeps
        // the eigenvalues and breaks the structure.
        for attempt in 0..SIMILARITY_RETRIES {
            debug!("eigenvalues: Schur stalled, retrying with reflector {attempt}");
            let h = householder(n, attempt);
            if let Some(values) = self.schur_eigenvalues(&h.dot(a).dot(&h)) {
                return Ok(values);
            }
        }
        Err(NumLabError::LinAlg(format!(
            "Schur iteration did not converge within {} iterations",
            self.max_iterations
        )))
    }

    fn symmetric_eigen(&self, a: &Array2<f64>) -> NumLabResult<(Array1<f64>, Array2<f64>)> {
        let n = require_square(a, "symmetric_eigen")?;
        if n == 0 {
            return Ok((Array1::zeros(0), Array2::zeros((0, 0))));
        }
        let eig = SymmetricEigen::try_new(to_dmatrix(a), self.eps, self.max_iterations)
            .ok_or_else(|| {
                NumLabError::LinAlg("symmetric eigen-decomposition did not converge".to_string())
            })?;
        Ok((from_dvector(&eig.eigenvalues), from_dmatrix(&eig.eigenvectors)))
    }

    fn svd(&self, a: &Array2<f64>) -> NumLabResult<(Array2<f64>, Array1<f64>, Array2<f64>)> {
        let (rows, cols) = a.dim();
        if rows == 0 || cols == 0 {
            return Err(NumLabError::InvalidDimension(
                "SVD of an empty matrix".to_string(),
            ));
        }
        let svd = SVD::try_new(to_dmatrix(a), true, true, self.eps, self.max_iterations)
            .ok_or_else(|| NumLabError::LinAlg("SVD did not converge".to_string()))?;
        let u = svd
            .u
            .as_ref()
            .ok_or_else(|| NumLabError::LinAlg("SVD returned no U".to_string()))?;
        let v_t = svd
            .v_t
            .as_ref()
            .ok_or_else(|| NumLabError::LinAlg("SVD returned no Vt".to_string()))?;
        Ok((
            from_dmatrix(u),
            from_dvector(&svd.singular_values),
            from_dmatrix(v_t),
        ))
    }

    fn solve_complex(
        &self,
        a: &Array2<Complex64>,
        b: &Array1<Complex64>,
    ) -> NumLabResult<Array1<Complex64>> {
        let n = require_square(a, "solve_complex")?;
        if b.len() != n {
            return Err(NumLabError::InvalidDimension(format!(
                "right-hand side has length {}, expected {n}",
                b.len()
            )));
        }
        let rhs = DVector::from_iterator(n, b.iter().copied());
        let x = to_dmatrix(a)
            .lu()
            .solve(&rhs)
            .ok_or_else(|| NumLabError::LinAlg("singular system in complex solve".to_string()))?;
        Ok(from_dvector(&x))
    }

    fn inverse_complex(&self, a: &Array2<Complex64>) -> NumLabResult<Array2<Complex64>> {
        require_square(a, "inverse_complex")?;
        let inv = to_dmatrix(a)
            .try_inverse()
            .ok_or_else(|| NumLabError::LinAlg("matrix is singular".to_string()))?;
        Ok(from_dmatrix(&inv))
    }
}
