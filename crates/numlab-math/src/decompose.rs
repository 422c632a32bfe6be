// ─────────────────────────────────────────────────────────────────────
// NumLab — Matrix decompositions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Determinant, LU, eigen and SVD decompositions of a square matrix, with
//! reconstruction checks.
//!
//! The stored matrix is never modified; every decomposition works on a
//! copy. Two routines are deliberately naive and documented as such:
//! [`determinant_recursive`] is O(n!), and the LU factorisation performs no
//! pivoting.

use log::{debug, warn};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use numlab_types::config::DecompositionConfig;
use numlab_types::error::{NumLabError, NumLabResult, NumericalWarning};

use crate::spectral::{NalgebraBackend, SpectralBackend};

// ───────────────────────────── result types ──────────────────────────

/// Doolittle factorisation `M = L · U`.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    /// Unit lower-triangular factor.
    pub l: Array2<f64>,
    /// Upper-triangular factor.
    pub u: Array2<f64>,
    /// Product of the diagonal of `U`.
    pub determinant: f64,
    pub warnings: Vec<NumericalWarning>,
}

/// `M = V · diag(λ) · V⁻¹`.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    pub eigenvalues: Array1<Complex64>,
    /// Eigenvectors column-wise, unit 2-norm.
    pub eigenvectors: Array2<Complex64>,
    /// The symmetric solver was used and `V` is orthogonal.
    pub symmetric: bool,
}

/// `M = U · diag(s) · Vt` with `s` sorted descending.
#[derive(Debug, Clone)]
pub struct SvdDecomposition {
    pub u: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub vt: Array2<f64>,
}

/// SVD derived from the eigen-decomposition of the Gram matrix `MᵗM`.
#[derive(Debug, Clone)]
pub struct EigenSvd {
    pub u: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub vt: Array2<f64>,
    /// Indices of columns of `U` built from near-zero singular values.
    pub low_confidence: Vec<usize>,
    pub warnings: Vec<NumericalWarning>,
}

/// Outcome of rebuilding the matrix from one decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionCheck {
    pub matches: bool,
    pub max_abs_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionReport {
    pub lu: ReconstructionCheck,
    pub eigen: ReconstructionCheck,
    pub svd: ReconstructionCheck,
    pub svd_via_eigen: ReconstructionCheck,
}

impl ReconstructionReport {
    pub fn all_match(&self) -> bool {
        self.lu.matches && self.eigen.matches && self.svd.matches && self.svd_via_eigen.matches
    }
}

// ───────────────────────────── free helpers ──────────────────────────

/// Determinant by cofactor expansion along the first row.
///
/// Cost is O(n!); anything beyond n ≈ 10 is impractical. Use
/// [`MatrixDecomposer::lu_decompose`] for larger matrices. The input is
/// assumed square and non-empty.
pub fn determinant_recursive(m: &Array2<f64>) -> f64 {
    let n = m.nrows();
    match n {
        0 => 1.0,
        1 => m[[0, 0]],
        2 => m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]],
        _ => (0..n)
            .map(|c| {
                let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
                sign * m[[0, c]] * determinant_recursive(&first_row_minor(m, c))
            })
            .sum(),
    }
}

/// Minor with row 0 and column `col` removed.
fn first_row_minor(m: &Array2<f64>, col: usize) -> Array2<f64> {
    let n = m.nrows();
    Array2::from_shape_fn((n - 1, n - 1), |(i, j)| {
        let src = if j < col { j } else { j + 1 };
        m[[i + 1, src]]
    })
}

fn max_abs(m: &Array2<f64>) -> f64 {
    m.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Element-wise `|rebuilt − original| ≤ atol + rtol·|original|`.
fn compare(original: &Array2<f64>, rebuilt: &Array2<Complex64>, rtol: f64, atol: f64) -> ReconstructionCheck {
    let mut matches = original.dim() == rebuilt.dim();
    let mut max_abs_error = 0.0_f64;
    if matches {
        for (o, r) in original.iter().zip(rebuilt.iter()) {
            let err = (*r - *o).norm();
            max_abs_error = max_abs_error.max(err);
            if !(err <= atol + rtol * o.abs()) {
                matches = false;
            }
        }
    } else {
        max_abs_error = f64::INFINITY;
    }
    ReconstructionCheck {
        matches,
        max_abs_error,
    }
}

fn to_complex(m: &Array2<f64>) -> Array2<Complex64> {
    m.mapv(|v| Complex64::new(v, 0.0))
}

fn scale_columns(m: &Array2<f64>, s: &Array1<f64>) -> Array2<f64> {
    let mut out = m.clone();
    for (j, mut col) in out.columns_mut().into_iter().enumerate() {
        col *= s[j];
    }
    out
}

/// Indices sorting `values` in descending order.
fn descending_order(values: &Array1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));
    order
}

/// Unit eigenvectors closer than this to the span of earlier ones count as
/// linearly dependent.
const INDEPENDENCE_TOL: f64 = 1e-8;

/// Component of `v` orthogonal to the orthonormal `basis`, two passes of
/// Gram–Schmidt.
fn orthogonal_part(v: &Array1<Complex64>, basis: &[Array1<Complex64>]) -> Array1<Complex64> {
    let mut r = v.clone();
    for _ in 0..2 {
        for q in basis {
            let proj: Complex64 = q.iter().zip(r.iter()).map(|(qi, ri)| qi.conj() * ri).sum();
            r.zip_mut_with(q, |ri, qi| *ri -= proj * qi);
        }
    }
    r
}

fn norm_complex(v: &Array1<Complex64>) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

// ───────────────────────────── decomposer ────────────────────────────

/// Decompositions of one fixed square matrix.
#[derive(Debug, Clone)]
pub struct MatrixDecomposer<B: SpectralBackend = NalgebraBackend> {
    matrix: Array2<f64>,
    config: DecompositionConfig,
    backend: B,
}

impl MatrixDecomposer<NalgebraBackend> {
    pub fn new(matrix: Array2<f64>) -> NumLabResult<Self> {
        Self::with_backend(matrix, DecompositionConfig::default(), NalgebraBackend::default())
    }

    pub fn with_config(matrix: Array2<f64>, config: DecompositionConfig) -> NumLabResult<Self> {
        Self::with_backend(matrix, config, NalgebraBackend::default())
    }
}

impl<B: SpectralBackend> MatrixDecomposer<B> {
    pub fn with_backend(matrix: Array2<f64>, config: DecompositionConfig, backend: B) -> NumLabResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(NumLabError::InvalidDimension(format!(
                "decomposer needs a square matrix, got {rows}x{cols}"
            )));
        }
        if rows == 0 {
            return Err(NumLabError::InvalidDimension(
                "decomposer needs a non-empty matrix".to_string(),
            ));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(NumLabError::InvalidInput(
                "matrix entries must be finite".to_string(),
            ));
        }
        Ok(MatrixDecomposer {
            matrix,
            config,
            backend,
        })
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// O(n!) cofactor expansion, see [`determinant_recursive`].
    pub fn determinant_recursive(&self) -> f64 {
        determinant_recursive(&self.matrix)
    }

    /// Doolittle LU without pivoting.
    ///
    /// A zero pivot that would have to be divided by is an error; tiny
    /// pivots produce a [`NumericalWarning::NearZeroPivot`] but are used
    /// as-is.
    pub fn lu_decompose(&self) -> NumLabResult<LuDecomposition> {
        let n = self.dim();
        let mut l = Array2::eye(n);
        let mut u = self.matrix.clone();
        let scale = max_abs(&self.matrix);
        let mut warnings = Vec::new();

        for i in 0..n.saturating_sub(1) {
            let pivot = u[[i, i]];
            if pivot == 0.0 || !pivot.is_finite() {
                return Err(NumLabError::ZeroPivot { step: i });
            }
            if pivot.abs() < self.config.pivot_warn_tol * scale {
                warn!("LU: near-zero pivot {pivot:e} at step {i}");
                warnings.push(NumericalWarning::NearZeroPivot { step: i, pivot });
            }
            for j in (i + 1)..n {
                let factor = u[[j, i]] / pivot;
                l[[j, i]] = factor;
                for k in i..n {
                    let delta = factor * u[[i, k]];
                    u[[j, k]] -= delta;
                }
                u[[j, i]] = 0.0;
            }
        }

        let determinant = u.diag().iter().product();
        Ok(LuDecomposition {
            l,
            u,
            determinant,
            warnings,
        })
    }

    fn is_symmetric(&self) -> bool {
        let tol = self.config.symmetry_tol * max_abs(&self.matrix).max(1.0);
        let n = self.dim();
        (0..n).all(|i| (0..i).all(|j| (self.matrix[[i, j]] - self.matrix[[j, i]]).abs() <= tol))
    }

    /// Eigenvalues and eigenvectors.
    ///
    /// Symmetric input uses the symmetric solver. General input takes its
    /// eigenvalues from the backend and each eigenvector from shifted
    /// inverse iteration. Only when a new vector falls inside the span of
    /// the ones already found is it recomputed orthogonal to the vectors of
    /// nearby eigenvalues. A defective matrix fails the residual test and
    /// yields [`NumLabError::NonDiagonalizable`].
    pub fn eigen_decompose(&self) -> NumLabResult<EigenDecomposition> {
        if self.is_symmetric() {
            debug!("eigen: symmetric path");
            let (values, vectors) = self.backend.symmetric_eigen(&self.matrix)?;
            return Ok(EigenDecomposition {
                eigenvalues: values.mapv(|v| Complex64::new(v, 0.0)),
                eigenvectors: to_complex(&vectors),
                symmetric: true,
            });
        }

        debug!("eigen: general path");
        let n = self.dim();
        let eigenvalues = self.backend.eigenvalues(&self.matrix)?;
        let a = to_complex(&self.matrix);
        let scale = max_abs(&self.matrix).max(1.0);
        let cluster_tol = 1e-6 * scale;

        let mut eigenvectors = Array2::zeros((n, n));
        let mut found: Vec<(Complex64, Array1<Complex64>)> = Vec::with_capacity(n);
        // orthonormal basis of span(found)
        let mut basis: Vec<Array1<Complex64>> = Vec::with_capacity(n);
        for (col, &lambda) in eigenvalues.iter().enumerate() {
            let seed = col % n;
            let mut v = self.inverse_iteration(&a, lambda, seed, &[], scale)?;
            let mut fresh = orthogonal_part(&v, &basis);
            if norm_complex(&fresh) < INDEPENDENCE_TOL {
                debug!("eigen: vector for {lambda} is dependent, reorthogonalising");
                let cluster: Vec<&Array1<Complex64>> = found
                    .iter()
                    .filter(|(mu, _)| (*mu - lambda).norm() <= cluster_tol)
                    .map(|(_, v)| v)
                    .collect();
                v = self.inverse_iteration(&a, lambda, seed, &cluster, scale)?;
                fresh = orthogonal_part(&v, &basis);
            }
            let norm = norm_complex(&fresh);
            if norm > 0.0 {
                basis.push(fresh.mapv(|z| z / norm));
            }
            eigenvectors.column_mut(col).assign(&v);
            found.push((lambda, v));
        }

        Ok(EigenDecomposition {
            eigenvalues,
            eigenvectors,
            symmetric: false,
        })
    }

    fn inverse_iteration(
        &self,
        a: &Array2<Complex64>,
        lambda: Complex64,
        seed: usize,
        cluster: &[&Array1<Complex64>],
        scale: f64,
    ) -> NumLabResult<Array1<Complex64>> {
        let n = a.nrows();
        let shift = lambda + Complex64::new(1e-10 * scale, 0.0);
        let mut shifted = a.clone();
        for i in 0..n {
            shifted[[i, i]] -= shift;
        }

        // ones + e_seed
        let mut x: Array1<Complex64> = Array1::from_shape_fn(n, |i| {
            Complex64::new(if i == seed { 2.0 } else { 1.0 }, 0.0)
        });

        for _ in 0..self.config.inverse_iterations.max(1) {
            x = self.backend.solve_complex(&shifted, &x)?;
            // the second pass works on a unit vector and removes what
            // cancellation left behind in the first
            for floor in [0.0, 1e-8] {
                for prev in cluster {
                    let proj: Complex64 =
                        prev.iter().zip(x.iter()).map(|(p, xi)| p.conj() * xi).sum();
                    x.zip_mut_with(*prev, |xi, p| *xi -= proj * p);
                }
                let norm = norm_complex(&x);
                if !(norm > floor && norm.is_finite()) {
                    return Err(NumLabError::NonDiagonalizable(format!(
                        "no independent eigenvector for eigenvalue {lambda}"
                    )));
                }
                x.mapv_inplace(|z| z / norm);
            }
        }

        // fix the phase so the largest component is real and positive
        let pivot = x
            .iter()
            .copied()
            .max_by(|p, q| p.norm().total_cmp(&q.norm()))
            .unwrap_or(Complex64::new(1.0, 0.0));
        let phase = pivot.conj() / pivot.norm();
        x.mapv_inplace(|z| z * phase);

        let residual = norm_complex(&(a.dot(&x) - x.mapv(|z| z * lambda)));
        if residual > 1e-6 * scale {
            return Err(NumLabError::NonDiagonalizable(format!(
                "eigenvector residual {residual:e} for eigenvalue {lambda} (defective matrix)"
            )));
        }
        Ok(x)
    }

    /// Backend SVD, singular values sorted descending.
    pub fn svd(&self) -> NumLabResult<SvdDecomposition> {
        let (u, s, vt) = self.backend.svd(&self.matrix)?;
        let order = descending_order(&s);
        let mut u_sorted = Array2::zeros(u.dim());
        let mut vt_sorted = Array2::zeros(vt.dim());
        let mut s_sorted = Array1::zeros(s.len());
        for (dst, &src) in order.iter().enumerate() {
            u_sorted.column_mut(dst).assign(&u.column(src));
            vt_sorted.row_mut(dst).assign(&vt.row(src));
            s_sorted[dst] = s[src];
        }
        Ok(SvdDecomposition {
            u: u_sorted,
            singular_values: s_sorted,
            vt: vt_sorted,
        })
    }

    /// SVD of the stored matrix through the Gram matrix, see [`svd_via_eigen`].
    pub fn svd_via_eigen(&self) -> NumLabResult<EigenSvd> {
        svd_via_eigen(&self.backend, &self.matrix, &self.config)
    }

    pub fn verify_lu(&self) -> NumLabResult<ReconstructionCheck> {
        let lu = self.lu_decompose()?;
        Ok(self.check(&to_complex(&lu.l.dot(&lu.u))))
    }

    /// Rebuild `V · Λ · V⁻¹`. A singular eigenvector matrix means the
    /// matrix cannot be diagonalised.
    pub fn verify_eigen(&self) -> NumLabResult<ReconstructionCheck> {
        let eig = self.eigen_decompose()?;
        let v_inv = self
            .backend
            .inverse_complex(&eig.eigenvectors)
            .map_err(|_| {
                NumLabError::NonDiagonalizable("eigenvector matrix is singular".to_string())
            })?;
        let mut v_lambda = eig.eigenvectors.clone();
        for (j, mut col) in v_lambda.columns_mut().into_iter().enumerate() {
            let lambda = eig.eigenvalues[j];
            col.mapv_inplace(|z| z * lambda);
        }
        Ok(self.check(&v_lambda.dot(&v_inv)))
    }

    pub fn verify_svd(&self) -> NumLabResult<ReconstructionCheck> {
        let svd = self.svd()?;
        let rebuilt = scale_columns(&svd.u, &svd.singular_values).dot(&svd.vt);
        Ok(self.check(&to_complex(&rebuilt)))
    }

    pub fn verify_svd_via_eigen(&self) -> NumLabResult<ReconstructionCheck> {
        let svd = self.svd_via_eigen()?;
        let rebuilt = scale_columns(&svd.u, &svd.singular_values).dot(&svd.vt);
        Ok(self.check(&to_complex(&rebuilt)))
    }

    /// Rebuild the matrix from every decomposition. The first failing
    /// decomposition aborts the whole report.
    pub fn verify_reconstruction(&self) -> NumLabResult<ReconstructionReport> {
        Ok(ReconstructionReport {
            lu: self.verify_lu()?,
            eigen: self.verify_eigen()?,
            svd: self.verify_svd()?,
            svd_via_eigen: self.verify_svd_via_eigen()?,
        })
    }

    fn check(&self, rebuilt: &Array2<Complex64>) -> ReconstructionCheck {
        compare(&self.matrix, rebuilt, self.config.rtol, self.config.atol)
    }
}

/// SVD of any real matrix from the eigen-decomposition of `MᵗM`.
///
/// Eigenvalues are sorted descending, `s = sqrt(max(λ, 0))` and
/// `U = M·V / (s + ε)` column-wise. Columns of `U` for near-zero singular
/// values are not trustworthy; their indices are reported in
/// `low_confidence`.
pub fn svd_via_eigen<B: SpectralBackend>(
    backend: &B,
    m: &Array2<f64>,
    config: &DecompositionConfig,
) -> NumLabResult<EigenSvd> {
    let (rows, cols) = m.dim();
    if rows == 0 || cols == 0 {
        return Err(NumLabError::InvalidDimension(
            "svd_via_eigen of an empty matrix".to_string(),
        ));
    }
    let gram = m.t().dot(m);
    let (values, vectors) = backend.symmetric_eigen(&gram)?;
    let order = descending_order(&values);

    let mut v = Array2::zeros((cols, cols));
    let mut s = Array1::zeros(cols);
    for (dst, &src) in order.iter().enumerate() {
        v.column_mut(dst).assign(&vectors.column(src));
        s[dst] = values[src].max(0.0).sqrt();
    }

    let mut u = m.dot(&v);
    for (j, mut col) in u.columns_mut().into_iter().enumerate() {
        col /= s[j] + config.svd_eps;
    }

    let threshold = config.low_confidence_tol * s[0].max(1.0);
    let mut low_confidence = Vec::new();
    let mut warnings = Vec::new();
    for (index, &value) in s.iter().enumerate() {
        if value <= threshold {
            warn!("svd_via_eigen: near-zero singular value {value:e} at index {index}");
            low_confidence.push(index);
            warnings.push(NumericalWarning::NearZeroSingularValue { index, value });
        }
    }

    Ok(EigenSvd {
        u,
        singular_values: s,
        vt: v.reversed_axes(),
        low_confidence,
        warnings,
    })
}
