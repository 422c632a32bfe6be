// ─────────────────────────────────────────────────────────────────────
// NumLab — Polynomial roots
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Polynomial root finding.
//!
//! Closed-form Cardano solution for cubics, and the companion-matrix
//! method for arbitrary degree. Coefficient order differs by entry point:
//! [`PolynomialRootSolver::roots_of_polynomial`] takes ascending powers
//! (`c[k]` multiplies `x^k`), [`PolynomialRootSolver::solve_polynomial_roots`]
//! takes descending powers (numpy `roots` convention).

use ndarray::Array2;
use num_complex::Complex64;
use numlab_types::config::PolynomialConfig;
use numlab_types::error::{NumLabError, NumLabResult};

use crate::spectral::{NalgebraBackend, SpectralBackend};

/// A cubic root together with its residual check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifiedRoot {
    pub value: Complex64,
    /// `|f(value)|` is within tolerance of zero.
    pub verified: bool,
}

/// A distinct root value and how many times it occurred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootGroup {
    pub value: Complex64,
    pub multiplicity: usize,
}

/// Evaluate `Σ c[k] x^k` (ascending coefficients) with Horner's rule.
pub fn evaluate(coeffs: &[f64], x: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
}

/// `Σ |c[k]| r^k`, the magnitude scale of the terms at modulus `r`, used
/// to make residual checks relative.
fn term_scale(coeffs: &[f64], r: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(k, c)| c.abs() * r.powi(k as i32))
        .sum()
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // fold -0.0 into 0.0 so conjugate pairs and real roots group together
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Group numerically repeated roots by value rounded to `decimals` digits.
///
/// Output is sorted by real part, then imaginary part.
pub fn group_roots(roots: &[Complex64], decimals: u32) -> Vec<RootGroup> {
    let mut groups: Vec<RootGroup> = Vec::new();
    for z in roots {
        let key = Complex64::new(round_to(z.re, decimals), round_to(z.im, decimals));
        match groups.iter_mut().find(|g| g.value == key) {
            Some(group) => group.multiplicity += 1,
            None => groups.push(RootGroup {
                value: key,
                multiplicity: 1,
            }),
        }
    }
    groups.sort_by(|a, b| {
        a.value
            .re
            .total_cmp(&b.value.re)
            .then(a.value.im.total_cmp(&b.value.im))
    });
    groups
}

/// Companion matrix of a polynomial given in ascending order with
/// non-zero leading coefficient `c[n]`.
///
/// Sub-diagonal identity, first row `-c[n-1-j] / c[n]`, so that the
/// characteristic polynomial is `x^n + (c[n-1]/c[n]) x^(n-1) + … + c[0]/c[n]`.
pub fn companion_matrix(coeffs: &[f64]) -> NumLabResult<Array2<f64>> {
    if coeffs.len() < 2 {
        return Err(NumLabError::DegenerateInput(
            "companion matrix needs degree >= 1".to_string(),
        ));
    }
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    if lead == 0.0 {
        return Err(NumLabError::DegenerateInput(
            "leading coefficient is zero".to_string(),
        ));
    }
    let mut companion = Array2::zeros((n, n));
    for i in 1..n {
        companion[[i, i - 1]] = 1.0;
    }
    for j in 0..n {
        companion[[0, j]] = -coeffs[n - 1 - j] / lead;
    }
    Ok(companion)
}

const ABERTH_MAX_ITERATIONS: usize = 500;
const ABERTH_STEP_TOL: f64 = 1e-14;

/// All roots of `Σ c[k] x^k` (ascending, `c[n] ≠ 0`, degree ≥ 1) by
/// simultaneous Aberth–Ehrlich iteration.
///
/// Starting points sit on a circle whose radius bounds the root moduli.
/// Multiple roots converge linearly, so the iteration may stop at the cap
/// with those roots accurate to roughly `ε^(1/m)`.
fn aberth_roots(coeffs: &[f64]) -> Vec<Complex64> {
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    let monic: Vec<f64> = coeffs.iter().map(|c| c / lead).collect();
    let derivative: Vec<f64> = monic
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| k as f64 * c)
        .collect();

    let bound = (0..n)
        .map(|k| monic[k].abs().powf(1.0 / (n - k) as f64))
        .fold(0.0, f64::max);
    let radius = if bound > 0.0 { bound } else { 1.0 };
    let mut roots: Vec<Complex64> = (0..n)
        .map(|k| {
            let angle = 2.0 * std::f64::consts::PI * k as f64 / n as f64 + 0.4;
            Complex64::from_polar(radius, angle)
        })
        .collect();

    for iteration in 0..ABERTH_MAX_ITERATIONS {
        let mut largest_step = 0.0f64;
        for k in 0..n {
            let z = roots[k];
            let p = evaluate(&monic, z);
            if p.norm() == 0.0 {
                continue;
            }
            let dp = evaluate(&derivative, z);
            let repulsion: Complex64 = (0..n)
                .filter(|&j| j != k && roots[j] != z)
                .map(|j| (z - roots[j]).inv())
                .sum();
            let denom = dp - p * repulsion;
            if denom.norm() == 0.0 {
                continue;
            }
            let step = p / denom;
            roots[k] = z - step;
            largest_step = largest_step.max(step.norm() / z.norm().max(1.0));
        }
        if largest_step <= ABERTH_STEP_TOL {
            log::debug!("aberth: converged after {} sweeps", iteration + 1);
            break;
        }
    }
    roots
}

/// Root finder for real-coefficient polynomials.
#[derive(Debug, Clone)]
pub struct PolynomialRootSolver<B: SpectralBackend = NalgebraBackend> {
    config: PolynomialConfig,
    backend: B,
}

impl Default for PolynomialRootSolver<NalgebraBackend> {
    fn default() -> Self {
        Self::new(PolynomialConfig::default())
    }
}

impl PolynomialRootSolver<NalgebraBackend> {
    pub fn new(config: PolynomialConfig) -> Self {
        let backend = NalgebraBackend::with_max_iterations(config.max_schur_iterations);
        PolynomialRootSolver { config, backend }
    }
}

impl<B: SpectralBackend> PolynomialRootSolver<B> {
    pub fn with_backend(config: PolynomialConfig, backend: B) -> Self {
        PolynomialRootSolver { config, backend }
    }

    pub fn config(&self) -> &PolynomialConfig {
        &self.config
    }

    /// Roots of `a x³ + b x² + c x + d` by Cardano's formula.
    ///
    /// The cube-root branches of `u` and `v` are tied through `u·v = -p/3`;
    /// choosing them independently can produce values that are not roots.
    pub fn roots_of_cubic(&self, a: f64, b: f64, c: f64, d: f64) -> NumLabResult<[VerifiedRoot; 3]> {
        if [a, b, c, d].iter().any(|v| !v.is_finite()) {
            return Err(NumLabError::DegenerateInput(
                "cubic coefficients must be finite".to_string(),
            ));
        }
        if a == 0.0 {
            return Err(NumLabError::DegenerateInput(
                "a cannot be 0 (not a cubic equation)".to_string(),
            ));
        }

        // Depressed cubic t³ + p t + q = 0 with x = t − b/(3a)
        let p = (3.0 * a * c - b * b) / (3.0 * a * a);
        let q = (2.0 * b.powi(3) - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a.powi(3));
        let half_q = q / 2.0;
        let third_p = p / 3.0;
        let disc = half_q * half_q + third_p.powi(3);
        // relative to the term sizes, no absolute floor
        let scale = half_q * half_q + third_p.abs().powi(3);

        let omega = Complex64::new(-0.5, 3f64.sqrt() / 2.0);
        let ts: [Complex64; 3] = if disc.abs() <= self.config.discriminant_tol * scale {
            log::debug!("cubic: repeated-root branch (disc = {disc:e})");
            let u = (-half_q).cbrt();
            let double = Complex64::new(-u, 0.0);
            [Complex64::new(2.0 * u, 0.0), double, double]
        } else {
            log::debug!("cubic: Cardano branch (disc = {disc:e})");
            let sqrt_disc = Complex64::new(disc, 0.0).sqrt();
            let w_plus = -half_q + sqrt_disc;
            let w_minus = -half_q - sqrt_disc;
            let w = if w_plus.norm() >= w_minus.norm() {
                w_plus
            } else {
                w_minus
            };
            let u = w.cbrt();
            let v = if u.norm() > 0.0 {
                -third_p / u
            } else {
                Complex64::new(0.0, 0.0)
            };
            let omega_bar = omega.conj();
            [u + v, u * omega + v * omega_bar, u * omega_bar + v * omega]
        };

        let shift = -b / (3.0 * a);
        let ascending = [d, c, b, a];
        let xs = ts.map(|t| t + shift);
        // residuals are measured at the root scale so a root at 0 is judged
        // against the size of its neighbours
        let root_scale = xs.iter().map(|x| x.norm()).fold(0.0, f64::max);
        let check = |x: Complex64| {
            let residual = evaluate(&ascending, x).norm();
            let magnitude = term_scale(&ascending, root_scale).max(f64::MIN_POSITIVE);
            let tol = self.config.root_check_tol * magnitude;
            VerifiedRoot {
                value: x,
                verified: residual <= tol,
            }
        };
        Ok(xs.map(check))
    }

    /// Roots of `Σ c[k] x^k` (ascending coefficients).
    ///
    /// Degree ≥ 2 goes through the companion matrix. Near-equal roots are
    /// returned as they come out of the eigen solver; use [`group_roots`]
    /// when multiplicities matter.
    pub fn roots_of_polynomial(&self, coeffs: &[f64]) -> NumLabResult<Vec<Complex64>> {
        if coeffs.iter().any(|c| !c.is_finite()) {
            return Err(NumLabError::DegenerateInput(
                "polynomial coefficients must be finite".to_string(),
            ));
        }
        let trimmed = self.trim(coeffs)?;
        let degree = trimmed.len() - 1;
        match degree {
            0 => Ok(Vec::new()),
            1 => Ok(vec![Complex64::new(-trimmed[0] / trimmed[1], 0.0)]),
            _ => {
                let companion = companion_matrix(trimmed)?;
                match self.backend.eigenvalues(&companion) {
                    Ok(roots) => Ok(roots.to_vec()),
                    Err(NumLabError::LinAlg(reason)) => {
                        log::warn!("polynomial: {reason}; falling back to Aberth iteration");
                        Ok(aberth_roots(trimmed))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Roots of a polynomial given in descending order (`c[0]` multiplies
    /// the highest power).
    pub fn solve_polynomial_roots(&self, coeffs: &[f64]) -> NumLabResult<Vec<Complex64>> {
        let ascending: Vec<f64> = coeffs.iter().rev().copied().collect();
        self.roots_of_polynomial(&ascending)
    }

    /// Strip near-zero high-order coefficients. All-zero input has no
    /// degree and is rejected.
    fn trim<'a>(&self, coeffs: &'a [f64]) -> NumLabResult<&'a [f64]> {
        let mut len = coeffs.len();
        while len > 1 && coeffs[len - 1].abs() < self.config.trim_tol {
            len -= 1;
        }
        if len == 0 || coeffs[..len].iter().all(|c| c.abs() < self.config.trim_tol) {
            return Err(NumLabError::DegenerateInput(
                "all coefficients are zero; degree is undefined".to_string(),
            ));
        }
        Ok(&coeffs[..len])
    }
}
