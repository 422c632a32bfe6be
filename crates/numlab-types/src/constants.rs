// ─────────────────────────────────────────────────────────────────────
// NumLab — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// High-order polynomial coefficients below this magnitude are trimmed.
pub const COEFF_TRIM_TOL: f64 = 1e-14;

/// Cubic discriminant tolerance for the repeated-root branch.
pub const DISCRIMINANT_TOL: f64 = 1e-12;

/// Residual tolerance used to flag a cubic root as verified.
pub const ROOT_CHECK_TOL: f64 = 1e-9;

/// Decimal digits used when grouping numerically repeated roots.
pub const ROOT_GROUP_DECIMALS: u32 = 6;

/// Imaginary parts below this are treated as real roots.
pub const REAL_ROOT_TOL: f64 = 1e-6;

/// Reconstruction tolerances (numpy `allclose` defaults).
pub const RECON_RTOL: f64 = 1e-5;
pub const RECON_ATOL: f64 = 1e-8;

/// Relative pivot magnitude below which LU raises a warning.
pub const PIVOT_WARN_TOL: f64 = 1e-12;

/// Guard added to singular values when forming U = M·V / s.
pub const SVD_EPS: f64 = 1e-10;

/// Relative singular value below which a left vector is low-confidence.
pub const SVD_LOW_CONFIDENCE_TOL: f64 = 1e-6;

/// Smoothing epsilon for log-probabilities.
pub const LOG_EPS: f64 = 1e-12;

/// Gravitational constant (m³ kg⁻¹ s⁻²), coursework value.
pub const G_NEWTON: f64 = 6.674e-11;

/// Speed of light (m/s), rounded.
pub const C_LIGHT: f64 = 3e8;

/// Solar mass (kg)
pub const SOLAR_MASS: f64 = 1.989e30;
