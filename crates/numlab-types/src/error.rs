// ─────────────────────────────────────────────────────────────────────
// NumLab — Error taxonomy
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NumLabError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid field modulus {modulus}: must be greater than 1")]
    InvalidModulus { modulus: u64 },

    #[error("Field mismatch: mod {left} vs mod {right}")]
    FieldMismatch { left: u64, right: u64 },

    #[error("Division by zero in field mod {modulus}: zero has no inverse")]
    DivisionByZero { modulus: u64 },

    #[error("Matrix is not diagonalizable: {0}")]
    NonDiagonalizable(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Zero pivot at elimination step {step} (LU without pivoting)")]
    ZeroPivot { step: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type NumLabResult<T> = Result<T, NumLabError>;

/// Non-fatal numerical condition attached to a successful result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericalWarning {
    /// LU pivot whose magnitude is tiny relative to the matrix scale.
    NearZeroPivot { step: usize, pivot: f64 },
    /// Singular value small enough that the matching left vector is unreliable.
    NearZeroSingularValue { index: usize, value: f64 },
}

impl fmt::Display for NumericalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericalWarning::NearZeroPivot { step, pivot } => {
                write!(f, "near-zero pivot {pivot:e} at step {step}")
            }
            NumericalWarning::NearZeroSingularValue { index, value } => {
                write!(f, "near-zero singular value {value:e} at index {index}")
            }
        }
    }
}
