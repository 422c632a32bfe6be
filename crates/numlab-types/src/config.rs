// ─────────────────────────────────────────────────────────────────────
// NumLab — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{NumLabError, NumLabResult};

/// Top-level configuration. Every section and field is optional in JSON;
/// missing values fall back to the library defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub polynomial: PolynomialConfig,
    pub decomposition: DecompositionConfig,
    pub information: InformationConfig,
    pub ode: OdeConfig,
    pub geodesic: GeodesicConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolynomialConfig {
    pub trim_tol: f64,
    pub discriminant_tol: f64,
    pub root_check_tol: f64,
    /// Schur iteration cap for companion eigenvalues (0 = unlimited).
    pub max_schur_iterations: usize,
}

impl Default for PolynomialConfig {
    fn default() -> Self {
        PolynomialConfig {
            trim_tol: COEFF_TRIM_TOL,
            discriminant_tol: DISCRIMINANT_TOL,
            root_check_tol: ROOT_CHECK_TOL,
            max_schur_iterations: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    pub rtol: f64,
    pub atol: f64,
    pub pivot_warn_tol: f64,
    pub svd_eps: f64,
    pub low_confidence_tol: f64,
    /// Relative asymmetry below which the symmetric eigen path is taken.
    pub symmetry_tol: f64,
    pub inverse_iterations: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        DecompositionConfig {
            rtol: RECON_RTOL,
            atol: RECON_ATOL,
            pivot_warn_tol: PIVOT_WARN_TOL,
            svd_eps: SVD_EPS,
            low_confidence_tol: SVD_LOW_CONFIDENCE_TOL,
            symmetry_tol: 1e-12,
            inverse_iterations: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InformationConfig {
    pub epsilon: f64,
}

impl Default for InformationConfig {
    fn default() -> Self {
        InformationConfig { epsilon: LOG_EPS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdeConfig {
    pub group_decimals: u32,
    pub real_root_tol: f64,
    /// Name of the independent variable in the output expression.
    pub variable: String,
}

impl Default for OdeConfig {
    fn default() -> Self {
        OdeConfig {
            group_decimals: ROOT_GROUP_DECIMALS,
            real_root_tol: REAL_ROOT_TOL,
            variable: "t".to_string(),
        }
    }
}

/// Photon beam set-up around a Schwarzschild mass. Distances are in
/// units of the Schwarzschild radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeodesicConfig {
    pub solar_masses: f64,
    pub num_photons: usize,
    pub start_distance: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Time step as a fraction of the light-crossing time Rs/c.
    pub dt_fraction: f64,
    pub substeps: usize,
}

impl Default for GeodesicConfig {
    fn default() -> Self {
        GeodesicConfig {
            solar_masses: 1.0,
            num_photons: 10,
            start_distance: 12.0,
            y_min: 1.5,
            y_max: 4.5,
            dt_fraction: 0.05,
            substeps: 40,
        }
    }
}

const MAX_GROUP_DECIMALS: u32 = 15;

impl LabConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> NumLabResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> NumLabResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tolerances that would make every comparison meaningless.
    pub fn validate(&self) -> NumLabResult<()> {
        let tolerances = [
            ("polynomial.trim_tol", self.polynomial.trim_tol),
            ("polynomial.discriminant_tol", self.polynomial.discriminant_tol),
            ("polynomial.root_check_tol", self.polynomial.root_check_tol),
            ("decomposition.rtol", self.decomposition.rtol),
            ("decomposition.atol", self.decomposition.atol),
            ("decomposition.pivot_warn_tol", self.decomposition.pivot_warn_tol),
            ("decomposition.svd_eps", self.decomposition.svd_eps),
            (
                "decomposition.low_confidence_tol",
                self.decomposition.low_confidence_tol,
            ),
            ("decomposition.symmetry_tol", self.decomposition.symmetry_tol),
            ("information.epsilon", self.information.epsilon),
            ("ode.real_root_tol", self.ode.real_root_tol),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(NumLabError::ConfigError(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        // 10^decimals must stay an exact, finite f64 scale
        if self.ode.group_decimals > MAX_GROUP_DECIMALS {
            return Err(NumLabError::ConfigError(format!(
                "ode.group_decimals must be <= {MAX_GROUP_DECIMALS}, got {}",
                self.ode.group_decimals
            )));
        }
        if self.ode.variable.is_empty() {
            return Err(NumLabError::ConfigError(
                "ode.variable must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
