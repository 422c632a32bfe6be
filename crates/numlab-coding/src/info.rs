// ─────────────────────────────────────────────────────────────────────
// NumLab — Information metrics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Entropy, cross-entropy and KL divergence in bits.
//!
//! Distributions are not normalised here; results are only meaningful
//! when the caller passes weights summing to ≈1. A smoothing epsilon keeps
//! zero entries finite.

use numlab_types::config::InformationConfig;
use numlab_types::error::{NumLabError, NumLabResult};

/// Probability of a run of `n` identical independent events, directly and
/// in log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceProbability {
    /// `p^n`; underflows to 0.0 for long runs.
    pub direct: f64,
    /// `n · log2(p)` in bits.
    pub log2: f64,
}

/// `p^n` and `n·log2(p)` for `p ∈ (0, 1]`.
pub fn sequence_probability(n: u32, p: f64) -> NumLabResult<SequenceProbability> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(NumLabError::InvalidInput(format!(
            "event probability must lie in (0, 1], got {p}"
        )));
    }
    Ok(SequenceProbability {
        direct: p.powf(n as f64),
        log2: n as f64 * p.log2(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct InformationMetrics {
    config: InformationConfig,
}

impl InformationMetrics {
    pub fn new(config: InformationConfig) -> Self {
        InformationMetrics { config }
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// `H(P) = −Σ p·log2(p + ε)`
    pub fn entropy(&self, p: &[f64]) -> NumLabResult<f64> {
        validate(p, "P")?;
        let eps = self.config.epsilon;
        Ok(-p.iter().map(|&pi| pi * (pi + eps).log2()).sum::<f64>())
    }

    /// `H(P, Q) = −Σ p·log2(q + ε)`
    pub fn cross_entropy(&self, p: &[f64], q: &[f64]) -> NumLabResult<f64> {
        validate_pair(p, q)?;
        let eps = self.config.epsilon;
        Ok(-p
            .iter()
            .zip(q)
            .map(|(&pi, &qi)| pi * (qi + eps).log2())
            .sum::<f64>())
    }

    /// `D_KL(P ‖ Q) = Σ p·log2((p + ε) / (q + ε))`
    pub fn kl_divergence(&self, p: &[f64], q: &[f64]) -> NumLabResult<f64> {
        validate_pair(p, q)?;
        let eps = self.config.epsilon;
        Ok(p.iter()
            .zip(q)
            .map(|(&pi, &qi)| pi * ((pi + eps) / (qi + eps)).log2())
            .sum())
    }
}

fn validate(weights: &[f64], name: &str) -> NumLabResult<()> {
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(NumLabError::InvalidInput(format!(
            "distribution {name} has invalid weight {bad}"
        )));
    }
    Ok(())
}

fn validate_pair(p: &[f64], q: &[f64]) -> NumLabResult<()> {
    if p.len() != q.len() {
        return Err(NumLabError::InvalidDimension(format!(
            "distributions differ in length: {} vs {}",
            p.len(),
            q.len()
        )));
    }
    validate(p, "P")?;
    validate(q, "Q")
}
