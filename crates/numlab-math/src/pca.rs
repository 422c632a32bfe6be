// ─────────────────────────────────────────────────────────────────────
// NumLab — PCA
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Principal component analysis via the eigen-decomposition of the sample
//! covariance matrix.

use ndarray::{Array1, Array2, Axis};
use numlab_types::error::{NumLabError, NumLabResult};

use crate::spectral::{NalgebraBackend, SpectralBackend};

/// Data projected onto its leading principal components.
#[derive(Debug, Clone)]
pub struct PcaProjection {
    /// `[samples, k]` coordinates in the principal subspace.
    pub projected: Array2<f64>,
    /// `[features, k]` principal directions, column-wise.
    pub components: Array2<f64>,
    /// Covariance eigenvalue per component, descending.
    pub explained_variance: Array1<f64>,
    /// Per-feature mean removed before projection.
    pub mean: Array1<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PcaReducer<B: SpectralBackend = NalgebraBackend> {
    backend: B,
}

impl PcaReducer<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: SpectralBackend> PcaReducer<B> {
    pub fn with_backend(backend: B) -> Self {
        PcaReducer { backend }
    }

    /// Project `data` (`[samples, features]`) onto its top `k` components.
    pub fn project(&self, data: &Array2<f64>, k: usize) -> NumLabResult<PcaProjection> {
        let (samples, features) = data.dim();
        if k > features {
            return Err(NumLabError::InvalidDimension(format!(
                "requested {k} components but data has {features} features"
            )));
        }
        if samples < 2 {
            return Err(NumLabError::InvalidDimension(format!(
                "sample covariance needs at least 2 samples, got {samples}"
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(NumLabError::InvalidInput(
                "PCA data must be finite".to_string(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| NumLabError::InvalidDimension("empty data".to_string()))?;
        let centered = data - &mean;
        let covariance = centered.t().dot(&centered) / (samples as f64 - 1.0);

        let (values, vectors) = self.backend.symmetric_eigen(&covariance)?;
        let mut order: Vec<usize> = (0..features).collect();
        order.sort_by(|&i, &j| values[j].total_cmp(&values[i]));

        let mut components = Array2::zeros((features, k));
        let mut explained_variance = Array1::zeros(k);
        for (dst, &src) in order.iter().take(k).enumerate() {
            components.column_mut(dst).assign(&vectors.column(src));
            explained_variance[dst] = values[src];
        }

        let projected = centered.dot(&components);
        Ok(PcaProjection {
            projected,
            components,
            explained_variance,
            mean,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_points_on_a_line_have_one_component() {
        // y = 2x: all variance along (1, 2)/√5
        let data = array![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let pca = PcaReducer::new().project(&data, 2).unwrap();
        assert!(pca.explained_variance[1].abs() < 1e-10);
        let dir = pca.components.column(0);
        let expected = [1.0 / 5f64.sqrt(), 2.0 / 5f64.sqrt()];
        let dot = dir[0] * expected[0] + dir[1] * expected[1];
        assert!((dot.abs() - 1.0).abs() < 1e-10);
        // second coordinate is zero for every sample
        for row in pca.projected.rows() {
            assert!(row[1].abs() < 1e-10);
        }
    }

    #[test]
    fn test_sample_covariance_normalisation() {
        // variance of [1, 3] along x with n−1 = 1 is 2
        let data = array![[1.0, 0.0], [3.0, 0.0]];
        let pca = PcaReducer::new().project(&data, 1).unwrap();
        assert!((pca.explained_variance[0] - 2.0).abs() < 1e-12);
        assert!((pca.mean[0] - 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_too_many_components() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let err = PcaReducer::new().project(&data, 3).unwrap_err();
        assert!(matches!(err, NumLabError::InvalidDimension(_)));
    }

    #[test]
    fn test_single_sample_rejected() {
        let data = array![[1.0, 2.0, 3.0]];
        assert!(PcaReducer::new().project(&data, 1).is_err());
    }

    #[test]
    fn test_projection_is_centered() {
        let data = array![[2.0, 1.0, 0.5], [0.0, 3.0, 1.5], [4.0, 4.0, -1.0], [1.0, 0.0, 2.0]];
        let pca = PcaReducer::new().project(&data, 2).unwrap();
        assert_eq!(pca.projected.dim(), (4, 2));
        let col_means = pca.projected.mean_axis(Axis(0)).unwrap();
        assert!(col_means.iter().all(|m| m.abs() < 1e-12));
        assert!(pca.explained_variance[0] >= pca.explained_variance[1]);
    }
}
