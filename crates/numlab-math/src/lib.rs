// ─────────────────────────────────────────────────────────────────────
// NumLab — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical primitives for NumLab.
//!
//! Root finding, dense decompositions, PCA, prime-field arithmetic and the
//! discrete Fourier transform. Dense arrays are `ndarray`; eigen and SVD
//! kernels come from a [`spectral::SpectralBackend`].

pub mod decompose;
pub mod dft;
pub mod finite_field;
pub mod pca;
pub mod polynomial;
pub mod spectral;
