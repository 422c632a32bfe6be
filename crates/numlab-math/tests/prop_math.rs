// ─────────────────────────────────────────────────────────────────────
// NumLab — Property-Based Tests (proptest) for numlab-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for numlab-math using proptest.
//!
//! Covers: cubic residuals, small-scale cubic roots, companion-matrix
//! roots, LU reconstruction, determinant agreement, SVD via Gram matrix,
//! prime-field arithmetic, DFT roundtrip, PCA orthonormality.

use ndarray::Array2;
use num_complex::Complex64;
use numlab_math::decompose::{determinant_recursive, MatrixDecomposer};
use numlab_math::dft::{dft, fft, idft};
use numlab_math::finite_field::FieldElement;
use numlab_math::pca::PcaReducer;
use numlab_math::polynomial::{evaluate, PolynomialRootSolver};
use proptest::prelude::*;

/// Square matrix of size n with entries in [-1, 1].
fn square_matrix() -> impl Strategy<Value = Array2<f64>> {
    (2usize..6).prop_flat_map(|n| {
        prop::collection::vec(-1.0f64..1.0, n * n)
            .prop_map(move |v| Array2::from_shape_vec((n, n), v).unwrap())
    })
}

/// Strictly diagonally dominant: no zero pivots without pivoting.
fn dominant_matrix() -> impl Strategy<Value = Array2<f64>> {
    square_matrix().prop_map(|mut m| {
        let n = m.nrows();
        for i in 0..n {
            m[[i, i]] += if m[[i, i]] >= 0.0 { n as f64 } else { -(n as f64) };
        }
        m
    })
}

// ── Root Finding Properties ──────────────────────────────────────────

proptest! {
    /// Every Cardano root makes the cubic vanish up to rounding.
    #[test]
    fn cubic_roots_have_small_residual(
        a in prop_oneof![-5.0f64..-0.5, 0.5f64..5.0],
        b in -10.0f64..10.0,
        c in -10.0f64..10.0,
        d in -10.0f64..10.0,
    ) {
        let solver = PolynomialRootSolver::default();
        let roots = solver.roots_of_cubic(a, b, c, d).unwrap();
        let coeffs = [d, c, b, a];
        for r in &roots {
            let x = r.value;
            let scale: f64 = coeffs.iter().enumerate()
                .map(|(k, ck)| ck.abs() * x.norm().powi(k as i32))
                .sum::<f64>()
                .max(1.0);
            let residual = evaluate(&coeffs, x).norm();
            prop_assert!(residual <= 1e-6 * scale,
                "root {} residual {} (scale {})", x, residual, scale);
        }
    }

    /// Cubics whose roots sit at the 1e-3 scale give those roots back
    /// rather than a collapsed repeated root.
    #[test]
    fn small_scale_cubic_recovers_true_roots(
        r1 in -1e-3f64..-1e-4,
        r2 in -5e-5f64..5e-5,
        r3 in 1e-4f64..1e-3,
        a in prop_oneof![-5.0f64..-0.5, 0.5f64..5.0],
    ) {
        let e1 = r1 + r2 + r3;
        let e2 = r1 * r2 + r1 * r3 + r2 * r3;
        let e3 = r1 * r2 * r3;
        let solver = PolynomialRootSolver::default();
        let roots = solver.roots_of_cubic(a, -a * e1, a * e2, -a * e3).unwrap();
        let mut found: Vec<f64> = roots.iter().map(|r| r.value.re).collect();
        found.sort_by(|x, y| x.partial_cmp(y).unwrap());
        for (got, want) in found.iter().zip([r1, r2, r3].iter()) {
            prop_assert!((got - want).abs() < 1e-9, "got {:?}, want {:?}", found, [r1, r2, r3]);
        }
        for r in &roots {
            prop_assert!(r.value.im.abs() < 1e-9);
            prop_assert!(r.verified, "root {} not verified", r.value);
        }
    }

    /// Companion-matrix roots of a product of distinct linear factors
    /// recover those factors.
    #[test]
    fn companion_recovers_integer_roots(
        r1 in -6i32..-2,
        r2 in -1i32..2,
        r3 in 3i32..7,
    ) {
        let roots = [r1 as f64, r2 as f64, r3 as f64];
        // (x − r1)(x − r2)(x − r3), ascending order
        let e1: f64 = roots.iter().sum();
        let e2 = roots[0] * roots[1] + roots[0] * roots[2] + roots[1] * roots[2];
        let e3 = roots[0] * roots[1] * roots[2];
        let coeffs = [-e3, e2, -e1, 1.0];

        let solver = PolynomialRootSolver::default();
        let mut found: Vec<f64> = solver.roots_of_polynomial(&coeffs).unwrap()
            .iter().map(|z| z.re).collect();
        found.sort_by(|x, y| x.partial_cmp(y).unwrap());
        for (got, want) in found.iter().zip(roots.iter()) {
            prop_assert!((got - want).abs() < 1e-6, "got {:?}, want {:?}", found, roots);
        }
    }

    /// Ascending and descending entry points agree.
    #[test]
    fn coefficient_order_conventions_agree(
        coeffs in prop::collection::vec(-5.0f64..5.0, 2..6),
    ) {
        prop_assume!(coeffs.last().map_or(false, |c| c.abs() > 0.1));
        let solver = PolynomialRootSolver::default();
        let asc = solver.roots_of_polynomial(&coeffs).unwrap();
        let desc: Vec<f64> = coeffs.iter().rev().copied().collect();
        let desc_roots = solver.solve_polynomial_roots(&desc).unwrap();
        prop_assert_eq!(asc.len(), desc_roots.len());
        for z in &asc {
            prop_assert!(desc_roots.iter().any(|w| (z - w).norm() < 1e-9));
        }
    }
}

// ── Decomposition Properties ─────────────────────────────────────────

proptest! {
    /// L·U reproduces M element-wise for pivot-safe matrices.
    #[test]
    fn lu_reconstructs(m in dominant_matrix()) {
        let d = MatrixDecomposer::new(m.clone()).unwrap();
        let lu = d.lu_decompose().unwrap();
        let rebuilt = lu.l.dot(&lu.u);
        for (a, b) in m.iter().zip(rebuilt.iter()) {
            prop_assert!((a - b).abs() < 1e-8, "{} vs {}", a, b);
        }
    }

    /// Cofactor expansion and LU agree on the determinant.
    #[test]
    fn determinants_agree(m in dominant_matrix()) {
        let d = MatrixDecomposer::new(m.clone()).unwrap();
        let lu_det = d.lu_decompose().unwrap().determinant;
        let rec_det = determinant_recursive(&m);
        prop_assert!((lu_det - rec_det).abs() <= 1e-9 * rec_det.abs().max(1.0),
            "LU {} vs recursive {}", lu_det, rec_det);
    }

    /// SVD via the Gram matrix reconstructs SPD matrices.
    #[test]
    fn svd_via_eigen_spd(b in square_matrix()) {
        let n = b.nrows();
        let spd = b.t().dot(&b) + Array2::<f64>::eye(n);
        let d = MatrixDecomposer::new(spd.clone()).unwrap();
        let svd = d.svd_via_eigen().unwrap();
        prop_assert!(svd.low_confidence.is_empty());
        let mut us = svd.u.clone();
        for (j, mut col) in us.columns_mut().into_iter().enumerate() {
            col *= svd.singular_values[j];
        }
        let rebuilt = us.dot(&svd.vt);
        for (a, r) in spd.iter().zip(rebuilt.iter()) {
            prop_assert!((a - r).abs() < 1e-6, "{} vs {}", a, r);
        }
        for w in svd.singular_values.windows(2) {
            prop_assert!(w[0] >= w[1]);
        }
    }

    /// Native SVD always reconstructs.
    #[test]
    fn native_svd_reconstructs(m in square_matrix()) {
        let d = MatrixDecomposer::new(m).unwrap();
        prop_assert!(d.verify_svd().unwrap().matches);
    }
}

// ── Prime Field Properties ───────────────────────────────────────────

fn prime_and_pair() -> impl Strategy<Value = (u64, u64, u64)> {
    prop::sample::select(vec![2u64, 3, 5, 7, 11, 13, 101, 65_537, 1_000_000_007])
        .prop_flat_map(|p| (Just(p), 0..p, 0..p))
}

proptest! {
    /// Field addition and multiplication agree with integer arithmetic mod p.
    #[test]
    fn field_ops_match_modular_arithmetic((p, a, b) in prime_and_pair()) {
        let fa = FieldElement::from_u64(a, p).unwrap();
        let fb = FieldElement::from_u64(b, p).unwrap();
        prop_assert_eq!(fa.add(&fb).unwrap().value(), (a + b) % p);
        prop_assert_eq!(fa.mul(&fb).unwrap().value(), ((a as u128 * b as u128) % p as u128) as u64);
        prop_assert_eq!(fa.sub(&fb).unwrap().add(&fb).unwrap(), fa);
    }

    /// a⁻¹ · a = 1 for every non-zero a.
    #[test]
    fn field_inverse_is_inverse((p, a, _b) in prime_and_pair()) {
        prop_assume!(a != 0);
        let fa = FieldElement::from_u64(a, p).unwrap();
        let one = FieldElement::one(p).unwrap();
        prop_assert_eq!(fa.inverse().unwrap().mul(&fa).unwrap(), one);
        prop_assert_eq!(fa.div(&fa).unwrap(), one);
    }
}

// ── DFT / PCA Properties ─────────────────────────────────────────────

proptest! {
    /// idft(dft(x)) = x, and the direct sum agrees with rustfft.
    #[test]
    fn dft_roundtrip(signal in prop::collection::vec(-10.0f64..10.0, 1..64)) {
        let input: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        let spectrum = dft(&input);
        let back = idft(&spectrum);
        for (x, y) in input.iter().zip(back.iter()) {
            prop_assert!((x - y).norm() < 1e-9);
        }
        let fast = fft(&input);
        for (s, f) in spectrum.iter().zip(fast.iter()) {
            prop_assert!((s - f).norm() < 1e-8 * (1.0 + s.norm()));
        }
    }

    /// Principal directions are orthonormal and variance is descending.
    #[test]
    fn pca_components_orthonormal(
        values in prop::collection::vec(-5.0f64..5.0, 24),
        k in 1usize..4,
    ) {
        let data = Array2::from_shape_vec((8, 3), values).unwrap();
        let pca = PcaReducer::new().project(&data, k).unwrap();
        let gram = pca.components.t().dot(&pca.components);
        for i in 0..k {
            for j in 0..k {
                let expected = if i == j { 1.0 } else { 0.0 };
                prop_assert!((gram[[i, j]] - expected).abs() < 1e-9);
            }
        }
        for w in pca.explained_variance.windows(2) {
            prop_assert!(w[0] >= w[1] - 1e-12);
        }
    }
}
