// ─────────────────────────────────────────────────────────────────────
// NumLab — Property-Based Tests (proptest) for numlab-coding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for numlab-coding using proptest.
//!
//! Covers: Gibbs' inequality, entropy bounds, single-bit correction.

use numlab_coding::hamming::Hamming74;
use numlab_coding::info::{sequence_probability, InformationMetrics};
use proptest::prelude::*;

/// Normalised distribution of length n with every weight ≥ 0.01.
fn distribution(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..1.0, n).prop_map(|w| {
        let total: f64 = w.iter().sum();
        w.into_iter().map(|x| x / total).collect()
    })
}

fn distribution_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (2usize..10).prop_flat_map(|n| (distribution(n), distribution(n)))
}

// ── Information Properties ───────────────────────────────────────────

proptest! {
    /// D_KL(P ‖ Q) ≥ 0 and H(P, Q) ≥ H(P).
    #[test]
    fn gibbs_inequality((p, q) in distribution_pair()) {
        let m = InformationMetrics::default();
        let kl = m.kl_divergence(&p, &q).unwrap();
        prop_assert!(kl >= -1e-9, "KL = {}", kl);
        let h = m.entropy(&p).unwrap();
        let ce = m.cross_entropy(&p, &q).unwrap();
        prop_assert!(ce >= h - 1e-9, "H(P,Q) = {} < H(P) = {}", ce, h);
    }

    /// D_KL(P ‖ P) ≈ 0.
    #[test]
    fn self_divergence_vanishes(p in (2usize..10).prop_flat_map(distribution)) {
        let m = InformationMetrics::default();
        prop_assert!(m.kl_divergence(&p, &p).unwrap().abs() < 1e-9);
    }

    /// 0 ≤ H(P) ≤ log2(n).
    #[test]
    fn entropy_bounded(p in (2usize..10).prop_flat_map(distribution)) {
        let m = InformationMetrics::default();
        let h = m.entropy(&p).unwrap();
        prop_assert!(h >= -1e-9);
        prop_assert!(h <= (p.len() as f64).log2() + 1e-9);
    }

    /// Log-space probability agrees with the direct product whenever the
    /// latter is representable.
    #[test]
    fn sequence_log_matches_direct(n in 0u32..200, p in 0.05f64..=1.0) {
        let s = sequence_probability(n, p).unwrap();
        prop_assert!((s.direct.log2() - s.log2).abs() < 1e-9 * (1.0 + s.log2.abs()));
    }
}

// ── Hamming Properties ───────────────────────────────────────────────

proptest! {
    /// Every single-bit flip of every codeword decodes back to the data.
    #[test]
    fn single_flip_corrected(word in 0u8..16, flip in 0usize..7) {
        let data = [(word >> 3) & 1, (word >> 2) & 1, (word >> 1) & 1, word & 1];
        let mut code = Hamming74.encode(data).unwrap();
        code[flip] ^= 1;
        let decoded = Hamming74.decode(&code).unwrap();
        prop_assert_eq!(decoded.data, data);
        prop_assert_eq!(decoded.corrected, Some(flip + 1));
    }

    /// Distinct data words never share a codeword.
    #[test]
    fn encoding_injective(a in 0u8..16, b in 0u8..16) {
        prop_assume!(a != b);
        let bits = |w: u8| [(w >> 3) & 1, (w >> 2) & 1, (w >> 1) & 1, w & 1];
        let ca = Hamming74.encode(bits(a)).unwrap();
        let cb = Hamming74.encode(bits(b)).unwrap();
        let distance = ca.iter().zip(cb.iter()).filter(|(x, y)| x != y).count();
        prop_assert!(distance >= 3);
    }
}
