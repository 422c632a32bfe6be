// ─────────────────────────────────────────────────────────────────────
// NumLab — Coding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Entropy-family metrics over discrete distributions, and a single-error
//! correcting Hamming(7,4) code.

pub mod hamming;
pub mod info;
