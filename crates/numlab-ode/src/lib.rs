// ─────────────────────────────────────────────────────────────────────
// NumLab — ODE
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! General solutions of homogeneous linear ODEs with constant coefficients.
//!
//! The characteristic polynomial is solved numerically, roots are grouped
//! by multiplicity, and the solution is assembled as a small symbolic
//! [`expr::Expr`] tree that can be differentiated and evaluated.

pub mod expr;
pub mod ode;
