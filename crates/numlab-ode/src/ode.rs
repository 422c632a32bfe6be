// ─────────────────────────────────────────────────────────────────────
// NumLab — ODE General Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! General solution of `a_n y⁽ⁿ⁾ + … + a_1 y' + a_0 y = 0`.
//!
//! Coefficients are given in descending order, `[a_n, …, a_0]`, i.e. the
//! characteristic polynomial `a_n r^n + … + a_0`. Each real root `r` of
//! multiplicity `m` contributes `C·t^k·e^(r t)` for `k < m`; each complex
//! pair `a ± bi` contributes `t^k·e^(a t)·(C·cos(b t) + C'·sin(b t))`.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use num_complex::Complex64;
use numlab_math::polynomial::{group_roots, PolynomialRootSolver, RootGroup};
use numlab_math::spectral::{NalgebraBackend, SpectralBackend};
use numlab_types::config::OdeConfig;
use numlab_types::error::{NumLabError, NumLabResult};

use crate::expr::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSolution {
    /// Simplified sum of all solution terms.
    pub expression: Expr,
    /// Free constants `C1, C2, …` in the order they were introduced.
    pub constants: Vec<String>,
    /// Grouped characteristic roots the terms were built from.
    pub roots: Vec<RootGroup>,
}

impl GeneralSolution {
    /// Number of free constants; equals the ODE order.
    pub fn order(&self) -> usize {
        self.constants.len()
    }
}

impl fmt::Display for GeneralSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

pub struct OdeGeneralSolver<B: SpectralBackend = NalgebraBackend> {
    config: OdeConfig,
    root_solver: PolynomialRootSolver<B>,
}

impl Default for OdeGeneralSolver<NalgebraBackend> {
    fn default() -> Self {
        Self::new(OdeConfig::default())
    }
}

impl OdeGeneralSolver<NalgebraBackend> {
    pub fn new(config: OdeConfig) -> Self {
        OdeGeneralSolver {
            config,
            root_solver: PolynomialRootSolver::default(),
        }
    }
}

impl<B: SpectralBackend> OdeGeneralSolver<B> {
    pub fn with_root_solver(config: OdeConfig, root_solver: PolynomialRootSolver<B>) -> Self {
        OdeGeneralSolver {
            config,
            root_solver,
        }
    }

    pub fn config(&self) -> &OdeConfig {
        &self.config
    }

    pub fn solve(&self, coeffs: &[f64]) -> NumLabResult<GeneralSolution> {
        let raw = self.root_solver.solve_polynomial_roots(coeffs)?;
        let roots = group_roots(&raw, self.config.group_decimals);
        let var = Expr::symbol(&self.config.variable);

        let mut constants: Vec<String> = Vec::new();
        let mut fresh = || {
            let name = format!("C{}", constants.len() + 1);
            constants.push(name.clone());
            Expr::Symbol(name)
        };

        let mut terms = Vec::new();
        for group in &roots {
            let Complex64 { re, im } = group.value;
            if im.abs() < self.config.real_root_tol {
                for k in 0..group.multiplicity {
                    terms.push(Expr::mul(vec![
                        fresh(),
                        Expr::pow(var.clone(), k as u32),
                        exp_of(re, &var),
                    ]));
                }
            } else if im > 0.0 {
                for k in 0..group.multiplicity {
                    let oscillation = Expr::add(vec![
                        Expr::mul(vec![fresh(), Expr::cos(scaled(im, &var))]),
                        Expr::mul(vec![fresh(), Expr::sin(scaled(im, &var))]),
                    ]);
                    terms.push(Expr::mul(vec![
                        Expr::pow(var.clone(), k as u32),
                        exp_of(re, &var),
                        oscillation,
                    ]));
                }
            } else {
                debug!("ode: skipping conjugate root {}", group.value);
            }
        }

        Ok(GeneralSolution {
            expression: Expr::add(terms).simplify(),
            constants,
            roots,
        })
    }

    /// `Σ a_i · y^(n−i)` evaluated at `bindings`; ≈0 for a true solution.
    pub fn residual(
        &self,
        coeffs: &[f64],
        solution: &GeneralSolution,
        bindings: &HashMap<String, f64>,
    ) -> NumLabResult<f64> {
        if coeffs.is_empty() {
            return Err(NumLabError::DegenerateInput(
                "no ODE coefficients".to_string(),
            ));
        }
        let order = coeffs.len() - 1;
        let mut derivative = solution.expression.clone();
        let mut sum = 0.0;
        // coefficient of y^(k) is coeffs[order − k]
        for k in 0..=order {
            sum += coeffs[order - k] * derivative.eval(bindings)?;
            if k < order {
                derivative = derivative.diff(&self.config.variable);
            }
        }
        Ok(sum)
    }
}

fn scaled(factor: f64, var: &Expr) -> Expr {
    Expr::mul(vec![Expr::Const(factor), var.clone()])
}

fn exp_of(rate: f64, var: &Expr) -> Expr {
    Expr::exp(scaled(rate, var))
}
