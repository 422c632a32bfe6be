// ─────────────────────────────────────────────────────────────────────
// NumLab — Symbolic expressions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Minimal symbolic expression tree.
//!
//! Enough algebra to build, print, differentiate and evaluate ODE
//! solutions: n-ary sums and products, non-negative integer powers,
//! `exp`, `cos`, `sin`. No factoring or term collection.

use std::collections::HashMap;
use std::fmt;

use numlab_types::error::{NumLabError, NumLabResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Symbol(String),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, u32),
    Exp(Box<Expr>),
    Cos(Box<Expr>),
    Sin(Box<Expr>),
}

impl Expr {
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(name.to_string())
    }

    pub fn add(terms: Vec<Expr>) -> Self {
        Expr::Add(terms)
    }

    pub fn mul(factors: Vec<Expr>) -> Self {
        Expr::Mul(factors)
    }

    pub fn pow(base: Expr, exponent: u32) -> Self {
        Expr::Pow(Box::new(base), exponent)
    }

    pub fn exp(arg: Expr) -> Self {
        Expr::Exp(Box::new(arg))
    }

    pub fn cos(arg: Expr) -> Self {
        Expr::Cos(Box::new(arg))
    }

    pub fn sin(arg: Expr) -> Self {
        Expr::Sin(Box::new(arg))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(v) if *v == 0.0)
    }

    /// Flatten nested sums and products, fold numeric constants, and drop
    /// additive zeros and multiplicative ones.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Symbol(_) => self.clone(),
            Expr::Add(terms) => simplify_sum(terms),
            Expr::Mul(factors) => simplify_product(factors),
            Expr::Pow(base, n) => {
                let base = base.simplify();
                match (*n, &base) {
                    (0, _) => Expr::Const(1.0),
                    (1, _) => base,
                    (_, Expr::Const(v)) => Expr::Const(v.powi(*n as i32)),
                    _ => Expr::pow(base, *n),
                }
            }
            Expr::Exp(arg) => match arg.simplify() {
                Expr::Const(v) if v == 0.0 => Expr::Const(1.0),
                a => Expr::exp(a),
            },
            Expr::Cos(arg) => match arg.simplify() {
                Expr::Const(v) if v == 0.0 => Expr::Const(1.0),
                a => Expr::cos(a),
            },
            Expr::Sin(arg) => match arg.simplify() {
                Expr::Const(v) if v == 0.0 => Expr::Const(0.0),
                a => Expr::sin(a),
            },
        }
    }

    /// Derivative with respect to `var`, simplified.
    pub fn diff(&self, var: &str) -> Expr {
        self.derive(var).simplify()
    }

    fn derive(&self, var: &str) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Symbol(name) => Expr::Const(if name == var { 1.0 } else { 0.0 }),
            Expr::Add(terms) => Expr::Add(terms.iter().map(|t| t.derive(var)).collect()),
            Expr::Mul(factors) => {
                // product rule over n factors
                let terms = (0..factors.len())
                    .map(|i| {
                        let mut product = factors.clone();
                        product[i] = factors[i].derive(var);
                        Expr::Mul(product)
                    })
                    .collect();
                Expr::Add(terms)
            }
            Expr::Pow(base, n) => {
                if *n == 0 {
                    return Expr::Const(0.0);
                }
                Expr::mul(vec![
                    Expr::Const(*n as f64),
                    Expr::pow((**base).clone(), n - 1),
                    base.derive(var),
                ])
            }
            Expr::Exp(arg) => Expr::mul(vec![self.clone(), arg.derive(var)]),
            Expr::Cos(arg) => Expr::mul(vec![
                Expr::Const(-1.0),
                Expr::Sin(arg.clone()),
                arg.derive(var),
            ]),
            Expr::Sin(arg) => Expr::mul(vec![Expr::Cos(arg.clone()), arg.derive(var)]),
        }
    }

    /// Numeric value under `bindings`. Unbound symbols are an error.
    pub fn eval(&self, bindings: &HashMap<String, f64>) -> NumLabResult<f64> {
        Ok(match self {
            Expr::Const(v) => *v,
            Expr::Symbol(name) => *bindings.get(name).ok_or_else(|| {
                NumLabError::InvalidInput(format!("symbol {name} has no binding"))
            })?,
            Expr::Add(terms) => {
                let mut sum = 0.0;
                for t in terms {
                    sum += t.eval(bindings)?;
                }
                sum
            }
            Expr::Mul(factors) => {
                let mut product = 1.0;
                for f in factors {
                    product *= f.eval(bindings)?;
                }
                product
            }
            Expr::Pow(base, n) => base.eval(bindings)?.powi(*n as i32),
            Expr::Exp(arg) => arg.eval(bindings)?.exp(),
            Expr::Cos(arg) => arg.eval(bindings)?.cos(),
            Expr::Sin(arg) => arg.eval(bindings)?.sin(),
        })
    }

    /// Symbol names in first-appearance order.
    pub fn symbols(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Symbol(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Expr::Add(children) | Expr::Mul(children) => {
                for c in children {
                    c.collect_symbols(out);
                }
            }
            Expr::Pow(inner, _) | Expr::Exp(inner) | Expr::Cos(inner) | Expr::Sin(inner) => {
                inner.collect_symbols(out)
            }
        }
    }
}

fn simplify_sum(terms: &[Expr]) -> Expr {
    let mut folded = 0.0;
    let mut out = Vec::with_capacity(terms.len());
    for t in terms {
        match t.simplify() {
            Expr::Const(v) => folded += v,
            Expr::Add(inner) => {
                for i in inner {
                    match i {
                        Expr::Const(v) => folded += v,
                        other => out.push(other),
                    }
                }
            }
            other => out.push(other),
        }
    }
    if folded != 0.0 {
        out.push(Expr::Const(folded));
    }
    match out.len() {
        0 => Expr::Const(0.0),
        1 => out.remove(0),
        _ => Expr::Add(out),
    }
}

fn simplify_product(factors: &[Expr]) -> Expr {
    let mut folded = 1.0;
    let mut out = Vec::with_capacity(factors.len());
    for f in factors {
        match f.simplify() {
            Expr::Const(v) => folded *= v,
            Expr::Mul(inner) => {
                for i in inner {
                    match i {
                        Expr::Const(v) => folded *= v,
                        other => out.push(other),
                    }
                }
            }
            other => out.push(other),
        }
    }
    if folded == 0.0 {
        return Expr::Const(0.0);
    }
    if folded != 1.0 || out.is_empty() {
        out.insert(0, Expr::Const(folded));
    }
    match out.len() {
        1 => out.remove(0),
        _ => Expr::Mul(out),
    }
}

fn fmt_number(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        write!(f, "{}", v as i64)
    } else {
        write!(f, "{v}")
    }
}

/// Child of a product or power that needs parentheses.
fn needs_parens(e: &Expr) -> bool {
    matches!(e, Expr::Add(_))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => fmt_number(*v, f),
            Expr::Symbol(name) => write!(f, "{name}"),
            Expr::Add(terms) => {
                for (i, t) in terms.iter().enumerate() {
                    let s = t.to_string();
                    match (i, s.strip_prefix('-')) {
                        (0, _) => write!(f, "{s}")?,
                        (_, Some(rest)) => write!(f, " - {rest}")?,
                        (_, None) => write!(f, " + {s}")?,
                    }
                }
                Ok(())
            }
            Expr::Mul(factors) => {
                let mut rest = factors.as_slice();
                if let [Expr::Const(v), tail @ ..] = rest {
                    if *v == -1.0 && !tail.is_empty() {
                        write!(f, "-")?;
                        rest = tail;
                    }
                }
                for (i, x) in rest.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    if needs_parens(x) {
                        write!(f, "({x})")?;
                    } else {
                        write!(f, "{x}")?;
                    }
                }
                Ok(())
            }
            Expr::Pow(base, n) => match **base {
                Expr::Symbol(_) => write!(f, "{base}**{n}"),
                Expr::Const(v) if v >= 0.0 => write!(f, "{base}**{n}"),
                _ => write!(f, "({base})**{n}"),
            },
            Expr::Exp(arg) => write!(f, "exp({arg})"),
            Expr::Cos(arg) => write!(f, "cos({arg})"),
            Expr::Sin(arg) => write!(f, "sin({arg})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t() -> Expr {
        Expr::symbol("t")
    }

    fn at(t: f64) -> HashMap<String, f64> {
        HashMap::from([("t".to_string(), t)])
    }

    #[test]
    fn test_simplify_folds_and_flattens() {
        let e = Expr::add(vec![
            Expr::Const(0.0),
            Expr::mul(vec![Expr::Const(1.0), t()]),
            Expr::add(vec![Expr::Const(2.0), Expr::Const(-2.0)]),
        ]);
        assert_eq!(e.simplify(), t());
        let zero = Expr::mul(vec![Expr::Const(0.0), Expr::exp(t())]);
        assert!(zero.simplify().is_zero());
        assert_eq!(Expr::exp(Expr::mul(vec![Expr::Const(0.0), t()])).simplify(), Expr::Const(1.0));
    }

    #[test]
    fn test_display() {
        let e = Expr::mul(vec![
            Expr::symbol("C2"),
            t(),
            Expr::exp(Expr::mul(vec![Expr::Const(2.0), t()])),
        ]);
        assert_eq!(e.to_string(), "C2*t*exp(2*t)");
        let s = Expr::add(vec![t(), Expr::mul(vec![Expr::Const(-3.5), Expr::pow(t(), 2)])]);
        assert_eq!(s.to_string(), "t - 3.5*t**2");
        assert_eq!(Expr::mul(vec![Expr::Const(-1.0), Expr::sin(t())]).to_string(), "-sin(t)");
    }

    #[test]
    fn test_diff_elementary() {
        // d/dt t³ = 3t²
        let d = Expr::pow(t(), 3).diff("t");
        assert!((d.eval(&at(2.0)).unwrap() - 12.0).abs() < 1e-12);
        // d/dt cos(2t) = −2 sin(2t)
        let c = Expr::cos(Expr::mul(vec![Expr::Const(2.0), t()])).diff("t");
        assert!((c.eval(&at(0.3)).unwrap() + 2.0 * (0.6f64).sin()).abs() < 1e-12);
        assert!(Expr::symbol("C1").diff("t").is_zero());
    }

    #[test]
    fn test_product_rule() {
        // d/dt t·e^t = (1 + t) e^t
        let e = Expr::mul(vec![t(), Expr::exp(t())]);
        let d = e.diff("t");
        let x = 0.7f64;
        assert!((d.eval(&at(x)).unwrap() - (1.0 + x) * x.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_unbound_symbol() {
        let e = Expr::add(vec![t(), Expr::symbol("C1")]);
        assert!(matches!(e.eval(&at(1.0)), Err(NumLabError::InvalidInput(_))));
        assert_eq!(e.symbols(), vec!["t".to_string(), "C1".to_string()]);
    }
}
