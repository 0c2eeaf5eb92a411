//! Safe evaluator factory.
//!
//! A [`NumericFunction`] never fails: every call yields a finite float, NaN,
//! or an infinity. The namespace holds the bound variable, `pi`, `e` and the
//! functions of [`Func`](crate::expr::Func); anything else evaluates to NaN.

use std::f64::{INFINITY, NAN, NEG_INFINITY};
use std::sync::Arc;

use crate::expr::{Expr, Fault};
use crate::normalize::CanonicalExpression;

/// Stateless real → real mapping over a canonical expression.
#[derive(Debug, Clone)]
pub struct NumericFunction {
    tree: Arc<Expr>,
    var: String,
}

impl NumericFunction {
    /// Binds `var` in the canonical expression.
    pub fn new(canonical: &CanonicalExpression, var: &str) -> Self {
        NumericFunction::from_tree(canonical.tree().clone(), var)
    }

    pub(crate) fn from_tree(tree: Expr, var: &str) -> Self {
        NumericFunction {
            tree: Arc::new(tree),
            var: var.to_string(),
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn eval(&self, at: f64) -> f64 {
        evaluate(&self.tree, &self.var, at)
    }

    /// Borrowing closure view for APIs that take `Fn(f64) -> f64`.
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |at| self.eval(at)
    }
}

/// Evaluates `tree` with the numeric policy applied to every fault.
///
/// Division by zero yields `+∞` for a positive evaluation point and `−∞`
/// otherwise. This is a sign heuristic, not a one-sided limit.
pub fn evaluate(tree: &Expr, var: &str, at: f64) -> f64 {
    match tree.eval(var, at) {
        Ok(v) => v,
        Err(Fault::DivisionByZero) => {
            if at > 0.0 {
                INFINITY
            } else {
                NEG_INFINITY
            }
        }
        Err(Fault::Domain) | Err(Fault::Overflow) | Err(Fault::Unresolved) => NAN,
    }
}

pub(crate) fn is_valid(val: f64) -> bool {
    val.is_finite()
}

pub(crate) fn safe_eval(func: &impl Fn(f64) -> f64, x: f64) -> Option<f64> {
    let val = func(x);
    if is_valid(val) {
        Some(val)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(raw: &str, var: &str) -> NumericFunction {
        NumericFunction::new(&CanonicalExpression::parse(raw).unwrap(), var)
    }

    #[test]
    fn division_by_zero_uses_sign_of_point() {
        let f = function("1/(x-1) + 1/x", "x");
        assert_eq!(f.eval(0.0), NEG_INFINITY);
        assert_eq!(f.eval(1.0), INFINITY);
        let g = function("5/(x*x - 4)", "x");
        assert_eq!(g.eval(-2.0), NEG_INFINITY);
        assert_eq!(g.eval(2.0), INFINITY);
    }

    #[test]
    fn domain_violations_are_nan() {
        assert!(function("sqrt(x)", "x").eval(-1.0).is_nan());
        assert!(function("log(x)", "x").eval(0.0).is_nan());
        assert!(function("acos(x)", "x").eval(1.5).is_nan());
        assert!(function("foo(x)", "x").eval(1.0).is_nan());
        assert!(function("x + y", "x").eval(1.0).is_nan());
    }

    #[test]
    fn parameter_variable_is_bound() {
        let f = function("t*cos(t)", "t");
        assert!((f.eval(std::f64::consts::PI) + std::f64::consts::PI).abs() < 1e-12);
        assert!(function("x", "t").eval(1.0).is_nan());
    }

    #[test]
    fn never_raises_across_samples() {
        let formulas = [
            "1/x", "log(x)", "sqrt(x)", "tan(x)", "cot(x)", "asin(x)", "x**x", "exp(1/x)",
            "x % 0", "0**x", "abs(x)/x", "pi*e", "sin(1/x)", "(x-1)**(-2)",
        ];
        let samples = crate::interval::linspace(-10.0, 10.0, 201);
        for raw in formulas {
            let f = function(raw, "x");
            for &x in &samples {
                let y = f.eval(x);
                assert!(y.is_finite() || y.is_nan() || y.is_infinite(), "{raw} at {x}");
            }
        }
    }

    #[test]
    fn cot_is_reciprocal_tan() {
        let f = function("ctg(x)", "x");
        assert!((f.eval(1.0) - 1.0 / 1.0f64.tan()).abs() < 1e-12);
    }
}
