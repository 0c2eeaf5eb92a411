use std::f64::consts::{FRAC_PI_2, PI};

use crate::evaluator::evaluate;
use crate::expr::{BinOp, Expr, Func};
use crate::interval::{Interval, Lattice};

use super::poly::RationalFn;
use super::{Attempt, Unavailable};

/// Residual under which a candidate counts as a zero of the full expression.
const VERIFY_TOLERANCE: f64 = 1e-6;
/// Most lattice points materialised inside one interval.
const MAX_PERIODIC_POINTS: usize = 10_000;

/// Exact solutions of `expr = 0`: isolated points plus periodic families.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZeroSet {
    pub points: Vec<f64>,
    pub lattices: Vec<Lattice>,
}

impl ZeroSet {
    fn points(points: Vec<f64>) -> ZeroSet {
        ZeroSet {
            points,
            lattices: Vec::new(),
        }
    }

    fn lattice(lattice: Lattice) -> ZeroSet {
        ZeroSet {
            points: Vec::new(),
            lattices: vec![lattice],
        }
    }

    fn union(mut self, other: ZeroSet) -> ZeroSet {
        self.points.extend(other.points);
        self.lattices.extend(other.lattices);
        self
    }

    fn retain_zeros_of(mut self, expr: &Expr, var: &str) -> ZeroSet {
        self.points.retain(|&p| vanishes(expr, var, p));
        self
    }

    /// Every solution inside `interval`, unsorted.
    pub fn within(&self, interval: &Interval) -> Attempt<Vec<f64>> {
        let mut out: Vec<f64> = self.points.iter().copied().filter(|p| interval.contains(*p)).collect();
        for lattice in &self.lattices {
            let points = lattice
                .points_within(interval.lo(), interval.hi(), MAX_PERIODIC_POINTS)
                .ok_or(Unavailable::Unsupported("too many periodic solutions"))?;
            out.extend(points);
        }
        Ok(out)
    }
}

fn vanishes(expr: &Expr, var: &str, at: f64) -> bool {
    let v = evaluate(expr, var, at);
    v.is_finite() && v.abs() <= VERIFY_TOLERANCE
}

/// Solves `expr = 0` over the reals.
///
/// Rational functions go through exact polynomial roots; known
/// transcendental shapes reduce to their argument. Anything else is
/// unsupported.
pub fn zero_set(expr: &Expr, var: &str) -> Attempt<ZeroSet> {
    if !expr.depends_on(var) {
        return match expr.constant_value(var) {
            Some(v) if v != 0.0 => Ok(ZeroSet::default()),
            _ => Err(Unavailable::Unsupported("constant is zero or undefined")),
        };
    }
    if let Ok(rational) = RationalFn::from_expr(expr, var) {
        let roots = rational.num.real_roots()?;
        let points = roots.into_iter().filter(|&r| rational.den.eval(r).abs() > 1e-12).collect();
        return Ok(ZeroSet::points(points));
    }
    match expr {
        Expr::Neg(a) => zero_set(a, var),
        Expr::Binary(BinOp::Mul, a, b) => {
            Ok(zero_set(a, var)?.union(zero_set(b, var)?).retain_zeros_of(expr, var))
        }
        Expr::Binary(BinOp::Div, a, _) => Ok(zero_set(a, var)?.retain_zeros_of(expr, var)),
        Expr::Binary(BinOp::Pow, a, b) => {
            if !a.depends_on(var) {
                return match a.constant_value(var) {
                    Some(base) if base > 0.0 => Ok(ZeroSet::default()),
                    _ => Err(Unavailable::Unsupported("variable exponent on a non-positive base")),
                };
            }
            match b.constant_value(var) {
                Some(c) if c > 0.0 => Ok(zero_set(a, var)?.retain_zeros_of(expr, var)),
                Some(_) => Ok(ZeroSet::default()),
                None => Err(Unavailable::Unsupported("variable exponent")),
            }
        }
        Expr::Call(func, a) => match func {
            Func::Sin | Func::Tan => periodic(a, var, 0.0),
            Func::Cos | Func::Cot => periodic(a, var, FRAC_PI_2),
            Func::Asin | Func::Atan | Func::Sqrt | Func::Abs => zero_set(a, var),
            Func::Log | Func::Acos => {
                let shifted = Expr::binary(BinOp::Sub, a.as_ref().clone(), Expr::num(1.0));
                Ok(zero_set(&shifted, var)?.retain_zeros_of(expr, var))
            }
            Func::Exp => Ok(ZeroSet::default()),
        },
        _ => Err(Unavailable::Unsupported("no closed-form zeros")),
    }
}

/// Solutions of `u = offset + kπ` for a linear argument `u`.
fn periodic(arg: &Expr, var: &str, offset: f64) -> Attempt<ZeroSet> {
    match linear_form(arg, var) {
        Some((slope, intercept)) if slope != 0.0 => {
            Ok(ZeroSet::lattice(Lattice::new((offset - intercept) / slope, PI / slope.abs())))
        }
        _ => Err(Unavailable::Unsupported("periodic function of a non-linear argument")),
    }
}

/// `(slope, intercept)` when `expr` is affine in `var`.
pub(crate) fn linear_form(expr: &Expr, var: &str) -> Option<(f64, f64)> {
    if !expr.depends_on(var) {
        return Some((0.0, expr.constant_value(var)?));
    }
    match expr {
        Expr::Var(_) => Some((1.0, 0.0)),
        Expr::Neg(a) => linear_form(a, var).map(|(m, b)| (-m, -b)),
        Expr::Binary(op, a, b) => {
            let (m1, b1) = linear_form(a, var)?;
            let (m2, b2) = linear_form(b, var)?;
            match op {
                BinOp::Add => Some((m1 + m2, b1 + b2)),
                BinOp::Sub => Some((m1 - m2, b1 - b2)),
                BinOp::Mul if m1 == 0.0 => Some((b1 * m2, b1 * b2)),
                BinOp::Mul if m2 == 0.0 => Some((m1 * b2, b1 * b2)),
                BinOp::Div if m2 == 0.0 && b2 != 0.0 => Some((m1 / b2, b1 / b2)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(text: &str, lo: f64, hi: f64) -> Attempt<Vec<f64>> {
        let expr = Expr::parse(text).unwrap();
        let mut points = zero_set(&expr, "x")?.within(&Interval::new(lo, hi).unwrap())?;
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        Ok(points)
    }

    fn close_all(actual: &[f64], expected: &[f64]) -> bool {
        actual.len() == expected.len() && actual.iter().zip(expected).all(|(a, e)| (a - e).abs() < 1e-9)
    }

    #[test]
    fn rational_zeros_skip_poles() {
        assert!(close_all(&zeros("(x^2 - 1)/(x - 1)", -5.0, 5.0).unwrap(), &[-1.0]));
        assert!(close_all(&zeros("x^2 - 4", -5.0, 5.0).unwrap(), &[-2.0, 2.0]));
        assert!(zeros("1/x", -5.0, 5.0).unwrap().is_empty());
    }

    #[test]
    fn periodic_zeros_are_materialised() {
        assert!(close_all(&zeros("sin(x)", -4.0, 4.0).unwrap(), &[-PI, 0.0, PI]));
        assert!(close_all(&zeros("cos(2*x)", 0.0, 3.0).unwrap(), &[PI / 4.0, 3.0 * PI / 4.0]));
    }

    #[test]
    fn products_and_compositions() {
        // Both factors vanish at 0; duplicates are left to the caller.
        assert!(close_all(&zeros("x*sin(x)", -1.0, 4.0).unwrap(), &[0.0, 0.0, PI]));
        assert!(close_all(&zeros("log(x)", 0.1, 5.0).unwrap(), &[1.0]));
        assert!(close_all(&zeros("sqrt(x - 2)", 0.0, 5.0).unwrap(), &[2.0]));
        assert!(zeros("exp(x)", -5.0, 5.0).unwrap().is_empty());
    }

    #[test]
    fn log_vanishes_where_argument_is_one() {
        assert!(close_all(&zeros("log(x - 1)", 1.5, 5.0).unwrap(), &[2.0]));
    }

    #[test]
    fn unsupported_shapes() {
        assert!(zeros("sin(x^2)", -1.0, 1.0).is_err());
        assert!(zeros("x - cos(x)", -1.0, 1.0).is_err());
    }

    #[test]
    fn linear_forms() {
        let e = Expr::parse("(3*x - 1)/2").unwrap();
        assert_eq!(linear_form(&e, "x"), Some((1.5, -0.5)));
        assert_eq!(linear_form(&Expr::parse("x*x").unwrap(), "x"), None);
    }
}
