use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI};
use std::f64::{INFINITY, NEG_INFINITY};

use crate::expr::{BinOp, Expr, Func};
use crate::interval::{intersect_spans, merge_spans, remove_point, sort_spans, Domain, Lattice, Span};

use super::poly::RationalFn;
use super::solve::{linear_form, zero_set};
use super::{Attempt, Unavailable};

/// Lattice points materialised per bounded span before falling back to a
/// periodic description.
const MAX_MATERIALISED: usize = 10_000;

/// Working set: admissible spans minus isolated holes and periodic holes.
struct Region {
    spans: Vec<Span>,
    holes: Vec<f64>,
    lattices: Vec<Lattice>,
}

impl Region {
    fn reals() -> Region {
        Region {
            spans: vec![Span::reals()],
            holes: Vec::new(),
            lattices: Vec::new(),
        }
    }

    fn restrict(&mut self, allowed: &[Span]) {
        self.spans = intersect_spans(&self.spans, allowed);
    }

    fn into_domain(self) -> Domain {
        let mut spans = self.spans;
        for hole in self.holes {
            spans = remove_point(&spans, hole);
        }
        if self.lattices.is_empty() || spans.is_empty() {
            return Domain::from_spans(spans);
        }
        if spans.iter().all(Span::is_bounded) {
            let mut points = Vec::new();
            for lattice in &self.lattices {
                for span in &spans {
                    match lattice.points_within(span.lo, span.hi, MAX_MATERIALISED) {
                        Some(found) => points.extend(found),
                        None => return periodic(spans, self.lattices),
                    }
                }
            }
            for p in points {
                spans = remove_point(&spans, p);
            }
            return Domain::from_spans(spans);
        }
        periodic(spans, self.lattices)
    }
}

fn periodic(base: Vec<Span>, mut excluded: Vec<Lattice>) -> Domain {
    excluded.dedup();
    Domain::PeriodicComplement { base, excluded }
}

/// Largest set of reals on which `expr` is defined and continuous.
pub fn continuity_domain(expr: &Expr, var: &str) -> Attempt<Domain> {
    let mut region = Region::reals();
    constrain(expr, var, &mut region)?;
    Ok(region.into_domain())
}

fn constrain(expr: &Expr, var: &str, region: &mut Region) -> Attempt<()> {
    if !expr.depends_on(var) {
        if expr.constant_value(var).is_none() {
            region.spans.clear();
        }
        return Ok(());
    }
    match expr {
        Expr::Num(_) | Expr::Var(_) => Ok(()),
        Expr::Neg(a) => constrain(a, var, region),
        Expr::Binary(op, a, b) => {
            constrain(a, var, region)?;
            constrain(b, var, region)?;
            match op {
                BinOp::Add | BinOp::Sub | BinOp::Mul => Ok(()),
                BinOp::Div | BinOp::Rem => exclude_zeros(b, var, region),
                BinOp::Pow => constrain_power(a, b, var, region),
            }
        }
        Expr::Call(func, a) => {
            constrain(a, var, region)?;
            match func {
                Func::Sqrt => require_sign(a, var, false, region),
                Func::Log => require_sign(a, var, true, region),
                Func::Asin | Func::Acos => {
                    let above = Expr::binary(BinOp::Add, a.as_ref().clone(), Expr::num(1.0));
                    let below = Expr::binary(BinOp::Sub, Expr::num(1.0), a.as_ref().clone());
                    require_sign(&above, var, false, region)?;
                    require_sign(&below, var, false, region)
                }
                Func::Tan => exclude_periodic(a, var, FRAC_PI_2, region),
                Func::Cot => exclude_periodic(a, var, 0.0, region),
                Func::Sin | Func::Cos | Func::Atan | Func::Exp | Func::Abs => Ok(()),
            }
        }
        Expr::Opaque(..) => Err(Unavailable::Unsupported("unknown function")),
    }
}

fn constrain_power(base: &Expr, exp: &Expr, var: &str, region: &mut Region) -> Attempt<()> {
    match exp.constant_value(var) {
        Some(c) if c.fract() == 0.0 => {
            if c < 0.0 {
                exclude_zeros(base, var, region)?;
            }
            Ok(())
        }
        Some(c) => require_sign(base, var, c < 0.0, region),
        None if !base.depends_on(var) => match base.constant_value(var) {
            Some(b) if b > 0.0 => Ok(()),
            _ => Err(Unavailable::Unsupported("variable exponent on a non-positive base")),
        },
        None => Err(Unavailable::Unsupported("variable exponent")),
    }
}

fn exclude_zeros(expr: &Expr, var: &str, region: &mut Region) -> Attempt<()> {
    let zeros = zero_set(expr, var)?;
    region.holes.extend(zeros.points);
    region.lattices.extend(zeros.lattices);
    Ok(())
}

/// Removes `u = offset + kπ` for a linear argument `u`.
fn exclude_periodic(arg: &Expr, var: &str, offset: f64, region: &mut Region) -> Attempt<()> {
    match linear_form(arg, var) {
        Some((slope, intercept)) if slope != 0.0 => {
            region
                .lattices
                .push(Lattice::new((offset - intercept) / slope, PI / slope.abs()));
            Ok(())
        }
        _ => Err(Unavailable::Unsupported("periodic pole of a non-linear argument")),
    }
}

/// Keeps the points where `expr ≥ 0` (or `> 0` when `strict`).
fn require_sign(expr: &Expr, var: &str, strict: bool, region: &mut Region) -> Attempt<()> {
    let rational = RationalFn::from_expr(expr, var)?;
    let allowed = sign_set(&rational, strict)?;
    region.restrict(&allowed);
    Ok(())
}

fn sign_set(rational: &RationalFn, strict: bool) -> Attempt<Vec<Span>> {
    if rational.num.is_zero() {
        return Ok(if strict { Vec::new() } else { vec![Span::reals()] });
    }
    let zeros = rational.num.real_roots()?;
    let poles = match rational.den.degree() {
        Some(0) => Vec::new(),
        _ => rational.den.real_roots()?,
    };
    let mut knots: Vec<f64> = zeros.iter().chain(poles.iter()).copied().collect();
    knots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    knots.dedup();

    let mut bounds = vec![NEG_INFINITY];
    bounds.extend(&knots);
    bounds.push(INFINITY);

    let mut pieces = Vec::new();
    for pair in bounds.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let probe = match (a.is_finite(), b.is_finite()) {
            (true, true) => 0.5 * (a + b),
            (false, true) => b - 1.0,
            (true, false) => a + 1.0,
            (false, false) => 0.0,
        };
        if rational.eval(probe) > 0.0 {
            pieces.push(Span::open(a, b));
        }
    }
    if !strict {
        pieces.extend(
            zeros
                .iter()
                .filter(|z| !poles.contains(z))
                .map(|&z| Span::point(z)),
        );
    }
    sort_spans(&mut pieces);
    Ok(merge_spans(pieces))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(text: &str) -> Attempt<Domain> {
        continuity_domain(&Expr::parse(text).unwrap(), "x")
    }

    #[test]
    fn polynomials_are_defined_everywhere() {
        assert_eq!(domain("x^3 - 2*x").unwrap(), Domain::Reals);
        assert_eq!(domain("sin(x)*exp(x)").unwrap(), Domain::Reals);
    }

    #[test]
    fn poles_are_removed() {
        assert_eq!(domain("1/x").unwrap().to_string(), "(−∞; 0) ∪ (0; +∞)");
        assert_eq!(
            domain("1/(x^2 - 4)").unwrap().to_string(),
            "(−∞; -2) ∪ (-2; 2) ∪ (2; +∞)"
        );
        assert_eq!(domain("x^(-2)").unwrap().to_string(), "(−∞; 0) ∪ (0; +∞)");
    }

    #[test]
    fn radicands_and_log_arguments() {
        assert_eq!(domain("sqrt(x)").unwrap(), Domain::Interval(Span::new(0.0, INFINITY, true, false)));
        assert_eq!(domain("log(x)").unwrap(), Domain::Interval(Span::open(0.0, INFINITY)));
        assert_eq!(domain("sqrt(4 - x^2)").unwrap(), Domain::Interval(Span::closed(-2.0, 2.0)));
        assert_eq!(domain("log(x - 1)").unwrap().to_string(), "(1; +∞)");
        assert_eq!(domain("x^0.5").unwrap().to_string(), "[0; +∞)");
        assert_eq!(domain("sqrt(x^2 + 1)").unwrap(), Domain::Reals);
    }

    #[test]
    fn inverse_trig_is_bounded() {
        assert_eq!(domain("asin(x)").unwrap(), Domain::Interval(Span::closed(-1.0, 1.0)));
        assert_eq!(domain("acos(2*x)").unwrap(), Domain::Interval(Span::closed(-0.5, 0.5)));
    }

    #[test]
    fn tangent_poles_are_periodic() {
        let d = domain("tan(x)").unwrap();
        assert!(matches!(d, Domain::PeriodicComplement { .. }));
        assert_eq!(d.contains(FRAC_PI_2), Some(false));
        assert_eq!(d.contains(0.0), Some(true));
        let d = domain("cot(x)").unwrap();
        assert_eq!(d.contains(0.0), Some(false));
        assert_eq!(d.contains(1.0), Some(true));
    }

    #[test]
    fn periodic_holes_in_bounded_span_are_listed() {
        let d = domain("sqrt(4 - x^2)*tan(x)").unwrap();
        assert_eq!(d.contains(FRAC_PI_2), Some(false));
        assert!(matches!(d, Domain::Union(_)));
    }

    #[test]
    fn shapes_without_exact_domain_are_unavailable() {
        assert!(domain("log(sin(x))").is_err());
        assert!(domain("x^x").is_err());
        assert!(domain("sinh(x)").is_err());
    }
}
