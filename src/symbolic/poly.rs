//! Exact polynomials and rational functions over `Ratio<i64>`.
//!
//! Every coefficient operation is checked; an overflow abandons the exact
//! path instead of wrapping.

use std::cmp::Ordering;

use num_rational::Ratio;
use num_traits::{checked_pow, CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Signed, Zero};

use crate::expr::{BinOp, Expr};

use super::{Attempt, Unavailable};

pub type Q = Ratio<i64>;

/// Largest integer exponent expanded exactly.
const MAX_EXPONENT: i64 = 12;
/// Decimal places kept when reading a float literal as a fraction.
const MAX_DECIMALS: usize = 12;
const MAX_BISECTIONS: usize = 200;

fn overflow<T>(value: Option<T>) -> Attempt<T> {
    value.ok_or(Unavailable::Overflow)
}

pub(crate) fn to_f64(q: &Q) -> f64 {
    *q.numer() as f64 / *q.denom() as f64
}

/// Reads a finite literal as an exact decimal fraction.
pub(crate) fn rational_from_f64(v: f64) -> Option<Q> {
    if !v.is_finite() {
        return None;
    }
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        return Some(Q::from_integer(v as i64));
    }
    let text = format!("{}", v.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if frac.len() > MAX_DECIMALS {
        return None;
    }
    let scale: i64 = checked_pow(10i64, frac.len())?;
    let digits: i64 = format!("{whole}{frac}").parse().ok()?;
    let q = Q::new(digits, scale);
    Some(if v < 0.0 { -q } else { q })
}

// =============================================================================
// POLYNOMIAL
// =============================================================================

/// Coefficients in ascending powers; never carries trailing zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<Q>,
}

impl Poly {
    pub fn zero() -> Poly {
        Poly { coeffs: Vec::new() }
    }

    pub fn constant(q: Q) -> Poly {
        Poly { coeffs: vec![q] }.trimmed()
    }

    pub fn x() -> Poly {
        Poly {
            coeffs: vec![Q::zero(), Q::one()],
        }
    }

    pub fn from_coeffs(coeffs: Vec<Q>) -> Poly {
        Poly { coeffs }.trimmed()
    }

    fn trimmed(mut self) -> Poly {
        while self.coeffs.last().map_or(false, Zero::is_zero) {
            self.coeffs.pop();
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn coeff(&self, power: usize) -> Q {
        self.coeffs.get(power).copied().unwrap_or_else(Q::zero)
    }

    pub fn leading(&self) -> Q {
        self.coeffs.last().copied().unwrap_or_else(Q::zero)
    }

    pub fn as_constant(&self) -> Option<Q> {
        match self.degree() {
            None => Some(Q::zero()),
            Some(0) => Some(self.coeffs[0]),
            _ => None,
        }
    }

    pub fn checked_add(&self, other: &Poly) -> Attempt<Poly> {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(overflow(self.coeff(i).checked_add(&other.coeff(i)))?);
        }
        Ok(Poly::from_coeffs(out))
    }

    pub fn checked_sub(&self, other: &Poly) -> Attempt<Poly> {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(overflow(self.coeff(i).checked_sub(&other.coeff(i)))?);
        }
        Ok(Poly::from_coeffs(out))
    }

    pub fn checked_mul(&self, other: &Poly) -> Attempt<Poly> {
        if self.is_zero() || other.is_zero() {
            return Ok(Poly::zero());
        }
        let mut out = vec![Q::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                let term = overflow(a.checked_mul(b))?;
                out[i + j] = overflow(out[i + j].checked_add(&term))?;
            }
        }
        Ok(Poly::from_coeffs(out))
    }

    pub fn scale(&self, q: &Q) -> Attempt<Poly> {
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| overflow(c.checked_mul(q)))
            .collect::<Attempt<Vec<Q>>>()?;
        Ok(Poly::from_coeffs(coeffs))
    }

    pub fn neg(&self) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }

    pub fn checked_pow(&self, n: u32) -> Attempt<Poly> {
        let mut out = Poly::constant(Q::one());
        for _ in 0..n {
            out = out.checked_mul(self)?;
        }
        Ok(out)
    }

    pub fn derivative(&self) -> Attempt<Poly> {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| overflow(c.checked_mul(&Q::from_integer(i as i64))))
            .collect::<Attempt<Vec<Q>>>()?;
        Ok(Poly::from_coeffs(coeffs))
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + to_f64(c))
    }

    // =========================================================================
    // REAL ROOTS
    // =========================================================================

    /// Every distinct real root, ascending.
    ///
    /// Degrees up to two are solved in closed form with an exact
    /// discriminant. Higher degrees are isolated between the real roots of
    /// the derivative and refined by bisection.
    pub fn real_roots(&self) -> Attempt<Vec<f64>> {
        if self.is_zero() {
            return Err(Unavailable::Unsupported("identically zero polynomial"));
        }
        let shift = self.coeffs.iter().take_while(|c| c.is_zero()).count();
        let mut roots = if shift > 0 { vec![0.0] } else { Vec::new() };
        let reduced = Poly::from_coeffs(self.coeffs[shift..].to_vec());

        match reduced.degree() {
            Some(1) => roots.push(to_f64(&overflow((-reduced.coeff(0)).checked_div(&reduced.coeff(1)))?)),
            Some(2) => roots.extend(reduced.quadratic_roots()?),
            Some(0) => {}
            Some(_) => roots.extend(reduced.isolated_roots()?),
            None => {}
        }

        roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        roots.dedup_by(|a, b| (*a - *b).abs() <= 1e-12 * (1.0 + b.abs()));
        Ok(roots)
    }

    fn quadratic_roots(&self) -> Attempt<Vec<f64>> {
        let (c, b, a) = (self.coeff(0), self.coeff(1), self.coeff(2));
        let b2 = overflow(b.checked_mul(&b))?;
        let ac4 = overflow(Q::from_integer(4).checked_mul(&a).and_then(|v| v.checked_mul(&c)))?;
        let disc = overflow(b2.checked_sub(&ac4))?;

        let (a, b, c) = (to_f64(&a), to_f64(&b), to_f64(&c));
        if disc.is_negative() {
            return Ok(Vec::new());
        }
        if disc.is_zero() {
            return Ok(vec![-b / (2.0 * a)]);
        }
        // Stable form: avoids cancellation when b*b dominates 4ac.
        let root = to_f64(&disc).sqrt();
        let q = -0.5 * (b + b.signum() * root);
        if q == 0.0 {
            let r = (-c / a).sqrt();
            return Ok(vec![-r, r]);
        }
        Ok(vec![q / a, c / q])
    }

    fn isolated_roots(&self) -> Attempt<Vec<f64>> {
        let lead = to_f64(&self.leading());
        let n = self.coeffs.len() - 1;
        let bound = 1.0
            + self.coeffs[..n]
                .iter()
                .map(|c| (to_f64(c) / lead).abs())
                .fold(0.0, f64::max);

        let mut knots = vec![-bound];
        knots.extend(self.derivative()?.real_roots()?.into_iter().filter(|c| c.abs() < bound));
        knots.push(bound);

        let magnitude: f64 = self.coeffs.iter().map(|c| to_f64(c).abs()).sum();
        let mut roots = Vec::new();
        for pair in knots.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (fa, fb) = (self.eval(a), self.eval(b));
            if fa.abs() <= 1e-12 * magnitude * a.abs().max(1.0).powi(n as i32) {
                // Touching root at a critical point.
                roots.push(a);
            } else if fa * fb < 0.0 {
                roots.push(self.bisect(a, b, fa));
            }
        }
        Ok(roots)
    }

    fn bisect(&self, mut a: f64, mut b: f64, mut fa: f64) -> f64 {
        for _ in 0..MAX_BISECTIONS {
            let m = 0.5 * (a + b);
            if m <= a || m >= b {
                break;
            }
            let fm = self.eval(m);
            if fm == 0.0 {
                return m;
            }
            if (fa < 0.0) == (fm < 0.0) {
                a = m;
                fa = fm;
            } else {
                b = m;
            }
        }
        0.5 * (a + b)
    }
}

// =============================================================================
// RATIONAL FUNCTION
// =============================================================================

/// `num / den` with `den` nonzero. A constant denominator is folded into the
/// numerator, so polynomials always carry `den == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFn {
    pub num: Poly,
    pub den: Poly,
}

impl RationalFn {
    fn polynomial(num: Poly) -> RationalFn {
        RationalFn {
            num,
            den: Poly::constant(Q::one()),
        }
    }

    fn normalized(num: Poly, den: Poly) -> Attempt<RationalFn> {
        match den.as_constant() {
            Some(c) if c.is_zero() => Err(Unavailable::Unsupported("division by the zero polynomial")),
            Some(c) => Ok(RationalFn::polynomial(num.scale(&c.recip())?)),
            None => Ok(RationalFn { num, den }),
        }
    }

    /// Reads `expr` as a rational function of `var` with exact coefficients.
    ///
    /// Named constants such as `pi` are irrational and end the attempt.
    pub fn from_expr(expr: &Expr, var: &str) -> Attempt<RationalFn> {
        match expr {
            Expr::Num(v) => rational_from_f64(*v)
                .map(|q| RationalFn::polynomial(Poly::constant(q)))
                .ok_or(Unavailable::Unsupported("literal has no short decimal form")),
            Expr::Var(name) if name == var => Ok(RationalFn::polynomial(Poly::x())),
            Expr::Var(_) => Err(Unavailable::Unsupported("irrational constant")),
            Expr::Neg(a) => {
                let a = RationalFn::from_expr(a, var)?;
                Ok(RationalFn { num: a.num.neg(), den: a.den })
            }
            Expr::Binary(op, a, b) => {
                if *op == BinOp::Pow {
                    return RationalFn::from_power(a, b, var);
                }
                let a = RationalFn::from_expr(a, var)?;
                let b = RationalFn::from_expr(b, var)?;
                match op {
                    BinOp::Add | BinOp::Sub => {
                        let (lhs, rhs, den) = if a.den == b.den {
                            (a.num, b.num, a.den)
                        } else {
                            (a.num.checked_mul(&b.den)?, b.num.checked_mul(&a.den)?, a.den.checked_mul(&b.den)?)
                        };
                        let num = if *op == BinOp::Add {
                            lhs.checked_add(&rhs)?
                        } else {
                            lhs.checked_sub(&rhs)?
                        };
                        RationalFn::normalized(num, den)
                    }
                    BinOp::Mul => RationalFn::normalized(a.num.checked_mul(&b.num)?, a.den.checked_mul(&b.den)?),
                    BinOp::Div => {
                        if b.num.is_zero() {
                            return Err(Unavailable::Unsupported("division by the zero polynomial"));
                        }
                        RationalFn::normalized(a.num.checked_mul(&b.den)?, a.den.checked_mul(&b.num)?)
                    }
                    _ => Err(Unavailable::Unsupported("not a rational function")),
                }
            }
            _ => Err(Unavailable::Unsupported("not a rational function")),
        }
    }

    fn from_power(base: &Expr, exp: &Expr, var: &str) -> Attempt<RationalFn> {
        let n = match exp {
            Expr::Num(v) if v.fract() == 0.0 && v.abs() <= MAX_EXPONENT as f64 => *v as i64,
            _ => return Err(Unavailable::Unsupported("not an integer power")),
        };
        let base = RationalFn::from_expr(base, var)?;
        let k = n.unsigned_abs() as u32;
        let (num, den) = (base.num.checked_pow(k)?, base.den.checked_pow(k)?);
        if n >= 0 {
            RationalFn::normalized(num, den)
        } else if num.is_zero() {
            Err(Unavailable::Unsupported("zero raised to a negative power"))
        } else {
            RationalFn::normalized(den, num)
        }
    }

    /// The numerator when the denominator is constant.
    pub fn as_polynomial(&self) -> Option<&Poly> {
        match self.den.degree() {
            Some(0) => Some(&self.num),
            _ => None,
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.num.eval(x) / self.den.eval(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rational(text: &str) -> Attempt<RationalFn> {
        RationalFn::from_expr(&Expr::parse(text).unwrap(), "x")
    }

    fn roots(text: &str) -> Vec<f64> {
        rational(text).unwrap().num.real_roots().unwrap()
    }

    fn assert_roots(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn monomials_and_constants() {
        assert_roots(&roots("x^2"), &[0.0]);
        assert_roots(&roots("2*x"), &[0.0]);
        assert_roots(&roots("x^3"), &[0.0]);
        assert_roots(&roots("x^4 - x^2"), &[-1.0, 0.0, 1.0]);
        assert!(roots("7").is_empty());
        assert!(rational("1/x").unwrap().num.real_roots().unwrap().is_empty());
    }

    #[test]
    fn decimal_literals_are_exact() {
        assert_eq!(rational_from_f64(0.1), Some(Q::new(1, 10)));
        assert_eq!(rational_from_f64(-2.5), Some(Q::new(-5, 2)));
        assert_eq!(rational_from_f64(7.0), Some(Q::from_integer(7)));
        assert_eq!(rational_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn expands_products_and_powers() {
        let p = rational("(x+1)*(x-1)").unwrap();
        assert_eq!(p.as_polynomial().unwrap(), &Poly::from_coeffs(vec![Q::from_integer(-1), Q::zero(), Q::one()]));
        let p = rational("(x - 1)^3/2").unwrap();
        assert_eq!(p.as_polynomial().unwrap().degree(), Some(3));
        assert_eq!(p.as_polynomial().unwrap().leading(), Q::new(1, 2));
    }

    #[test]
    fn rational_functions_keep_denominator() {
        let r = rational("(x^2 - 1)/(x - 2)").unwrap();
        assert!(r.as_polynomial().is_none());
        assert_eq!(r.den.degree(), Some(1));
        assert!((r.eval(3.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn transcendental_terms_are_unsupported() {
        assert!(rational("sin(x) + 1").is_err());
        assert!(rational("pi*x").is_err());
        assert!(rational("x^0.5").is_err());
        assert!(rational("x^x").is_err());
    }

    #[test]
    fn low_degree_roots() {
        assert_roots(&roots("x^2 - 4"), &[-2.0, 2.0]);
        assert_roots(&roots("x^2 + 1"), &[]);
        assert_roots(&roots("x^2 - 2*x + 1"), &[1.0]);
        assert_roots(&roots("3*x - 1"), &[1.0 / 3.0]);
        assert_roots(&roots("x^2 - 2"), &[-2f64.sqrt(), 2f64.sqrt()]);
    }

    #[test]
    fn higher_degree_roots() {
        assert_roots(&roots("x^3 - x"), &[-1.0, 0.0, 1.0]);
        assert_roots(&roots("(x-1)*(x-2)*(x-3)*(x+4)"), &[-4.0, 1.0, 2.0, 3.0]);
        assert_roots(&roots("x^4 + 1"), &[]);
        assert_roots(&roots("(x - 2)^2*(x + 1)"), &[-1.0, 2.0]);
        assert_roots(&roots("x^5 - 32"), &[2.0]);
    }

    #[test]
    fn overflow_is_reported() {
        let r = rational("(123456789*x + 987654321)^12");
        assert_eq!(r, Err(Unavailable::Overflow));
    }
}
