use crate::expr::{BinOp, Expr, Func};

/// Symmetry of a subtree under `x → -x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Even,
    Odd,
    Neither,
}

use Symmetry::*;

/// Structural symmetry inference.
///
/// Only identities that hold wherever the expression is defined are used,
/// so `Even` and `Odd` are proofs; `Neither` only means nothing was proven.
pub fn symmetry(expr: &Expr, var: &str) -> Symmetry {
    if !expr.depends_on(var) {
        return Even;
    }
    match expr {
        Expr::Num(_) => Even,
        Expr::Var(_) => Odd,
        Expr::Neg(a) => symmetry(a, var),
        Expr::Binary(op, a, b) => {
            let (sa, sb) = (symmetry(a, var), symmetry(b, var));
            match op {
                BinOp::Add | BinOp::Sub => match (sa, sb) {
                    (Even, Even) => Even,
                    (Odd, Odd) => Odd,
                    _ => Neither,
                },
                BinOp::Mul | BinOp::Div => match (sa, sb) {
                    (Even, Even) | (Odd, Odd) => Even,
                    (Even, Odd) | (Odd, Even) => Odd,
                    _ => Neither,
                },
                BinOp::Pow => power(sa, sb, b, var),
                BinOp::Rem => Neither,
            }
        }
        Expr::Call(func, a) => {
            let inner = symmetry(a, var);
            match func {
                Func::Sin | Func::Tan | Func::Cot | Func::Asin | Func::Atan => inner,
                Func::Cos | Func::Abs => match inner {
                    Neither => Neither,
                    _ => Even,
                },
                Func::Sqrt | Func::Log | Func::Exp | Func::Acos => match inner {
                    Even => Even,
                    _ => Neither,
                },
            }
        }
        Expr::Opaque(..) => Neither,
    }
}

fn power(base: Symmetry, exp: Symmetry, exp_expr: &Expr, var: &str) -> Symmetry {
    match exp_expr.constant_value(var) {
        Some(c) => match base {
            Even => Even,
            Odd if c.fract() == 0.0 && c.rem_euclid(2.0) == 0.0 => Even,
            Odd if c.fract() == 0.0 => Odd,
            _ => Neither,
        },
        None if base == Even && exp == Even => Even,
        None => Neither,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(text: &str) -> Symmetry {
        symmetry(&Expr::parse(text).unwrap(), "x")
    }

    #[test]
    fn polynomial_parity() {
        assert_eq!(sym("x^2 - 4"), Even);
        assert_eq!(sym("x^3 - 3*x"), Odd);
        assert_eq!(sym("x^3 + 1"), Neither);
        assert_eq!(sym("7"), Even);
    }

    #[test]
    fn function_parity() {
        assert_eq!(sym("sin(x)"), Odd);
        assert_eq!(sym("cos(x)"), Even);
        assert_eq!(sym("x*sin(x)"), Even);
        assert_eq!(sym("tan(x)/x"), Even);
        assert_eq!(sym("abs(x)"), Even);
        assert_eq!(sym("exp(x^2)"), Even);
        assert_eq!(sym("exp(x)"), Neither);
        assert_eq!(sym("sin(x + 1)"), Neither);
    }

    #[test]
    fn fractional_power_of_odd_base_is_unproven() {
        assert_eq!(sym("x^0.5"), Neither);
        assert_eq!(sym("(x^2)^0.5"), Even);
    }
}
