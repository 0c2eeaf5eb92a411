use crate::expr::{BinOp, Expr, Func};

use super::simplify::simplify;
use super::{Attempt, Unavailable};

/// Derivative of `expr` with respect to `var`, simplified.
pub fn differentiate(expr: &Expr, var: &str) -> Attempt<Expr> {
    Ok(simplify(&d(expr, var)?))
}

fn num(v: f64) -> Expr {
    Expr::num(v)
}

fn add(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinOp::Add, a, b)
}

fn sub(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinOp::Sub, a, b)
}

fn mul(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinOp::Mul, a, b)
}

fn div(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinOp::Div, a, b)
}

fn pow(a: Expr, b: Expr) -> Expr {
    Expr::binary(BinOp::Pow, a, b)
}

fn d(expr: &Expr, var: &str) -> Attempt<Expr> {
    if !expr.depends_on(var) {
        return Ok(num(0.0));
    }
    let out = match expr {
        Expr::Num(_) => num(0.0),
        Expr::Var(_) => num(1.0),
        Expr::Neg(a) => Expr::neg(d(a, var)?),
        Expr::Binary(op, a, b) => {
            let (a, b) = (a.as_ref(), b.as_ref());
            match op {
                BinOp::Add => add(d(a, var)?, d(b, var)?),
                BinOp::Sub => sub(d(a, var)?, d(b, var)?),
                BinOp::Mul => add(mul(d(a, var)?, b.clone()), mul(a.clone(), d(b, var)?)),
                BinOp::Div => div(
                    sub(mul(d(a, var)?, b.clone()), mul(a.clone(), d(b, var)?)),
                    pow(b.clone(), num(2.0)),
                ),
                BinOp::Pow => d_pow(a, b, var)?,
                BinOp::Rem => return Err(Unavailable::Unsupported("remainder has no derivative rule")),
            }
        }
        Expr::Call(func, a) => {
            let inner = a.as_ref().clone();
            let outer = match func {
                Func::Sin => Expr::call(Func::Cos, inner),
                Func::Cos => Expr::neg(Expr::call(Func::Sin, inner)),
                Func::Tan => add(num(1.0), pow(Expr::call(Func::Tan, inner), num(2.0))),
                Func::Cot => Expr::neg(add(num(1.0), pow(Expr::call(Func::Cot, inner), num(2.0)))),
                Func::Asin => div(
                    num(1.0),
                    Expr::call(Func::Sqrt, sub(num(1.0), pow(inner, num(2.0)))),
                ),
                Func::Acos => Expr::neg(div(
                    num(1.0),
                    Expr::call(Func::Sqrt, sub(num(1.0), pow(inner, num(2.0)))),
                )),
                Func::Atan => div(num(1.0), add(num(1.0), pow(inner, num(2.0)))),
                Func::Sqrt => div(num(1.0), mul(num(2.0), Expr::call(Func::Sqrt, inner))),
                Func::Log => div(num(1.0), inner),
                Func::Exp => Expr::call(Func::Exp, inner),
                Func::Abs => div(inner.clone(), Expr::call(Func::Abs, inner)),
            };
            mul(outer, d(a, var)?)
        }
        Expr::Opaque(..) => return Err(Unavailable::Unsupported("unknown function")),
    };
    Ok(out)
}

fn d_pow(base: &Expr, exp: &Expr, var: &str) -> Attempt<Expr> {
    if !exp.depends_on(var) {
        // c*u**(c - 1)*u'
        let lowered = simplify(&sub(exp.clone(), num(1.0)));
        return Ok(mul(
            mul(exp.clone(), pow(base.clone(), lowered)),
            d(base, var)?,
        ));
    }
    if !base.depends_on(var) {
        // a**v*log(a)*v'
        return Ok(mul(
            mul(pow(base.clone(), exp.clone()), Expr::call(Func::Log, base.clone())),
            d(exp, var)?,
        ));
    }
    // u**v*(v'*log(u) + v*u'/u)
    Ok(mul(
        pow(base.clone(), exp.clone()),
        add(
            mul(d(exp, var)?, Expr::call(Func::Log, base.clone())),
            div(mul(exp.clone(), d(base, var)?), base.clone()),
        ),
    ))
}
