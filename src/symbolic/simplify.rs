use crate::expr::{BinOp, Expr};

/// Bottom-up constant folding and identity removal.
///
/// Only rewrites that keep the value identical wherever both sides are
/// defined are applied; `0*u` collapses to `0` the way a CAS does.
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Var(_) => expr.clone(),
        Expr::Neg(a) => match simplify(a) {
            Expr::Num(n) => Expr::Num(-n),
            Expr::Neg(inner) => *inner,
            other => Expr::neg(other),
        },
        Expr::Call(func, a) => {
            let arg = simplify(a);
            let call = Expr::call(*func, arg);
            fold(&call).unwrap_or(call)
        }
        Expr::Binary(op, a, b) => simplify_binary(*op, simplify(a), simplify(b)),
        Expr::Opaque(name, args) => Expr::Opaque(name.clone(), args.iter().map(simplify).collect()),
    }
}

fn simplify_binary(op: BinOp, a: Expr, b: Expr) -> Expr {
    if let (Expr::Num(_), Expr::Num(_)) = (&a, &b) {
        let folded = Expr::binary(op, a.clone(), b.clone());
        if let Some(n) = fold(&folded) {
            return n;
        }
    }
    match op {
        BinOp::Add => match (a, b) {
            (Expr::Num(z), other) | (other, Expr::Num(z)) if z == 0.0 => other,
            (lhs, Expr::Neg(rhs)) => simplify_binary(BinOp::Sub, lhs, *rhs),
            (lhs, rhs) => Expr::binary(BinOp::Add, lhs, rhs),
        },
        BinOp::Sub => match (a, b) {
            (lhs, Expr::Num(z)) if z == 0.0 => lhs,
            (Expr::Num(z), rhs) if z == 0.0 => simplify(&Expr::neg(rhs)),
            (lhs, Expr::Neg(rhs)) => simplify_binary(BinOp::Add, lhs, *rhs),
            (lhs, rhs) if lhs == rhs => Expr::Num(0.0),
            (lhs, rhs) => Expr::binary(BinOp::Sub, lhs, rhs),
        },
        BinOp::Mul => match (a, b) {
            (Expr::Num(z), _) | (_, Expr::Num(z)) if z == 0.0 => Expr::Num(0.0),
            (Expr::Num(one), other) | (other, Expr::Num(one)) if one == 1.0 => other,
            (Expr::Num(m), other) | (other, Expr::Num(m)) if m == -1.0 => simplify(&Expr::neg(other)),
            (Expr::Neg(lhs), Expr::Neg(rhs)) => Expr::binary(BinOp::Mul, *lhs, *rhs),
            (lhs, rhs) => Expr::binary(BinOp::Mul, lhs, rhs),
        },
        BinOp::Div => match (a, b) {
            (lhs, Expr::Num(one)) if one == 1.0 => lhs,
            (lhs, rhs) => Expr::binary(BinOp::Div, lhs, rhs),
        },
        BinOp::Pow => match (a, b) {
            (base, Expr::Num(one)) if one == 1.0 => base,
            (_, Expr::Num(z)) if z == 0.0 => Expr::Num(1.0),
            (Expr::Num(one), _) if one == 1.0 => Expr::Num(1.0),
            (base, exp) => Expr::binary(BinOp::Pow, base, exp),
        },
        BinOp::Rem => Expr::binary(BinOp::Rem, a, b),
    }
}

/// Folds a variable-free node to a finite number.
fn fold(expr: &Expr) -> Option<Expr> {
    if expr.unresolved_name("").is_some() {
        return None;
    }
    expr.eval("", 0.0).ok().filter(|v| v.is_finite()).map(Expr::Num)
}
