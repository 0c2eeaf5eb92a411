//! Owned expression tree built from meval's RPN token stream.
//!
//! meval does the tokenising and operator-precedence work; the tree is
//! evaluated here so that division by zero and math domain violations can be
//! told apart from ordinary IEEE results.

use std::f64::consts::{E, PI};
use std::fmt;

use meval::tokenizer::{Operation, Token};

use crate::error::{Error, Result};

/// Functions the evaluation namespace resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Log,
    Exp,
    Abs,
}

impl Func {
    pub const ALL: [Func; 11] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Cot,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sqrt,
        Func::Log,
        Func::Exp,
        Func::Abs,
    ];

    pub fn from_name(name: &str) -> Option<Func> {
        Func::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sqrt => "sqrt",
            Func::Log => "log",
            Func::Exp => "exp",
            Func::Abs => "abs",
        }
    }

    /// Applies the function, flagging math domain violations.
    fn apply(self, a: f64) -> std::result::Result<f64, Fault> {
        if a.is_nan() {
            return Ok(f64::NAN);
        }
        let out = match self {
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Cot => {
                let t = a.tan();
                if t == 0.0 {
                    return Err(Fault::DivisionByZero);
                }
                1.0 / t
            }
            Func::Asin => a.asin(),
            Func::Acos => a.acos(),
            Func::Atan => a.atan(),
            Func::Sqrt => a.sqrt(),
            Func::Log if a <= 0.0 => return Err(Fault::Domain),
            Func::Log => a.ln(),
            Func::Exp => {
                let v = a.exp();
                if v.is_infinite() && a.is_finite() {
                    return Err(Fault::Overflow);
                }
                v
            }
            Func::Abs => a.abs(),
        };
        if out.is_nan() {
            return Err(Fault::Domain);
        }
        Ok(out)
    }
}

/// Binary operators of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => " + ",
            BinOp::Sub => " - ",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => " % ",
            BinOp::Pow => "**",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 2,
            BinOp::Pow => 4,
        }
    }
}

/// Why an evaluation did not produce an ordinary number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    DivisionByZero,
    Domain,
    Overflow,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
    /// A function the namespace does not know, or a known one with the wrong arity.
    Opaque(String, Vec<Expr>),
}

impl Expr {
    // =========================================================================
    // CONSTRUCTION
    // =========================================================================

    /// Parses meval-dialect text (`^` for powers).
    pub fn parse(meval_text: &str) -> Result<Expr> {
        let parsed: meval::Expr = meval_text.parse().map_err(|e: meval::Error| Error::Parse {
            expr: meval_text.to_string(),
            reason: e.to_string(),
        })?;
        Expr::from_rpn(&parsed).map_err(|reason| Error::Parse {
            expr: meval_text.to_string(),
            reason: reason.to_string(),
        })
    }

    fn from_rpn(tokens: &[Token]) -> std::result::Result<Expr, &'static str> {
        let mut stack: Vec<Expr> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token {
                Token::Number(n) => stack.push(Expr::Num(*n)),
                Token::Var(name) => stack.push(Expr::Var(name.clone())),
                Token::Unary(op) => {
                    let arg = stack.pop().ok_or("operator is missing its operand")?;
                    stack.push(match op {
                        Operation::Minus => Expr::Neg(Box::new(arg)),
                        Operation::Plus => arg,
                        _ => return Err("unsupported unary operator"),
                    });
                }
                Token::Binary(op) => {
                    let rhs = stack.pop().ok_or("operator is missing its right operand")?;
                    let lhs = stack.pop().ok_or("operator is missing its left operand")?;
                    let op = match op {
                        Operation::Plus => BinOp::Add,
                        Operation::Minus => BinOp::Sub,
                        Operation::Times => BinOp::Mul,
                        Operation::Div => BinOp::Div,
                        Operation::Rem => BinOp::Rem,
                        Operation::Pow => BinOp::Pow,
                    };
                    stack.push(Expr::Binary(op, Box::new(lhs), Box::new(rhs)));
                }
                Token::Func(name, Some(arity)) => {
                    if stack.len() < *arity {
                        return Err("function is missing arguments");
                    }
                    let mut args = stack.split_off(stack.len() - arity);
                    let known = Func::from_name(name);
                    match (known, args.len()) {
                        (Some(func), 1) => {
                            let arg = args.pop().ok_or("function is missing arguments")?;
                            stack.push(Expr::Call(func, Box::new(arg)));
                        }
                        _ => stack.push(Expr::Opaque(name.clone(), args)),
                    }
                }
                _ => return Err("unbalanced token stream"),
            }
        }
        match (stack.pop(), stack.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err("expression does not reduce to a single value"),
        }
    }

    pub fn num(v: f64) -> Expr {
        Expr::Num(v)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn call(func: Func, arg: Expr) -> Expr {
        Expr::Call(func, Box::new(arg))
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn neg(inner: Expr) -> Expr {
        Expr::Neg(Box::new(inner))
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Num(_) | Expr::Var(_) => 1,
            Expr::Neg(a) | Expr::Call(_, a) => 1 + a.node_count(),
            Expr::Binary(_, a, b) => 1 + a.node_count() + b.node_count(),
            Expr::Opaque(_, args) => 1 + args.iter().map(Expr::node_count).sum::<usize>(),
        }
    }

    /// True when `var` occurs anywhere in the tree.
    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Var(name) => name == var,
            Expr::Neg(a) | Expr::Call(_, a) => a.depends_on(var),
            Expr::Binary(_, a, b) => a.depends_on(var) || b.depends_on(var),
            Expr::Opaque(_, args) => args.iter().any(|a| a.depends_on(var)),
        }
    }

    /// First name that neither `var` nor a constant resolves, including unknown functions.
    pub fn unresolved_name(&self, var: &str) -> Option<String> {
        match self {
            Expr::Num(_) => None,
            Expr::Var(name) if name == var || constant(name).is_some() => None,
            Expr::Var(name) => Some(name.clone()),
            Expr::Neg(a) | Expr::Call(_, a) => a.unresolved_name(var),
            Expr::Binary(_, a, b) => a.unresolved_name(var).or_else(|| b.unresolved_name(var)),
            Expr::Opaque(name, _) => Some(name.clone()),
        }
    }

    /// Numeric value of a subtree that does not mention `var`.
    pub fn constant_value(&self, var: &str) -> Option<f64> {
        if self.depends_on(var) {
            return None;
        }
        self.eval(var, 0.0).ok().filter(|v| v.is_finite())
    }

    // =========================================================================
    // EVALUATION
    // =========================================================================

    /// Evaluates with `var` bound to `at`.
    pub fn eval(&self, var: &str, at: f64) -> std::result::Result<f64, Fault> {
        match self {
            Expr::Num(n) => Ok(*n),
            Expr::Var(name) if name == var => Ok(at),
            Expr::Var(name) => constant(name).ok_or(Fault::Unresolved),
            Expr::Neg(a) => Ok(-a.eval(var, at)?),
            Expr::Call(func, a) => func.apply(a.eval(var, at)?),
            Expr::Binary(op, a, b) => {
                let l = a.eval(var, at)?;
                let r = b.eval(var, at)?;
                apply_binary(*op, l, r)
            }
            Expr::Opaque(..) => Err(Fault::Unresolved),
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

fn apply_binary(op: BinOp, l: f64, r: f64) -> std::result::Result<f64, Fault> {
    match op {
        BinOp::Add => Ok(l + r),
        BinOp::Sub => Ok(l - r),
        BinOp::Mul => Ok(l * r),
        BinOp::Div if r == 0.0 => Err(Fault::DivisionByZero),
        BinOp::Div => Ok(l / r),
        BinOp::Rem if r == 0.0 => Err(Fault::DivisionByZero),
        BinOp::Rem => {
            // Result takes the sign of the divisor.
            let m = l % r;
            if m != 0.0 && (m < 0.0) != (r < 0.0) {
                Ok(m + r)
            } else {
                Ok(m)
            }
        }
        BinOp::Pow => {
            if l == 0.0 && r < 0.0 {
                return Err(Fault::DivisionByZero);
            }
            let v = l.powf(r);
            if v.is_nan() && !l.is_nan() && !r.is_nan() {
                // Negative base with a fractional exponent has no real value.
                return Err(Fault::Domain);
            }
            if v.is_infinite() && l.is_finite() && r.is_finite() {
                return Err(Fault::Overflow);
            }
            Ok(v)
        }
    }
}

// =============================================================================
// DISPLAY
// =============================================================================

const PREC_UNARY: u8 = 3;
const PREC_ATOM: u8 = 5;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Num(n) if *n < 0.0 => PREC_UNARY,
            Expr::Binary(op, ..) => op.precedence(),
            Expr::Neg(_) => PREC_UNARY,
            _ => PREC_ATOM,
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Num(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Neg(a) => {
                write!(f, "-")?;
                a.write_operand(f, PREC_UNARY + 1)
            }
            Expr::Call(func, a) => write!(f, "{}({})", func.name(), a),
            Expr::Opaque(name, args) => {
                let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, parts.join(", "))
            }
            Expr::Binary(op, a, b) => {
                let p = op.precedence();
                match op {
                    // Right-associative.
                    BinOp::Pow => {
                        a.write_operand(f, p + 1)?;
                        write!(f, "{}", op.symbol())?;
                        b.write_operand(f, p)
                    }
                    _ => {
                        a.write_operand(f, p)?;
                        write!(f, "{}", op.symbol())?;
                        b.write_operand(f, p + 1)
                    }
                }
            }
        }
    }
}
