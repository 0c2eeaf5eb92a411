//! Symbolic adapter: exact derivatives, zeros, continuity domain and parity.
//!
//! Every operation either returns an exact answer or a typed
//! [`Unavailable`]. A caller treats `Unavailable` as "use the numeric
//! strategy"; nothing here panics or bubbles up as a user-facing error.
//!
//! Coverage: rational functions with decimal
//! coefficients, the registered elementary functions of linear or
//! rational arguments, and products or quotients of those.

mod derive;
mod domain;
mod parity;
mod poly;
mod simplify;
mod solve;

use std::fmt;

use crate::config::SymbolicConfig;
use crate::evaluator::evaluate;
use crate::expr::Expr;
use crate::interval::{Domain, Interval};
use crate::normalize::CanonicalExpression;
use crate::report::Parity;
use crate::roots::dedup_rounded;

pub use self::parity::Symmetry;
pub use self::poly::{Poly, RationalFn};
pub use self::solve::ZeroSet;

/// Why a symbolic operation gave no answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unavailable {
    /// Symbolic analysis is switched off in the configuration.
    #[error("symbolic analysis is disabled")]
    Disabled,
    /// The expression tree is larger than the configured limit.
    #[error("expression has {nodes} nodes, above the limit of {limit}")]
    TooLarge { nodes: usize, limit: usize },
    /// A name that is neither the variable, a constant nor a known function.
    #[error("`{0}` is not a known variable, constant or function")]
    UnresolvedName(String),
    /// The shape is outside what the exact layer handles.
    #[error("{0}")]
    Unsupported(&'static str),
    /// Exact coefficient arithmetic left the `i64` range.
    #[error("exact coefficients overflowed")]
    Overflow,
}

pub type Attempt<T> = std::result::Result<T, Unavailable>;

/// Gatekeeper that lifts canonical expressions into symbolic form.
#[derive(Debug, Clone)]
pub struct SymbolicBackend {
    enabled: bool,
    node_limit: usize,
}

impl SymbolicBackend {
    pub fn new(config: &SymbolicConfig) -> Self {
        SymbolicBackend {
            enabled: config.enabled,
            node_limit: config.node_limit,
        }
    }

    pub fn lift(&self, canonical: &CanonicalExpression, var: &str) -> Attempt<SymbolicForm> {
        if !self.enabled {
            return Err(Unavailable::Disabled);
        }
        let tree = canonical.tree();
        let nodes = tree.node_count();
        if nodes > self.node_limit {
            return Err(Unavailable::TooLarge {
                nodes,
                limit: self.node_limit,
            });
        }
        if let Some(name) = tree.unresolved_name(var) {
            return Err(Unavailable::UnresolvedName(name));
        }
        Ok(SymbolicForm {
            expr: simplify::simplify(tree),
            var: var.to_string(),
        })
    }
}

impl Default for SymbolicBackend {
    fn default() -> Self {
        SymbolicBackend::new(&SymbolicConfig::default())
    }
}

/// Leading coefficient and vertex abscissa of a degree-2 polynomial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub leading: f64,
    pub vertex: f64,
}

/// An expression in one variable, simplified and ready for exact queries.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicForm {
    expr: Expr,
    var: String,
}

impl SymbolicForm {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    /// Numeric value under the evaluator's fault policy.
    pub fn value_at(&self, at: f64) -> f64 {
        evaluate(&self.expr, &self.var, at)
    }

    pub fn derivative(&self) -> Attempt<SymbolicForm> {
        Ok(SymbolicForm {
            expr: derive::differentiate(&self.expr, &self.var)?,
            var: self.var.clone(),
        })
    }

    /// Real zeros inside `interval`, verified against the expression,
    /// rounded to 4 decimals and sorted.
    pub fn real_zeros(&self, interval: &Interval) -> Attempt<Vec<f64>> {
        let candidates = solve::zero_set(&self.expr, &self.var)?.within(interval)?;
        let verified = candidates
            .into_iter()
            .filter(|&x| {
                let y = self.value_at(x);
                y.is_finite() && y.abs() <= 1e-6
            })
            .collect();
        Ok(dedup_rounded(verified))
    }

    pub fn continuity_domain(&self) -> Attempt<Domain> {
        domain::continuity_domain(&self.expr, &self.var)
    }

    /// Even is tried before odd, so the zero function is even.
    pub fn parity(&self) -> Attempt<Parity> {
        match parity::symmetry(&self.expr, &self.var) {
            Symmetry::Even => Ok(Parity::Even),
            Symmetry::Odd => Ok(Parity::Odd),
            Symmetry::Neither => Err(Unavailable::Unsupported("no symmetry identity applies")),
        }
    }

    /// Recognises `a*x**2 + b*x + c` with `a ≠ 0`.
    pub fn quadratic(&self) -> Attempt<Quadratic> {
        let rational = RationalFn::from_expr(&self.expr, &self.var)?;
        let poly = rational
            .as_polynomial()
            .filter(|p| p.degree() == Some(2))
            .ok_or(Unavailable::Unsupported("not a quadratic polynomial"))?;
        let slope = poly.derivative()?;
        let vertex = slope
            .real_roots()?
            .first()
            .copied()
            .ok_or(Unavailable::Unsupported("quadratic without a vertex"))?;
        Ok(Quadratic {
            leading: poly::to_f64(&poly.leading()),
            vertex,
        })
    }
}

impl fmt::Display for SymbolicForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}
