//! Bracket-and-bisect root finding plus the uniform scan that feeds it.
//!
//! The scan splits an interval into `N` equal sub-intervals and treats every
//! sign change between adjacent finite samples as a bracket. Roots closer
//! together than one sub-interval can be missed; that is the accepted cost of
//! a fixed grid.

use crate::config::ToleranceConfig;
use crate::evaluator::is_valid;
use crate::interval::Interval;

/// Stopping rule shared by every refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Bisection {
            tolerance: 1e-6,
            max_iterations: 50,
        }
    }
}

impl Bisection {
    pub fn from_config(tolerance: &ToleranceConfig) -> Self {
        Bisection {
            tolerance: tolerance.root,
            max_iterations: tolerance.max_bisect_iterations,
        }
    }

    /// Refines a root of `g` inside `[a, b]`.
    ///
    /// Expects `g(a)·g(b) < 0` or `|g(a)|` already under tolerance. When the
    /// iteration budget runs out the last midpoint is returned.
    pub fn refine<F>(&self, g: F, a: f64, b: f64) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = g(a);
        if fa.abs() < self.tolerance {
            return a;
        }
        for _ in 0..self.max_iterations {
            let c = (a + b) / 2.0;
            let fc = g(c);
            if fc.abs() < self.tolerance || (b - a) / 2.0 < self.tolerance {
                return c;
            }
            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
        }
        (a + b) / 2.0
    }

    /// Scans `interval` in `parts` sub-intervals and returns every root found,
    /// in scan order. Samples with `|g|` under tolerance are taken as roots
    /// directly; non-finite samples never form a bracket.
    pub fn scan<F>(&self, g: F, interval: &Interval, parts: usize) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        let mut roots = Vec::new();
        if parts == 0 {
            return roots;
        }
        let step = interval.step(parts);
        for i in 0..parts {
            let x1 = interval.lo() + i as f64 * step;
            let x2 = x1 + step;
            let y1 = g(x1);
            let y2 = g(x2);
            if !(is_valid(y1) && is_valid(y2)) {
                continue;
            }
            if y1 * y2 < 0.0 {
                roots.push(self.refine(&g, x1, x2));
            } else if y1.abs() < self.tolerance {
                roots.push(x1);
            }
        }
        roots
    }
}

/// Rounds to `decimals` places.
pub(crate) fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

/// Rounds to 4 decimals, drops duplicates and sorts ascending.
pub(crate) fn dedup_rounded(values: Vec<f64>) -> Vec<f64> {
    let mut rounded: Vec<f64> = values.into_iter().map(|v| round_to(v, 4)).collect();
    rounded.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    rounded.dedup();
    rounded
}
