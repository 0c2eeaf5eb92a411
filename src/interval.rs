use std::f64::{INFINITY, NEG_INFINITY};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// CONFIGURATION
// =============================================================================
const ZERO_THRESHOLD: f64 = 1e-10;
const SAME_POINT: f64 = 1e-9;

// =============================================================================
// ANALYSIS INTERVAL
// =============================================================================

/// Closed analysis range `[lo, hi]` with finite `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::InvalidInterval { lo, hi });
        }
        Ok(Interval { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// True when the interval is symmetric about zero within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (self.lo + self.hi).abs() <= tol
    }

    /// Width of one of `parts` equal sub-intervals.
    pub fn step(&self, parts: usize) -> f64 {
        self.width() / parts as f64
    }

    /// `n` evenly spaced samples including both endpoints.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        linspace(self.lo, self.hi, n)
    }

    /// The interval as a closed span.
    pub fn as_span(&self) -> Span {
        Span::closed(self.lo, self.hi)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{:.2}; {:.2}]", self.lo, self.hi)
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

// =============================================================================
// SPANS
// =============================================================================

/// A possibly unbounded interval with explicit endpoint openness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
    pub lo_closed: bool,
    pub hi_closed: bool,
}

impl Span {
    pub fn new(lo: f64, hi: f64, lo_closed: bool, hi_closed: bool) -> Self {
        // Infinite ends are always open.
        Span {
            lo,
            hi,
            lo_closed: lo_closed && lo.is_finite(),
            hi_closed: hi_closed && hi.is_finite(),
        }
    }

    pub fn closed(lo: f64, hi: f64) -> Self {
        Span::new(lo, hi, true, true)
    }

    pub fn open(lo: f64, hi: f64) -> Self {
        Span::new(lo, hi, false, false)
    }

    pub fn point(at: f64) -> Self {
        Span::closed(at, at)
    }

    pub fn reals() -> Self {
        Span::open(NEG_INFINITY, INFINITY)
    }

    pub fn is_reals(&self) -> bool {
        self.lo == NEG_INFINITY && self.hi == INFINITY
    }

    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi || (self.lo == self.hi && !(self.lo_closed && self.hi_closed))
    }

    pub fn contains(&self, v: f64) -> bool {
        let above = if self.lo_closed { v >= self.lo } else { v > self.lo };
        let below = if self.hi_closed { v <= self.hi } else { v < self.hi };
        above && below
    }

    pub fn intersect(&self, other: &Span) -> Option<Span> {
        let (lo, lo_closed) = if self.lo > other.lo {
            (self.lo, self.lo_closed)
        } else if other.lo > self.lo {
            (other.lo, other.lo_closed)
        } else {
            (self.lo, self.lo_closed && other.lo_closed)
        };
        let (hi, hi_closed) = if self.hi < other.hi {
            (self.hi, self.hi_closed)
        } else if other.hi < self.hi {
            (other.hi, other.hi_closed)
        } else {
            (self.hi, self.hi_closed && other.hi_closed)
        };
        let span = Span::new(lo, hi, lo_closed, hi_closed);
        if span.is_empty() {
            None
        } else {
            Some(span)
        }
    }

    /// Formats with a fixed number of decimals, as the report does.
    pub fn display_fixed(&self, decimals: usize) -> String {
        let left = if self.lo_closed { "[" } else { "(" };
        let right = if self.hi_closed { "]" } else { ")" };
        format!(
            "{}{}; {}{}",
            left,
            format_fixed(self.lo, decimals),
            format_fixed(self.hi, decimals),
            right
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_reals() {
            return write!(f, "R");
        }
        let left = if self.lo_closed { "[" } else { "(" };
        let right = if self.hi_closed { "]" } else { ")" };
        write!(f, "{}{}; {}{}", left, format_val(self.lo), format_val(self.hi), right)
    }
}

/// Intersection of two sorted, disjoint span lists.
pub fn intersect_spans(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out: Vec<Span> = a
        .iter()
        .flat_map(|x| b.iter().filter_map(move |y| x.intersect(y)))
        .collect();
    sort_spans(&mut out);
    merge_spans(out)
}

/// Removes a single point, splitting the span that contains it.
pub fn remove_point(spans: &[Span], p: f64) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len() + 1);
    for s in spans {
        if !s.contains(p) {
            out.push(*s);
            continue;
        }
        let left = Span::new(s.lo, p, s.lo_closed, false);
        let right = Span::new(p, s.hi, false, s.hi_closed);
        if !left.is_empty() {
            out.push(left);
        }
        if !right.is_empty() {
            out.push(right);
        }
    }
    out
}

/// Joins touching spans of a sorted list.
pub fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for s in spans {
        if let Some(last) = merged.last_mut() {
            let touches = last.hi > s.lo || (last.hi == s.lo && (last.hi_closed || s.lo_closed));
            if touches {
                if s.hi > last.hi || (s.hi == last.hi && s.hi_closed) {
                    last.hi = s.hi;
                    last.hi_closed = s.hi_closed;
                }
                continue;
            }
        }
        merged.push(s);
    }
    merged
}

pub fn sort_spans(spans: &mut [Span]) {
    spans.sort_by(|a, b| {
        a.lo.partial_cmp(&b.lo)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.lo_closed.cmp(&a.lo_closed))
    });
}

// =============================================================================
// DOMAIN REPRESENTATION
// =============================================================================

/// Points `offset + k * period` for every integer `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub offset: f64,
    pub period: f64,
}

impl Lattice {
    /// Builds a lattice with positive period and offset reduced into `[0, period)`.
    pub fn new(offset: f64, period: f64) -> Self {
        let period = period.abs();
        let offset = offset.rem_euclid(period);
        Lattice { offset, period }
    }

    /// Lattice points inside `[lo, hi]`, or `None` if there are more than `cap`.
    pub fn points_within(&self, lo: f64, hi: f64, cap: usize) -> Option<Vec<f64>> {
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        let k_lo = ((lo - self.offset) / self.period).ceil();
        let k_hi = ((hi - self.offset) / self.period).floor();
        if k_hi < k_lo {
            return Some(Vec::new());
        }
        if k_hi - k_lo + 1.0 > cap as f64 {
            return None;
        }
        let mut points = Vec::new();
        let mut k = k_lo;
        while k <= k_hi {
            points.push(self.offset + k * self.period);
            k += 1.0;
        }
        Some(points)
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} + {}k", format_val(self.offset), format_val(self.period))
    }
}

/// What a heuristic could not pin down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Restriction {
    LogArgument,
    Radicand,
}

/// Set of reals on which a formula is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    Reals,
    Interval(Span),
    Union(Vec<Span>),
    /// `base` minus every point of every lattice.
    PeriodicComplement { base: Vec<Span>, excluded: Vec<Lattice> },
    /// Heuristic result: depends on an argument it could not resolve.
    Depends(Restriction),
    Empty,
}

impl Domain {
    /// Classifies a sorted, merged span list.
    pub fn from_spans(spans: Vec<Span>) -> Domain {
        match spans.len() {
            0 => Domain::Empty,
            1 if spans[0].is_reals() => Domain::Reals,
            1 => Domain::Interval(spans[0]),
            _ => Domain::Union(spans),
        }
    }

    pub fn contains(&self, v: f64) -> Option<bool> {
        match self {
            Domain::Reals => Some(true),
            Domain::Interval(s) => Some(s.contains(v)),
            Domain::Union(spans) => Some(spans.iter().any(|s| s.contains(v))),
            Domain::PeriodicComplement { base, excluded } => {
                let on_lattice = excluded.iter().any(|l| {
                    let k = ((v - l.offset) / l.period).round();
                    (l.offset + k * l.period - v).abs() < SAME_POINT
                });
                Some(base.iter().any(|s| s.contains(v)) && !on_lattice)
            }
            Domain::Depends(_) => None,
            Domain::Empty => Some(false),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Domain::Reals => write!(f, "R"),
            Domain::Interval(span) => write!(f, "{}", span),
            Domain::Union(spans) => {
                let parts: Vec<String> = spans.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join(" ∪ "))
            }
            Domain::PeriodicComplement { base, excluded } => {
                let base = match base.as_slice() {
                    [only] => only.to_string(),
                    spans => spans.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ∪ "),
                };
                let holes: Vec<String> = excluded.iter().map(|l| l.to_string()).collect();
                write!(f, "{} \\ {{{}, k ∈ Z}}", base, holes.join("; "))
            }
            Domain::Depends(Restriction::LogArgument) => write!(f, "depends on the logarithm argument"),
            Domain::Depends(Restriction::Radicand) => write!(f, "depends on the radicand"),
            Domain::Empty => write!(f, "∅"),
        }
    }
}

// =============================================================================
// UTILITY FUNCTIONS
// =============================================================================
pub(crate) fn format_val(val: f64) -> String {
    if val == INFINITY {
        return "+∞".to_string();
    }
    if val == NEG_INFINITY {
        return "−∞".to_string();
    }
    if val.abs() < ZERO_THRESHOLD {
        return "0".to_string();
    }

    let rounded = (val * 1_000_000.0).round() / 1_000_000.0;
    let s = format!("{:.6}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

pub(crate) fn format_fixed(val: f64, decimals: usize) -> String {
    if val.is_infinite() {
        return format_val(val);
    }
    format!("{:.*}", decimals, val)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_rejects_inverted_bounds() {
        assert!(Interval::new(1.0, 1.0).is_err());
        assert!(Interval::new(2.0, -2.0).is_err());
        assert!(Interval::new(NEG_INFINITY, 0.0).is_err());
        assert!(Interval::new(-1.0, 1.0).is_ok());
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = Interval::new(-5.0, 5.0).unwrap().linspace(11);
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], -5.0);
        assert_eq!(xs[10], 5.0);
        assert!((xs[5]).abs() < 1e-12);
    }

    #[test]
    fn removing_interior_point_splits_span() {
        let spans = remove_point(&[Span::reals()], 0.0);
        assert_eq!(spans, vec![Span::open(NEG_INFINITY, 0.0), Span::open(0.0, INFINITY)]);
        assert_eq!(Domain::from_spans(spans).to_string(), "(−∞; 0) ∪ (0; +∞)");
    }

    #[test]
    fn removing_closed_endpoint_opens_it() {
        let spans = remove_point(&[Span::closed(-1.0, 1.0)], 1.0);
        assert_eq!(spans, vec![Span::new(-1.0, 1.0, true, false)]);
    }

    #[test]
    fn intersection_keeps_tighter_ends() {
        let a = [Span::new(0.0, INFINITY, true, false)];
        let b = [Span::closed(-1.0, 1.0)];
        assert_eq!(intersect_spans(&a, &b), vec![Span::closed(0.0, 1.0)]);

        let open = [Span::new(0.0, INFINITY, false, false)];
        let point = [Span::point(0.0)];
        assert!(intersect_spans(&open, &point).is_empty());
    }

    #[test]
    fn merge_joins_through_closed_point() {
        let spans = vec![Span::open(-1.0, 0.0), Span::point(0.0), Span::open(0.0, 1.0)];
        assert_eq!(merge_spans(spans), vec![Span::open(-1.0, 1.0)]);
    }

    #[test]
    fn lattice_points_are_capped() {
        let lattice = Lattice::new(std::f64::consts::FRAC_PI_2, std::f64::consts::PI);
        let pts = lattice.points_within(-5.0, 5.0, 100).unwrap();
        assert_eq!(pts.len(), 4);
        assert!(lattice.points_within(-1e9, 1e9, 100).is_none());
    }

    #[test]
    fn domain_display_forms() {
        assert_eq!(Domain::Reals.to_string(), "R");
        assert_eq!(
            Domain::Interval(Span::new(0.0, INFINITY, true, false)).to_string(),
            "[0; +∞)"
        );
        assert_eq!(Domain::Empty.to_string(), "∅");
    }
}
