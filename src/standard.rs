//! Standard curve analyzer for `y = f(x)`.
//!
//! Each dual-path field runs as a strategy pair: the exact strategy is
//! attempted first and its [`Unavailable`] outcome is logged before the
//! numeric strategy runs. The resulting [`Finding`] records which one
//! answered.

use std::f64::INFINITY;
use std::f64::NEG_INFINITY;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AnalysisConfig;
use crate::evaluator::{safe_eval, NumericFunction};
use crate::interval::{Domain, Interval, Restriction, Span};
use crate::normalize::CanonicalExpression;
use crate::report::{
    Extremum, ExtremumKind, Finding, Monotonicity, Parity, SignIntervals, StandardReport, ValueRange,
};
use crate::roots::{dedup_rounded, round_to, Bisection};
use crate::symbolic::{Attempt, SymbolicBackend, SymbolicForm, Unavailable};

// =============================================================================
// CONFIGURATION
// =============================================================================
const MAX_EXTREMA: usize = 5;
const FLAT_PROBE: f64 = 0.001;
const SYMMETRY_TOLERANCE: f64 = 1e-6;
const PARITY_PROBE_START: f64 = 0.1;
const PARITY_PROBE_END: f64 = 3.0;
const MIN_PIECE: f64 = 1e-9;

// =============================================================================
// DOMAIN RULE TABLE
// =============================================================================
static LOG_SHIFTED: Lazy<Regex> = Lazy::new(|| compile(r"log\(x\s*[-+]"));
static DIVIDES_BY_X: Lazy<Regex> = Lazy::new(|| compile(r"/\s*x\b"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid domain rule pattern {pattern}: {e}"))
}

/// One entry of the textual domain heuristic.
pub struct DomainRule {
    pub name: &'static str,
    pub applies: fn(&str) -> bool,
    pub domain: fn(&str) -> Domain,
}

/// Ordered rules over the canonical text; the first match wins.
pub static DOMAIN_RULES: [DomainRule; 5] = [
    DomainRule {
        name: "logarithm",
        applies: |s| s.contains("log("),
        domain: |s| {
            if LOG_SHIFTED.is_match(s) {
                Domain::Depends(Restriction::LogArgument)
            } else {
                Domain::Interval(Span::open(0.0, INFINITY))
            }
        },
    },
    DomainRule {
        name: "square root",
        applies: |s| s.contains("sqrt("),
        domain: |s| {
            if s.replace(' ', "").contains("sqrt(x)") {
                Domain::Interval(Span::new(0.0, INFINITY, true, false))
            } else {
                Domain::Depends(Restriction::Radicand)
            }
        },
    },
    DomainRule {
        name: "division by x",
        applies: |s| DIVIDES_BY_X.is_match(s) || s.contains("1/x"),
        domain: |_| Domain::Union(vec![Span::open(NEG_INFINITY, 0.0), Span::open(0.0, INFINITY)]),
    },
    DomainRule {
        name: "inverse sine or cosine",
        applies: |s| s.contains("asin(") || s.contains("acos("),
        domain: |_| Domain::Interval(Span::closed(-1.0, 1.0)),
    },
    DomainRule {
        name: "default",
        applies: |_| true,
        domain: |_| Domain::Reals,
    },
];

/// Applies [`DOMAIN_RULES`] to canonical text.
pub fn fallback_domain(text: &str) -> Domain {
    DOMAIN_RULES
        .iter()
        .find(|rule| (rule.applies)(text))
        .map(|rule| {
            log::trace!("domain rule `{}` matched", rule.name);
            (rule.domain)(text)
        })
        .unwrap_or(Domain::Reals)
}

// =============================================================================
// ANALYZER
// =============================================================================

/// Runs the seven standard-curve properties over one interval.
pub struct StandardAnalyzer<'a> {
    canonical: &'a CanonicalExpression,
    function: NumericFunction,
    symbolic: Attempt<SymbolicForm>,
    derivative: Attempt<SymbolicForm>,
    interval: Interval,
    config: &'a AnalysisConfig,
    bisection: Bisection,
}

fn with_fallback<T>(field: &str, exact: Attempt<T>, numeric: impl FnOnce() -> T) -> Finding<T> {
    match exact {
        Ok(value) => {
            log::trace!("{field}: exact strategy");
            Finding::symbolic(value)
        }
        Err(reason) => {
            log::debug!("{field}: numeric fallback ({reason})");
            Finding::numeric(numeric())
        }
    }
}

impl<'a> StandardAnalyzer<'a> {
    pub fn new(canonical: &'a CanonicalExpression, interval: Interval, config: &'a AnalysisConfig) -> Self {
        let symbolic = SymbolicBackend::new(&config.symbolic).lift(canonical, "x");
        let derivative = symbolic.clone().and_then(|form| form.derivative());
        StandardAnalyzer {
            canonical,
            function: NumericFunction::new(canonical, "x"),
            symbolic,
            derivative,
            interval,
            config,
            bisection: Bisection::from_config(&config.tolerance),
        }
    }

    pub fn function(&self) -> &NumericFunction {
        &self.function
    }

    /// Computes every field independently.
    pub fn analyze(&self) -> StandardReport {
        let zeros = self.zeros();
        let sign = self.sign_intervals(&zeros.value);
        StandardReport {
            expression: self.canonical.to_string(),
            domain: self.domain(),
            range: self.range(),
            zeros,
            sign,
            extrema: self.extrema(),
            monotonicity: self.monotonicity(),
            parity: self.parity(),
        }
    }

    fn f(&self, x: f64) -> f64 {
        self.function.eval(x)
    }

    // =========================================================================
    // DOMAIN
    // =========================================================================

    pub fn domain(&self) -> Finding<Domain> {
        match self.symbolic.as_ref().map_err(Clone::clone).and_then(SymbolicForm::continuity_domain) {
            Ok(domain) => Finding::symbolic(domain),
            Err(reason) => {
                log::debug!("domain: textual rules ({reason})");
                Finding::pattern(fallback_domain(self.canonical.as_str()))
            }
        }
    }

    // =========================================================================
    // RANGE
    // =========================================================================

    pub fn range(&self) -> Finding<ValueRange> {
        if let Ok(range) = self.quadratic_range() {
            return Finding::symbolic(range);
        }
        if matches!(self.canonical.as_str(), "sin(x)" | "cos(x)") {
            return Finding::pattern(ValueRange::Bounded {
                lo: -1.0,
                hi: 1.0,
                approximate: false,
            });
        }
        Finding::numeric(self.sampled_range())
    }

    /// Vertex value of a quadratic; ignores the interval.
    fn quadratic_range(&self) -> Attempt<ValueRange> {
        let form = self.symbolic.as_ref().map_err(Clone::clone)?;
        let quadratic = form.quadratic()?;
        let vertex_y = form.value_at(quadratic.vertex);
        if !vertex_y.is_finite() {
            return Err(Unavailable::Unsupported("vertex value is not finite"));
        }
        Ok(if quadratic.leading > 0.0 {
            ValueRange::Above { min: vertex_y }
        } else {
            ValueRange::Below { max: vertex_y }
        })
    }

    fn sampled_range(&self) -> ValueRange {
        let values: Vec<f64> = self
            .interval
            .linspace(self.config.sampling.range_samples)
            .into_iter()
            .filter_map(|x| safe_eval(&|x| self.f(x), x))
            .collect();
        if values.is_empty() {
            return ValueRange::Empty;
        }
        let lo = values.iter().copied().fold(INFINITY, f64::min);
        let hi = values.iter().copied().fold(NEG_INFINITY, f64::max);
        let limit = self.config.tolerance.unbounded_magnitude;
        if lo.abs() > limit || hi.abs() > limit {
            return ValueRange::Unbounded;
        }
        ValueRange::Bounded {
            lo: round_to(lo, 2),
            hi: round_to(hi, 2),
            approximate: true,
        }
    }

    // =========================================================================
    // ZEROS & SIGN
    // =========================================================================

    pub fn zeros(&self) -> Finding<Vec<f64>> {
        let exact = self.symbolic.as_ref().map_err(Clone::clone).and_then(|form| {
            let zeros = form.real_zeros(&self.interval)?;
            if zeros.is_empty() {
                return Err(Unavailable::Unsupported("no exact zero inside the interval"));
            }
            Ok(zeros)
        });
        with_fallback("zeros", exact, || {
            let found = self
                .bisection
                .scan(|x| self.f(x), &self.interval, self.config.sampling.zero_scan);
            dedup_rounded(found)
        })
    }

    /// Splits the interval at `zeros` and classifies each piece by its midpoint.
    ///
    /// Interior boundaries are open; the interval's own ends are closed.
    pub fn sign_intervals(&self, zeros: &[f64]) -> SignIntervals {
        let (lo, hi) = (self.interval.lo(), self.interval.hi());
        let dead_band = self.config.tolerance.sign_dead_band;

        let mut points = Vec::with_capacity(zeros.len() + 2);
        points.push(lo);
        points.extend_from_slice(zeros);
        points.push(hi);
        points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut sign = SignIntervals::default();
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b - a < MIN_PIECE {
                continue;
            }
            let value = self.f((a + b) / 2.0);
            if !value.is_finite() {
                continue;
            }
            let piece = Span::new(a, b, a <= lo, b >= hi);
            if value > dead_band {
                sign.positive.push(piece);
            } else if value < -dead_band {
                sign.negative.push(piece);
            }
        }
        sign
    }

    // =========================================================================
    // EXTREMA
    // =========================================================================

    pub fn extrema(&self) -> Finding<Vec<Extremum>> {
        let mut found = with_fallback("extrema", self.exact_extrema(), || self.sampled_extrema());
        found.value.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        found.value.truncate(MAX_EXTREMA);
        found
    }

    fn exact_extrema(&self) -> Attempt<Vec<Extremum>> {
        let derivative = self.derivative.as_ref().map_err(Clone::clone)?;
        let second = derivative.derivative();
        let mut extrema = Vec::new();
        for x in derivative.real_zeros(&self.interval)? {
            let y = self.f(x);
            if !y.is_finite() {
                continue;
            }
            let curvature = second.as_ref().map_or(f64::NAN, |s| s.value_at(x));
            let kind = if curvature > 0.0 {
                Some(ExtremumKind::Minimum)
            } else if curvature < 0.0 {
                Some(ExtremumKind::Maximum)
            } else {
                let (left, right) = (self.f(x - FLAT_PROBE), self.f(x + FLAT_PROBE));
                if y > left && y > right {
                    Some(ExtremumKind::Maximum)
                } else if y < left && y < right {
                    Some(ExtremumKind::Minimum)
                } else {
                    None
                }
            };
            if let Some(kind) = kind {
                extrema.push(Extremum { kind, x, y });
            }
        }
        if extrema.is_empty() {
            return Err(Unavailable::Unsupported("no classified critical point"));
        }
        Ok(extrema)
    }

    /// Three-point test on a uniform grid, then drops points within two
    /// steps of an earlier one.
    fn sampled_extrema(&self) -> Vec<Extremum> {
        let parts = self.config.sampling.extrema_scan;
        let step = self.interval.step(parts);
        let dead_band = self.config.tolerance.extremum_dead_band;
        let at = |i: usize| self.interval.lo() + i as f64 * step;

        let mut found: Vec<Extremum> = Vec::new();
        for i in 1..parts.saturating_sub(1) {
            let (y0, y1, y2) = (self.f(at(i - 1)), self.f(at(i)), self.f(at(i + 1)));
            if !(y0.is_finite() && y1.is_finite() && y2.is_finite()) {
                continue;
            }
            let kind = if y1 > y0 + dead_band && y1 > y2 + dead_band {
                ExtremumKind::Maximum
            } else if y1 < y0 - dead_band && y1 < y2 - dead_band {
                ExtremumKind::Minimum
            } else {
                continue;
            };
            let candidate = Extremum { kind, x: at(i), y: y1 };
            if !found.iter().any(|e| (e.x - candidate.x).abs() < 2.0 * step) {
                found.push(candidate);
            }
        }
        found
    }

    // =========================================================================
    // MONOTONICITY
    // =========================================================================

    pub fn monotonicity(&self) -> Finding<Monotonicity> {
        with_fallback("monotonicity", self.exact_monotonicity(), || self.sampled_monotonicity())
    }

    fn exact_monotonicity(&self) -> Attempt<Monotonicity> {
        let derivative = self.derivative.as_ref().map_err(Clone::clone)?;
        let dead_band = self.config.tolerance.monotonicity_dead_band;

        let mut points = vec![self.interval.lo()];
        points.extend(derivative.real_zeros(&self.interval)?);
        points.push(self.interval.hi());
        points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut result = Monotonicity::default();
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b - a < MIN_PIECE {
                continue;
            }
            let slope = derivative.value_at((a + b) / 2.0);
            if slope > dead_band {
                result.increasing.push(Span::closed(a, b));
            } else if slope < -dead_band {
                result.decreasing.push(Span::closed(a, b));
            }
        }
        Ok(result)
    }

    /// Walks consecutive sample pairs, extending a run while the direction
    /// holds. A non-finite sample closes the current run.
    fn sampled_monotonicity(&self) -> Monotonicity {
        #[derive(PartialEq, Clone, Copy)]
        enum Direction {
            Up,
            Down,
        }

        let pairs = self.config.sampling.monotonicity_pairs;
        let step = self.interval.step(pairs);
        let dead_band = self.config.tolerance.monotonicity_dead_band;

        let mut result = Monotonicity::default();
        let mut current: Option<(Direction, f64, f64)> = None;
        let close = |run: Option<(Direction, f64, f64)>, result: &mut Monotonicity| {
            if let Some((direction, a, b)) = run {
                match direction {
                    Direction::Up => result.increasing.push(Span::closed(a, b)),
                    Direction::Down => result.decreasing.push(Span::closed(a, b)),
                }
            }
        };

        for i in 0..pairs {
            let x1 = self.interval.lo() + i as f64 * step;
            let x2 = if i + 1 == pairs {
                self.interval.hi()
            } else {
                self.interval.lo() + (i + 1) as f64 * step
            };
            let (y1, y2) = (self.f(x1), self.f(x2));
            if !(y1.is_finite() && y2.is_finite()) {
                close(current.take(), &mut result);
                continue;
            }
            let direction = if y2 > y1 + dead_band {
                Direction::Up
            } else if y2 < y1 - dead_band {
                Direction::Down
            } else {
                continue;
            };
            current = match current {
                Some((d, a, _)) if d == direction => Some((d, a, x2)),
                other => {
                    close(other, &mut result);
                    Some((direction, x1, x2))
                }
            };
        }
        close(current, &mut result);
        result
    }

    // =========================================================================
    // PARITY
    // =========================================================================

    pub fn parity(&self) -> Finding<Parity> {
        if !self.interval.is_symmetric(SYMMETRY_TOLERANCE) {
            return Finding::pattern(Parity::Asymmetric);
        }
        let exact = self.symbolic.as_ref().map_err(Clone::clone).and_then(SymbolicForm::parity);
        with_fallback("parity", exact, || self.sampled_parity())
    }

    fn sampled_parity(&self) -> Parity {
        let (lo, hi) = (self.interval.lo(), self.interval.hi());
        let tolerance = self.config.tolerance.parity;
        let probes = crate::interval::linspace(
            PARITY_PROBE_START,
            PARITY_PROBE_END.min(hi),
            self.config.sampling.parity_probes,
        );

        let (mut even, mut odd) = (true, true);
        for x in probes {
            if x > hi || -x < lo {
                break;
            }
            let (fx, fmx) = (self.f(x), self.f(-x));
            if !(fx.is_finite() && fmx.is_finite()) {
                even = false;
                odd = false;
                break;
            }
            if (fx - fmx).abs() > tolerance {
                even = false;
            }
            if (fx + fmx).abs() > tolerance {
                odd = false;
            }
        }

        if even {
            Parity::Even
        } else if odd {
            Parity::Odd
        } else {
            Parity::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer<'a>(c: &'a CanonicalExpression, config: &'a AnalysisConfig, lo: f64, hi: f64) -> StandardAnalyzer<'a> {
        StandardAnalyzer::new(c, Interval::new(lo, hi).unwrap(), config)
    }

    fn numeric_only() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.symbolic.enabled = false;
        config
    }

    #[test]
    fn domain_rules_in_order() {
        assert_eq!(fallback_domain("log(x)"), Domain::Interval(Span::open(0.0, INFINITY)));
        assert_eq!(fallback_domain("log(x - 1)"), Domain::Depends(Restriction::LogArgument));
        assert_eq!(fallback_domain("sqrt(x)"), Domain::Interval(Span::new(0.0, INFINITY, true, false)));
        assert_eq!(fallback_domain("sqrt(x + 1)"), Domain::Depends(Restriction::Radicand));
        assert_eq!(fallback_domain("5/x**2").to_string(), "(−∞; 0) ∪ (0; +∞)");
        assert_eq!(fallback_domain("asin(x)"), Domain::Interval(Span::closed(-1.0, 1.0)));
        assert_eq!(fallback_domain("sin(x)"), Domain::Reals);
        // The logarithm rule wins over the division rule.
        assert_eq!(fallback_domain("log(x)/x"), Domain::Interval(Span::open(0.0, INFINITY)));
    }

    #[test]
    fn exact_domain_is_preferred() {
        let c = CanonicalExpression::parse("sqrt(4 - x^2)").unwrap();
        let config = AnalysisConfig::default();
        let domain = analyzer(&c, &config, -5.0, 5.0).domain();
        assert_eq!(domain.method, crate::report::Method::Symbolic);
        assert_eq!(domain.value, Domain::Interval(Span::closed(-2.0, 2.0)));

        let config = numeric_only();
        let domain = analyzer(&c, &config, -5.0, 5.0).domain();
        assert_eq!(domain.method, crate::report::Method::Pattern);
        assert_eq!(domain.value, Domain::Depends(Restriction::Radicand));
    }

    #[test]
    fn quadratic_range_uses_leading_sign() {
        let config = AnalysisConfig::default();
        let c = CanonicalExpression::parse("x^2 - 4").unwrap();
        assert_eq!(analyzer(&c, &config, -5.0, 5.0).range().value, ValueRange::Above { min: -4.0 });
        let c = CanonicalExpression::parse("-x^2 + 2x").unwrap();
        assert_eq!(analyzer(&c, &config, -5.0, 5.0).range().value, ValueRange::Below { max: 1.0 });
    }

    #[test]
    fn monomials_take_the_exact_path() {
        let config = AnalysisConfig::default();
        let c = CanonicalExpression::parse("x^2").unwrap();
        let a = analyzer(&c, &config, -5.0, 5.0);
        let range = a.range();
        assert_eq!(range.method, crate::report::Method::Symbolic);
        assert_eq!(range.value, ValueRange::Above { min: 0.0 });
        assert_eq!(a.zeros().method, crate::report::Method::Symbolic);
        assert_eq!(a.monotonicity().method, crate::report::Method::Symbolic);

        let c = CanonicalExpression::parse("1/x").unwrap();
        let domain = analyzer(&c, &config, -5.0, 5.0).domain();
        assert_eq!(domain.method, crate::report::Method::Symbolic);
        assert_eq!(domain.value.to_string(), "(−∞; 0) ∪ (0; +∞)");
    }

    #[test]
    fn trig_identity_and_sampled_range() {
        let config = AnalysisConfig::default();
        let c = CanonicalExpression::parse("sin(x)").unwrap();
        let range = analyzer(&c, &config, -5.0, 5.0).range();
        assert_eq!(range.method, crate::report::Method::Pattern);

        let c = CanonicalExpression::parse("x^3").unwrap();
        let range = analyzer(&c, &config, -2.0, 2.0).range();
        assert_eq!(range.method, crate::report::Method::Numeric);
        assert_eq!(
            range.value,
            ValueRange::Bounded {
                lo: -8.0,
                hi: 8.0,
                approximate: true
            }
        );

        let c = CanonicalExpression::parse("exp(x)").unwrap();
        let range = analyzer(&c, &config, 0.0, 20.0).range();
        assert_eq!(range.value, ValueRange::Unbounded);

        let c = CanonicalExpression::parse("sqrt(x)").unwrap();
        let range = analyzer(&c, &config, -3.0, -1.0).range();
        assert_eq!(range.value, ValueRange::Empty);
    }

    #[test]
    fn zeros_fall_back_to_scan() {
        let c = CanonicalExpression::parse("x - cos(x)").unwrap();
        let config = AnalysisConfig::default();
        let zeros = analyzer(&c, &config, -5.0, 5.0).zeros();
        assert_eq!(zeros.method, crate::report::Method::Numeric);
        assert_eq!(zeros.value.len(), 1);
        assert!((zeros.value[0] - 0.739085).abs() < 1e-4);
    }

    #[test]
    fn sign_intervals_of_identity() {
        let c = CanonicalExpression::parse("x").unwrap();
        let config = AnalysisConfig::default();
        let a = analyzer(&c, &config, -5.0, 5.0);
        let sign = a.sign_intervals(&a.zeros().value);
        assert_eq!(sign.positive, vec![Span::new(0.0, 5.0, false, true)]);
        assert_eq!(sign.negative, vec![Span::new(-5.0, 0.0, true, false)]);
    }

    #[test]
    fn flat_critical_point_is_not_an_extremum() {
        let c = CanonicalExpression::parse("x^3").unwrap();
        let config = AnalysisConfig::default();
        let extrema = analyzer(&c, &config, -2.0, 2.0).extrema();
        assert!(extrema.value.is_empty());
    }

    #[test]
    fn sampled_extrema_are_merged_and_capped() {
        let c = CanonicalExpression::parse("sin(5*x)").unwrap();
        let config = numeric_only();
        let extrema = analyzer(&c, &config, -10.0, 10.0).extrema();
        assert_eq!(extrema.value.len(), MAX_EXTREMA);
        assert!(extrema.value.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn monotonicity_strategies_agree_on_parabola() {
        let c = CanonicalExpression::parse("x^2").unwrap();
        let exact_config = AnalysisConfig::default();
        let exact = analyzer(&c, &exact_config, -5.0, 5.0).monotonicity();
        assert_eq!(exact.method, crate::report::Method::Symbolic);
        assert_eq!(exact.value.decreasing, vec![Span::closed(-5.0, 0.0)]);
        assert_eq!(exact.value.increasing, vec![Span::closed(0.0, 5.0)]);

        let numeric_config = numeric_only();
        let sampled = analyzer(&c, &numeric_config, -5.0, 5.0).monotonicity();
        assert_eq!(sampled.method, crate::report::Method::Numeric);
        assert_eq!(sampled.value.decreasing.len(), 1);
        assert_eq!(sampled.value.increasing.len(), 1);
        assert_eq!(sampled.value.decreasing[0].lo, -5.0);
        assert_eq!(sampled.value.increasing[0].hi, 5.0);
        // Runs meet on the grid point x = 0 without overlapping.
        assert_eq!(sampled.value.decreasing[0].hi, 0.0);
        assert_eq!(sampled.value.increasing[0].lo, 0.0);
    }

    #[test]
    fn sampled_monotonicity_breaks_at_poles() {
        let c = CanonicalExpression::parse("log(abs(x))").unwrap();
        let config = numeric_only();
        // Sample 50 of 100 lands on x = 0 exactly.
        let m = analyzer(&c, &config, -5.0, 5.0).monotonicity().value;
        assert_eq!(m.decreasing.len(), 1);
        assert_eq!(m.increasing.len(), 1);
        assert!(m.decreasing[0].hi < 0.0);
        assert!(m.increasing[0].lo > 0.0);
    }

    #[test]
    fn parity_requires_symmetric_interval() {
        let config = AnalysisConfig::default();
        let c = CanonicalExpression::parse("x^2").unwrap();
        assert_eq!(analyzer(&c, &config, -3.0, 5.0).parity().value, Parity::Asymmetric);

        let c = CanonicalExpression::parse("x*cos(x) + sin(x)").unwrap();
        let config = numeric_only();
        assert_eq!(analyzer(&c, &config, -3.0, 3.0).parity().value, Parity::Odd);
        let c = CanonicalExpression::parse("1/x^2").unwrap();
        assert_eq!(analyzer(&c, &config, -3.0, 3.0).parity().value, Parity::Even);
        let c = CanonicalExpression::parse("sqrt(x)").unwrap();
        assert_eq!(analyzer(&c, &config, -3.0, 3.0).parity().value, Parity::General);
    }
}
