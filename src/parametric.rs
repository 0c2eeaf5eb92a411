//! Parametric curve analyzer for `x = x(t)`, `y = y(t)`.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::config::AnalysisConfig;
use crate::evaluator::NumericFunction;
use crate::interval::Interval;
use crate::normalize::CanonicalExpression;
use crate::report::{
    CurvatureExtrema, CurvaturePoint, CurveType, Finding, ParametricReport, SelfIntersection, SpecialKind,
    SpecialPoint,
};
use crate::roots::round_to;
use crate::symbolic::{Attempt, SymbolicBackend, SymbolicForm};

// =============================================================================
// CONFIGURATION
// =============================================================================
const MAX_SPECIAL_POINTS: usize = 5;
const MAX_SELF_INTERSECTIONS: usize = 3;
const DIFFERENCE_STEP: f64 = 1e-4;
const CIRCLE_PROBES: [f64; 5] = [0.0, PI / 4.0, PI / 2.0, PI, 3.0 * PI / 2.0];

// =============================================================================
// CURVE-TYPE RULE TABLE
// =============================================================================

/// Textual shape rule over the printed `x(t)` and `y(t)`.
pub struct CurveRule {
    pub applies: fn(&str, &str) -> bool,
    pub curve: CurveType,
}

/// Checked in order after the circle probe; the first match wins.
pub static CURVE_RULES: [CurveRule; 4] = [
    CurveRule {
        applies: |x, y| x.contains("cos") && y.contains("sin"),
        curve: CurveType::EllipseFamily,
    },
    CurveRule {
        applies: |x, _| (x.contains("cos") || x.contains("sin")) && (x.contains("t*") || x.contains("*t")),
        curve: CurveType::Spiral,
    },
    CurveRule {
        applies: |x, y| x.contains('t') && x.contains("sin") && y.contains("cos"),
        curve: CurveType::CycloidFamily,
    },
    CurveRule {
        applies: |x, y| x.contains("sin") && y.contains("sin"),
        curve: CurveType::LissajousFamily,
    },
];

pub fn classify_by_text(x_text: &str, y_text: &str) -> CurveType {
    CURVE_RULES
        .iter()
        .find(|rule| (rule.applies)(x_text, y_text))
        .map_or(CurveType::Arbitrary, |rule| rule.curve)
}

// =============================================================================
// ANALYZER
// =============================================================================

/// One coordinate: its numeric function plus whatever the symbolic layer offers.
struct Coordinate<'a> {
    canonical: &'a CanonicalExpression,
    function: NumericFunction,
    symbolic: Attempt<SymbolicForm>,
    first: Attempt<SymbolicForm>,
    second: Attempt<SymbolicForm>,
}

impl<'a> Coordinate<'a> {
    fn new(canonical: &'a CanonicalExpression, backend: &SymbolicBackend) -> Self {
        let symbolic = backend.lift(canonical, "t");
        let first = symbolic.clone().and_then(|f| f.derivative());
        let second = first.clone().and_then(|f| f.derivative());
        Coordinate {
            canonical,
            function: NumericFunction::new(canonical, "t"),
            symbolic,
            first,
            second,
        }
    }

    fn at(&self, t: f64) -> f64 {
        self.function.eval(t)
    }

    /// Printed form used by the textual rules.
    fn text(&self) -> String {
        match &self.symbolic {
            Ok(form) => form.to_string(),
            Err(_) => self.canonical.to_string(),
        }
    }

    /// `(x', x'')` from symbolic derivatives.
    fn exact_derivatives(&self, t: f64) -> Attempt<(f64, f64)> {
        let first = self.first.as_ref().map_err(Clone::clone)?;
        let second = self.second.as_ref().map_err(Clone::clone)?;
        Ok((first.value_at(t), second.value_at(t)))
    }

    /// `(x', x'')` from central differences.
    fn sampled_derivatives(&self, t: f64) -> (f64, f64) {
        let h = DIFFERENCE_STEP;
        let (before, here, after) = (self.at(t - h), self.at(t), self.at(t + h));
        ((after - before) / (2.0 * h), (after - 2.0 * here + before) / (h * h))
    }
}

/// Runs the eight parametric-curve properties over one parameter interval.
pub struct ParametricAnalyzer<'a> {
    x: Coordinate<'a>,
    y: Coordinate<'a>,
    interval: Interval,
    config: &'a AnalysisConfig,
}

impl<'a> ParametricAnalyzer<'a> {
    pub fn new(
        x: &'a CanonicalExpression,
        y: &'a CanonicalExpression,
        interval: Interval,
        config: &'a AnalysisConfig,
    ) -> Self {
        let backend = SymbolicBackend::new(&config.symbolic);
        ParametricAnalyzer {
            x: Coordinate::new(x, &backend),
            y: Coordinate::new(y, &backend),
            interval,
            config,
        }
    }

    pub fn x_function(&self) -> &NumericFunction {
        &self.x.function
    }

    pub fn y_function(&self) -> &NumericFunction {
        &self.y.function
    }

    pub fn analyze(&self) -> ParametricReport {
        ParametricReport {
            x_expression: self.x.canonical.to_string(),
            y_expression: self.y.canonical.to_string(),
            parameter_range: (self.interval.lo(), self.interval.hi()),
            x_range: self.x_range(),
            y_range: self.y_range(),
            curve_length: self.curve_length(),
            special_points: self.special_points(),
            self_intersections: self.self_intersections(),
            curvature_extrema: self.curvature_extrema(),
            curve_type: self.curve_type(),
        }
    }

    fn point(&self, t: f64) -> (f64, f64) {
        (self.x.at(t), self.y.at(t))
    }

    // =========================================================================
    // RANGES & LENGTH
    // =========================================================================

    fn coordinate_range(&self, coordinate: &Coordinate) -> Option<(f64, f64)> {
        let values: Vec<f64> = self
            .interval
            .linspace(self.config.sampling.coordinate_samples)
            .into_iter()
            .map(|t| coordinate.at(t))
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            return None;
        }
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((lo, hi))
    }

    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.coordinate_range(&self.x)
    }

    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.coordinate_range(&self.y)
    }

    /// Polyline length; segments touching a non-finite sample are skipped.
    pub fn curve_length(&self) -> Option<f64> {
        let samples = self.interval.linspace(self.config.sampling.length_samples);
        if samples.len() < 2 {
            return None;
        }
        let points: Vec<(f64, f64)> = samples.iter().map(|&t| self.point(t)).collect();
        let length = points
            .windows(2)
            .filter(|w| [w[0].0, w[0].1, w[1].0, w[1].1].iter().all(|v| v.is_finite()))
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum();
        Some(length)
    }

    // =========================================================================
    // SPECIAL POINTS
    // =========================================================================

    /// Vertical tangents, then horizontal tangents, then singular points.
    /// Exact only: without symbolic derivatives nothing is reported.
    pub fn special_points(&self) -> Finding<Vec<SpecialPoint>> {
        let zeros_of = |derivative: &Attempt<SymbolicForm>, name: &str| -> Option<Vec<f64>> {
            let form = derivative.as_ref().ok()?;
            match form.real_zeros(&self.interval) {
                Ok(zeros) => Some(zeros),
                Err(reason) => {
                    log::debug!("special points: no exact zeros of {name} ({reason})");
                    None
                }
            }
        };
        let vertical = zeros_of(&self.x.first, "dx/dt");
        let horizontal = zeros_of(&self.y.first, "dy/dt");

        let mut found = Vec::new();
        let mut push = |kind: SpecialKind, ts: &[f64]| {
            for &t in ts {
                let (x, y) = self.point(t);
                found.push(SpecialPoint { kind, t, x, y });
            }
        };
        if let Some(ts) = &vertical {
            push(SpecialKind::VerticalTangent, ts);
        }
        if let Some(ts) = &horizontal {
            push(SpecialKind::HorizontalTangent, ts);
        }
        if let (Some(v), Some(h)) = (&vertical, &horizontal) {
            let common: Vec<f64> = v.iter().copied().filter(|t| h.contains(t)).collect();
            push(SpecialKind::Singular, &common);
        }
        found.truncate(MAX_SPECIAL_POINTS);
        Finding::symbolic(found)
    }

    // =========================================================================
    // SELF-INTERSECTIONS
    // =========================================================================

    /// Grid-coincidence search: samples whose images round to the same
    /// 2-decimal cell and whose parameters differ by more than the
    /// separation threshold.
    pub fn self_intersections(&self) -> Vec<SelfIntersection> {
        let separation = self.config.tolerance.self_intersection_separation;
        let mut seen: HashMap<(i64, i64), f64> = HashMap::new();
        let mut found = Vec::new();

        for t in self.interval.linspace(self.config.sampling.self_intersection_samples) {
            let (x, y) = self.point(t);
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let key = ((x * 100.0).round() as i64, (y * 100.0).round() as i64);
            match seen.get(&key) {
                Some(&first) if (t - first).abs() > separation => found.push(SelfIntersection {
                    t1: first,
                    t2: t,
                    x: key.0 as f64 / 100.0,
                    y: key.1 as f64 / 100.0,
                }),
                Some(_) => {}
                None => {
                    seen.insert(key, t);
                }
            }
        }
        found.truncate(MAX_SELF_INTERSECTIONS);
        found
    }

    // =========================================================================
    // CURVATURE
    // =========================================================================

    /// Sampled global extremes of κ. Exact derivatives when both coordinates
    /// have them, central differences otherwise.
    pub fn curvature_extrema(&self) -> Finding<CurvatureExtrema> {
        let exact = |t: f64| -> Attempt<((f64, f64), (f64, f64))> {
            Ok((self.x.exact_derivatives(t)?, self.y.exact_derivatives(t)?))
        };
        let use_exact = match exact(self.interval.lo()) {
            Ok(_) => true,
            Err(reason) => {
                log::debug!("curvature: central differences ({reason})");
                false
            }
        };
        let floor = self.config.tolerance.curvature_floor;

        let mut samples: Vec<(f64, f64)> = Vec::new();
        for t in self.interval.linspace(self.config.sampling.curvature_samples) {
            let ((dx, d2x), (dy, d2y)) = if use_exact {
                match exact(t) {
                    Ok(d) => d,
                    Err(_) => continue,
                }
            } else {
                (self.x.sampled_derivatives(t), self.y.sampled_derivatives(t))
            };
            let numerator = (dx * d2y - dy * d2x).abs();
            let denominator = (dx * dx + dy * dy).powf(1.5);
            if !(numerator.is_finite() && denominator.is_finite()) || denominator <= floor {
                continue;
            }
            samples.push((t, numerator / denominator));
        }

        // Stable sort: ties keep parameter order.
        samples.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let at = |&(t, kappa): &(f64, f64)| {
            let (x, y) = self.point(t);
            CurvaturePoint { kappa, t, x, y }
        };
        let extrema = CurvatureExtrema {
            min: samples.first().map(at),
            max: if samples.len() > 1 { samples.last().map(at) } else { None },
        };
        if use_exact {
            Finding::symbolic(extrema)
        } else {
            Finding::numeric(extrema)
        }
    }

    // =========================================================================
    // CURVE TYPE
    // =========================================================================

    pub fn curve_type(&self) -> Finding<CurveType> {
        let radii: Vec<f64> = CIRCLE_PROBES
            .iter()
            .map(|&t| {
                let (x, y) = self.point(t);
                x.hypot(y)
            })
            .filter(|r| r.is_finite())
            .collect();
        if !radii.is_empty() {
            let lo = radii.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = radii.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if hi - lo < self.config.tolerance.circle_spread {
                let radius = radii.iter().sum::<f64>() / radii.len() as f64;
                return Finding::numeric(CurveType::Circle {
                    radius: round_to(radius, 2),
                });
            }
        }
        Finding::pattern(classify_by_text(&self.x.text(), &self.y.text()))
    }
}
