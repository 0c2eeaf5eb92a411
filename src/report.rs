//! Analysis reports and their plain-text rendering.

use std::fmt;

use serde::Serialize;

use crate::interval::{format_fixed, format_val, Domain, Span};

// =============================================================================
// PROVENANCE
// =============================================================================

/// Which strategy produced a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    Symbolic,
    /// Shape recognition or textual rule table.
    Pattern,
    Numeric,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Symbolic => write!(f, "exact"),
            Method::Pattern => write!(f, "pattern"),
            Method::Numeric => write!(f, "numeric"),
        }
    }
}

/// A report field tagged with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding<T> {
    pub value: T,
    pub method: Method,
}

impl<T> Finding<T> {
    pub fn symbolic(value: T) -> Self {
        Finding {
            value,
            method: Method::Symbolic,
        }
    }

    pub fn pattern(value: T) -> Self {
        Finding {
            value,
            method: Method::Pattern,
        }
    }

    pub fn numeric(value: T) -> Self {
        Finding {
            value,
            method: Method::Numeric,
        }
    }
}

// =============================================================================
// STANDARD CURVE
// =============================================================================

/// Set of values a function takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueRange {
    /// `[lo; hi]`; `approximate` when read off samples.
    Bounded { lo: f64, hi: f64, approximate: bool },
    /// `(−∞; max]`
    Below { max: f64 },
    /// `[min; +∞)`
    Above { min: f64 },
    Unbounded,
    /// No finite sample.
    Empty,
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueRange::Bounded {
                lo,
                hi,
                approximate: true,
            } => write!(f, "≈ [{}; {}]", format_val(*lo), format_val(*hi)),
            ValueRange::Bounded { lo, hi, .. } => write!(f, "[{}; {}]", format_val(*lo), format_val(*hi)),
            ValueRange::Below { max } => write!(f, "(−∞; {}]", format_fixed(*max, 2)),
            ValueRange::Above { min } => write!(f, "[{}; +∞)", format_fixed(*min, 2)),
            ValueRange::Unbounded => write!(f, "(−∞; +∞)"),
            ValueRange::Empty => write!(f, "∅"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SignIntervals {
    pub positive: Vec<Span>,
    pub negative: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtremumKind {
    Minimum,
    Maximum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub kind: ExtremumKind,
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Extremum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self.kind {
            ExtremumKind::Minimum => "minimum",
            ExtremumKind::Maximum => "maximum",
        };
        write!(f, "{} at x ≈ {:.3}, f(x) ≈ {:.3}", label, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Monotonicity {
    pub increasing: Vec<Span>,
    pub decreasing: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Parity {
    Even,
    Odd,
    General,
    /// The interval is not symmetric about 0, so parity was not checked.
    Asymmetric,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
            Parity::General => write!(f, "neither even nor odd"),
            Parity::Asymmetric => write!(f, "neither even nor odd (interval is not symmetric)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardReport {
    pub expression: String,
    pub domain: Finding<Domain>,
    pub range: Finding<ValueRange>,
    pub zeros: Finding<Vec<f64>>,
    pub sign: SignIntervals,
    pub extrema: Finding<Vec<Extremum>>,
    pub monotonicity: Finding<Monotonicity>,
    pub parity: Finding<Parity>,
}

fn spans_text(spans: &[Span]) -> String {
    if spans.is_empty() {
        return "none".to_string();
    }
    spans.iter().map(|s| s.display_fixed(2)).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for StandardReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Analysis of f(x) = {}", self.expression)?;
        writeln!(f, "  Domain D(f) = {} [{}]", self.domain.value, self.domain.method)?;
        writeln!(f, "  Range E(f) {} [{}]", range_text(&self.range.value), self.range.method)?;
        if self.zeros.value.is_empty() {
            writeln!(f, "  Zeros: none found")?;
        } else {
            let zeros: Vec<String> = self.zeros.value.iter().map(|z| format!("x = {}", format_val(*z))).collect();
            writeln!(f, "  Zeros: {} [{}]", zeros.join(", "), self.zeros.method)?;
        }
        writeln!(f, "  f(x) > 0: {}", spans_text(&self.sign.positive))?;
        writeln!(f, "  f(x) < 0: {}", spans_text(&self.sign.negative))?;
        if self.extrema.value.is_empty() {
            writeln!(f, "  Extrema: none found")?;
        } else {
            writeln!(f, "  Extrema [{}]:", self.extrema.method)?;
            for e in &self.extrema.value {
                writeln!(f, "    {}", e)?;
            }
        }
        writeln!(
            f,
            "  Increasing: {} [{}]",
            spans_text(&self.monotonicity.value.increasing),
            self.monotonicity.method
        )?;
        writeln!(f, "  Decreasing: {}", spans_text(&self.monotonicity.value.decreasing))?;
        write!(f, "  Parity: {} [{}]", self.parity.value, self.parity.method)
    }
}

fn range_text(range: &ValueRange) -> String {
    match range {
        ValueRange::Bounded { approximate: true, .. } => range.to_string(),
        _ => format!("= {}", range),
    }
}

// =============================================================================
// PARAMETRIC CURVE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialKind {
    VerticalTangent,
    HorizontalTangent,
    Singular,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecialPoint {
    pub kind: SpecialKind,
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for SpecialPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self.kind {
            SpecialKind::VerticalTangent => "vertical tangent",
            SpecialKind::HorizontalTangent => "horizontal tangent",
            SpecialKind::Singular => "singular point",
        };
        write!(f, "{} at t={:.2}, ({:.2}, {:.2})", label, self.t, self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelfIntersection {
    pub t1: f64,
    pub t2: f64,
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for SelfIntersection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2}) at t₁={:.2}, t₂={:.2}", self.x, self.y, self.t1, self.t2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvaturePoint {
    pub kappa: f64,
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CurvatureExtrema {
    pub min: Option<CurvaturePoint>,
    pub max: Option<CurvaturePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CurveType {
    Circle { radius: f64 },
    EllipseFamily,
    Spiral,
    CycloidFamily,
    LissajousFamily,
    Arbitrary,
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveType::Circle { radius } => write!(f, "circle (r ≈ {:.2})", radius),
            CurveType::EllipseFamily => write!(f, "ellipse or circle"),
            CurveType::Spiral => write!(f, "spiral"),
            CurveType::CycloidFamily => write!(f, "cycloid-like curve"),
            CurveType::LissajousFamily => write!(f, "Lissajous figure"),
            CurveType::Arbitrary => write!(f, "arbitrary curve"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametricReport {
    pub x_expression: String,
    pub y_expression: String,
    pub parameter_range: (f64, f64),
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub curve_length: Option<f64>,
    pub special_points: Finding<Vec<SpecialPoint>>,
    pub self_intersections: Vec<SelfIntersection>,
    pub curvature_extrema: Finding<CurvatureExtrema>,
    pub curve_type: Finding<CurveType>,
}

fn pair_text(pair: Option<(f64, f64)>) -> String {
    match pair {
        Some((lo, hi)) => format!("[{:.2}; {:.2}]", lo, hi),
        None => "not determined".to_string(),
    }
}

impl fmt::Display for ParametricReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Analysis of the parametric curve")?;
        writeln!(f, "  x(t) = {}", self.x_expression)?;
        writeln!(f, "  y(t) = {}", self.y_expression)?;
        writeln!(f, "  Curve type: {} [{}]", self.curve_type.value, self.curve_type.method)?;
        writeln!(f, "  Parameter: t ∈ {}", pair_text(Some(self.parameter_range)))?;
        writeln!(f, "  x range: {}", pair_text(self.x_range))?;
        writeln!(f, "  y range: {}", pair_text(self.y_range))?;
        match self.curve_length {
            Some(length) => writeln!(f, "  Length: L ≈ {:.2}", length)?,
            None => writeln!(f, "  Length: not determined")?,
        }
        if self.special_points.value.is_empty() {
            writeln!(f, "  Special points: none found")?;
        } else {
            writeln!(f, "  Special points:")?;
            for p in &self.special_points.value {
                writeln!(f, "    {}", p)?;
            }
        }
        if self.self_intersections.is_empty() {
            writeln!(f, "  Self-intersections: none found")?;
        } else {
            let parts: Vec<String> = self.self_intersections.iter().map(|s| s.to_string()).collect();
            writeln!(f, "  Self-intersections: {}", parts.join("; "))?;
        }
        let CurvatureExtrema { min, max } = self.curvature_extrema.value;
        if min.is_none() && max.is_none() {
            return write!(f, "  Curvature extrema: not determined");
        }
        write!(f, "  Curvature extrema [{}]:", self.curvature_extrema.method)?;
        for (label, point) in [("minimum", min), ("maximum", max)] {
            if let Some(p) = point {
                write!(
                    f,
                    "\n    {} κ={:.3} at t={:.2}, ({:.2}, {:.2})",
                    label, p.kappa, p.t, p.x, p.y
                )?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TAGGED UNION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AnalysisReport {
    Standard(StandardReport),
    Parametric(ParametricReport),
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisReport::Standard(r) => write!(f, "{}", r),
            AnalysisReport::Parametric(r) => write!(f, "{}", r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_rendering() {
        assert_eq!(
            ValueRange::Bounded {
                lo: -1.0,
                hi: 1.0,
                approximate: false
            }
            .to_string(),
            "[-1; 1]"
        );
        assert_eq!(
            ValueRange::Bounded {
                lo: 0.0,
                hi: 24.99,
                approximate: true
            }
            .to_string(),
            "≈ [0; 24.99]"
        );
        assert_eq!(ValueRange::Above { min: -4.0 }.to_string(), "[-4.00; +∞)");
        assert_eq!(ValueRange::Unbounded.to_string(), "(−∞; +∞)");
    }

    #[test]
    fn placeholders_for_empty_fields() {
        let report = ParametricReport {
            x_expression: "t".into(),
            y_expression: "t".into(),
            parameter_range: (0.0, 1.0),
            x_range: None,
            y_range: Some((0.0, 1.0)),
            curve_length: None,
            special_points: Finding::symbolic(Vec::new()),
            self_intersections: Vec::new(),
            curvature_extrema: Finding::numeric(CurvatureExtrema::default()),
            curve_type: Finding::pattern(CurveType::Arbitrary),
        };
        let text = report.to_string();
        assert!(text.contains("x range: not determined"));
        assert!(text.contains("y range: [0.00; 1.00]"));
        assert!(text.contains("Special points: none found"));
        assert!(text.contains("Self-intersections: none found"));
        assert!(text.ends_with("Curvature extrema: not determined"));
    }

    #[test]
    fn extremum_rendering() {
        let e = Extremum {
            kind: ExtremumKind::Minimum,
            x: 0.0,
            y: -4.0,
        };
        assert_eq!(e.to_string(), "minimum at x ≈ 0.000, f(x) ≈ -4.000");
    }
}
