use std::f64::consts::PI;

use curvescope::normalize::normalize_text;
use curvescope::report::{CurveType, ExtremumKind, Monotonicity, Parity};
use curvescope::{
    analyze_function, analyze_parametric, find_intersections, AnalysisConfig, AnalysisReport, CanonicalExpression,
    Interval, NumericFunction, ParametricReport, Span, StandardReport,
};

fn standard(raw: &str, lo: f64, hi: f64) -> StandardReport {
    standard_with(raw, lo, hi, &AnalysisConfig::default())
}

fn standard_with(raw: &str, lo: f64, hi: f64, config: &AnalysisConfig) -> StandardReport {
    match analyze_function(raw, Interval::new(lo, hi).unwrap(), config).unwrap() {
        AnalysisReport::Standard(report) => report,
        other => panic!("expected a standard report, got {other:?}"),
    }
}

fn parametric(x: &str, y: &str, lo: f64, hi: f64) -> ParametricReport {
    match analyze_parametric(x, y, Interval::new(lo, hi).unwrap(), &AnalysisConfig::default()).unwrap() {
        AnalysisReport::Parametric(report) => report,
        other => panic!("expected a parametric report, got {other:?}"),
    }
}

fn numeric_only() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.symbolic.enabled = false;
    config
}

const FORMULAS: [&str; 12] = [
    "x^2 - 4",
    "3x^2 - 2x + 1",
    "sin(x)cos(x)",
    "1/x",
    "sqrt(x)",
    "ln(abs(x))",
    "tg(x) + ctg(x)",
    "arcsin(x/10)",
    "x^x",
    "exp(-x^2)",
    "(x+1)(x-1)",
    "x % 3",
];

#[test]
fn normalisation_is_idempotent() {
    for raw in FORMULAS {
        let once = normalize_text(raw);
        assert_eq!(normalize_text(&once), once, "{raw}");
    }
}

#[test]
fn numeric_functions_never_fail() {
    let interval = Interval::new(-10.0, 10.0).unwrap();
    for raw in FORMULAS {
        let f = NumericFunction::new(&CanonicalExpression::parse(raw).unwrap(), "x");
        for x in interval.linspace(401).into_iter().chain([0.0, -0.0]) {
            let y = f.eval(x);
            assert!(y.is_finite() || y.is_nan() || y.is_infinite(), "{raw} at {x}");
        }
    }
}

#[test]
fn parse_errors_surface() {
    let interval = Interval::new(-1.0, 1.0).unwrap();
    assert!(analyze_function("x +* 2", interval, &AnalysisConfig::default()).is_err());
    assert!(analyze_function("", interval, &AnalysisConfig::default()).is_err());
}

#[test_log::test]
fn zeros_of_shifted_parabola() {
    for config in [AnalysisConfig::default(), numeric_only()] {
        let report = standard_with("x**2 - 4", -5.0, 5.0, &config);
        let zeros = &report.zeros.value;
        assert_eq!(zeros.len(), 2, "{:?}", report.zeros);
        assert!((zeros[0] + 2.0).abs() < 1e-4);
        assert!((zeros[1] - 2.0).abs() < 1e-4);
    }
}

#[test]
fn sign_of_identity() {
    let report = standard("x", -5.0, 5.0);
    assert_eq!(report.sign.positive, vec![Span::new(0.0, 5.0, false, true)]);
    assert_eq!(report.sign.negative, vec![Span::new(-5.0, 0.0, true, false)]);
}

#[test_log::test]
fn parity_classes() {
    for config in [AnalysisConfig::default(), numeric_only()] {
        assert_eq!(standard_with("x**2", -3.0, 3.0, &config).parity.value, Parity::Even);
        assert_eq!(standard_with("x**3", -3.0, 3.0, &config).parity.value, Parity::Odd);
        assert_eq!(standard_with("x+1", -3.0, 3.0, &config).parity.value, Parity::General);
    }
    assert_eq!(standard("x**2", -1.0, 3.0).parity.value, Parity::Asymmetric);
}

#[test_log::test]
fn parabola_has_single_minimum_at_origin() {
    for config in [AnalysisConfig::default(), numeric_only()] {
        let extrema = standard_with("x**2", -5.0, 5.0, &config).extrema.value;
        assert_eq!(extrema.len(), 1);
        assert_eq!(extrema[0].kind, ExtremumKind::Minimum);
        assert!(extrema[0].x.abs() < 1e-3);
        assert!(extrema[0].y.abs() < 1e-3);
    }
}

#[test]
fn line_and_parabola_intersect_twice() {
    let points = find_intersections("x", "x**2", Interval::new(-2.0, 2.0).unwrap(), &AnalysisConfig::default()).unwrap();
    assert_eq!(points.len(), 2);
    assert!(points[0].x.abs() < 0.1 && points[0].y.abs() < 0.1);
    assert!((points[1].x - 1.0).abs() < 0.1 && (points[1].y - 1.0).abs() < 0.1);
}

#[test]
fn unit_circle_is_classified() {
    let report = parametric("cos(t)", "sin(t)", 0.0, 2.0 * PI);
    match report.curve_type.value {
        CurveType::Circle { radius } => assert!((radius - 1.0).abs() < 1e-6),
        other => panic!("expected a circle, got {other:?}"),
    }
    let length = report.curve_length.unwrap();
    assert!((length - 2.0 * PI).abs() < 0.1);
}

fn assert_partition(monotonicity: &Monotonicity, lo: f64, hi: f64, raw: &str) {
    let mut spans: Vec<Span> = monotonicity
        .increasing
        .iter()
        .chain(monotonicity.decreasing.iter())
        .copied()
        .collect();
    spans.sort_by(|a, b| a.lo.partial_cmp(&b.lo).unwrap());
    assert!(!spans.is_empty(), "{raw}");
    assert_eq!(spans[0].lo, lo, "{raw}");
    assert_eq!(spans[spans.len() - 1].hi, hi, "{raw}");
    // Neighbouring runs share their endpoint exactly: no gap, no overlap.
    for pair in spans.windows(2) {
        assert_eq!(pair[1].lo, pair[0].hi, "{raw}: {:?} then {:?}", pair[0], pair[1]);
    }
}

#[test_log::test]
fn monotonicity_partitions_the_interval() {
    for raw in ["x^2", "x^3 - 3x", "sin(x)", "exp(x)", "x + cos(x)"] {
        for config in [AnalysisConfig::default(), numeric_only()] {
            let report = standard_with(raw, -5.0, 5.0, &config);
            assert_partition(&report.monotonicity.value, -5.0, 5.0, raw);
        }
    }
}

#[test]
fn analysis_is_deterministic() {
    for raw in FORMULAS {
        let a = standard(raw, -4.0, 4.0);
        let b = standard(raw, -4.0, 4.0);
        assert_eq!(a.to_string(), b.to_string(), "{raw}");
    }
}

#[test]
fn reports_serialise_with_mode_tag() {
    let report = analyze_function("x^2", Interval::new(-1.0, 1.0).unwrap(), &AnalysisConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "standard");
    assert_eq!(json["parity"]["value"], "Even");
}

#[test]
fn every_field_degrades_instead_of_failing() {
    let report = standard("sqrt(x)", -3.0, -1.0);
    assert!(report.zeros.value.is_empty());
    assert!(report.extrema.value.is_empty());
    assert!(report.sign.positive.is_empty() && report.sign.negative.is_empty());
    assert!(report.to_string().contains("none found"));
}
