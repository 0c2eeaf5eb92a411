//! Formula normalisation, safe evaluation and qualitative analysis of
//! explicit curves `y = f(x)` and parametric curves `x = x(t)`, `y = y(t)`.
//!
//! ```no_run
//! use curvescope::{analyze_function, AnalysisConfig, Interval};
//!
//! let report = analyze_function("x^2 - 4", Interval::new(-5.0, 5.0)?, &AnalysisConfig::default())?;
//! println!("{report}");
//! # Ok::<(), curvescope::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod expr;
pub mod interval;
pub mod intersect;
pub mod normalize;
pub mod parametric;
pub mod params;
pub mod report;
pub mod roots;
pub mod standard;
pub mod symbolic;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use evaluator::NumericFunction;
pub use interval::{Domain, Interval, Span};
pub use intersect::IntersectionPoint;
pub use normalize::CanonicalExpression;
pub use parametric::ParametricAnalyzer;
pub use report::{AnalysisReport, Finding, Method, ParametricReport, StandardReport};
pub use standard::StandardAnalyzer;

/// Normalises `raw` in the variable `x` and analyses it over `interval`.
pub fn analyze_function(raw: &str, interval: Interval, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let canonical = CanonicalExpression::parse(raw)?;
    let report = StandardAnalyzer::new(&canonical, interval, config).analyze();
    Ok(AnalysisReport::Standard(report))
}

/// Normalises `raw_x`, `raw_y` in the parameter `t` and analyses the curve
/// over the parameter interval.
pub fn analyze_parametric(
    raw_x: &str,
    raw_y: &str,
    interval: Interval,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let x = CanonicalExpression::parse(raw_x)?;
    let y = CanonicalExpression::parse(raw_y)?;
    let report = ParametricAnalyzer::new(&x, &y, interval, config).analyze();
    Ok(AnalysisReport::Parametric(report))
}

/// Crossing points of `y = f1(x)` and `y = f2(x)` inside `interval`.
pub fn find_intersections(
    raw_f1: &str,
    raw_f2: &str,
    interval: Interval,
    config: &AnalysisConfig,
) -> Result<Vec<IntersectionPoint>> {
    let f1 = NumericFunction::new(&CanonicalExpression::parse(raw_f1)?, "x");
    let f2 = NumericFunction::new(&CanonicalExpression::parse(raw_f2)?, "x");
    Ok(intersect::find_intersections(&f1, &f2, &interval, config))
}
