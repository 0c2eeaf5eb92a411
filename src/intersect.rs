//! Crossing points of two explicit curves.

use std::fmt;

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::evaluator::NumericFunction;
use crate::interval::Interval;
use crate::roots::Bisection;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntersectionPoint {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for IntersectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// Scans `f1 - f2` for sign changes and refines each by bisection.
///
/// Points closer than the merge distance to an earlier point are dropped,
/// so the first crossing found in scan order wins. `y` is read from `f1`.
pub fn find_intersections(
    f1: &NumericFunction,
    f2: &NumericFunction,
    interval: &Interval,
    config: &AnalysisConfig,
) -> Vec<IntersectionPoint> {
    let gap = |x: f64| f1.eval(x) - f2.eval(x);
    let roots = Bisection::from_config(&config.tolerance).scan(gap, interval, config.sampling.intersection_scan);
    let merge = config.tolerance.intersection_merge;

    let mut points: Vec<IntersectionPoint> = Vec::new();
    for x in roots {
        if points.iter().any(|p| (p.x - x).abs() < merge) {
            continue;
        }
        let y = f1.eval(x);
        points.push(IntersectionPoint { x, y });
    }
    log::debug!("{} intersection(s) on {}", points.len(), interval);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CanonicalExpression;

    fn function(raw: &str) -> NumericFunction {
        NumericFunction::new(&CanonicalExpression::parse(raw).unwrap(), "x")
    }

    fn intersections(a: &str, b: &str, lo: f64, hi: f64) -> Vec<IntersectionPoint> {
        find_intersections(
            &function(a),
            &function(b),
            &Interval::new(lo, hi).unwrap(),
            &AnalysisConfig::default(),
        )
    }

    #[test]
    fn line_meets_parabola_twice() {
        let points = intersections("x", "x^2", -2.0, 2.0);
        assert_eq!(points.len(), 2);
        assert!(points[0].x.abs() < 0.1 && points[0].y.abs() < 0.1);
        assert!((points[1].x - 1.0).abs() < 0.1 && (points[1].y - 1.0).abs() < 0.1);
    }

    #[test]
    fn parallel_lines_never_meet() {
        assert!(intersections("x + 1", "x", -10.0, 10.0).is_empty());
    }

    #[test]
    fn close_crossings_merge_into_the_first() {
        // sin(40x) crosses 0 every π/40 ≈ 0.0785, inside the merge distance.
        let points = intersections("sin(40x)", "0", 0.05, 1.0);
        assert!(points.windows(2).all(|w| w[1].x - w[0].x >= 0.1));
        assert!((points[0].x - std::f64::consts::PI / 40.0).abs() < 1e-4);
    }
}
