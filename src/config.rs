//! Tunable sample counts and tolerances for the analyzers.
//!
//! `AnalysisConfig::default()` holds the stock sample counts and thresholds.
//! A JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Root of the analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Grid sizes used by the sampling loops.
    pub sampling: SamplingConfig,
    /// Numeric thresholds and dead bands.
    pub tolerance: ToleranceConfig,
    /// Symbolic fast-path switches.
    pub symbolic: SymbolicConfig,
}

impl AnalysisConfig {
    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(text)?;
        if config.sampling.has_zero_count() {
            log::warn!("sampling config contains a zero count; affected features will report nothing");
        }
        Ok(config)
    }
}

/// Number of sub-intervals or samples per feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Sub-intervals scanned for zeros of f.
    pub zero_scan: usize,
    /// Sub-intervals scanned for crossings of two curves.
    pub intersection_scan: usize,
    /// Sub-intervals of the discrete extremum scan.
    pub extrema_scan: usize,
    /// Samples behind the numeric range estimate.
    pub range_samples: usize,
    /// Consecutive sample pairs of the numeric monotonicity scan.
    pub monotonicity_pairs: usize,
    /// Probe points of the numeric parity check.
    pub parity_probes: usize,
    /// Samples per coordinate for parametric x/y ranges.
    pub coordinate_samples: usize,
    /// Samples of the polyline approximating curve length.
    pub length_samples: usize,
    /// Samples bucketed by the self-intersection search.
    pub self_intersection_samples: usize,
    /// Samples of the curvature scan.
    pub curvature_samples: usize,
}

impl SamplingConfig {
    fn has_zero_count(&self) -> bool {
        [
            self.zero_scan,
            self.intersection_scan,
            self.extrema_scan,
            self.range_samples,
            self.monotonicity_pairs,
            self.parity_probes,
            self.coordinate_samples,
            self.length_samples,
            self.self_intersection_samples,
            self.curvature_samples,
        ]
        .contains(&0)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            zero_scan: 1000,
            intersection_scan: 2000,
            extrema_scan: 500,
            range_samples: 2000,
            monotonicity_pairs: 100,
            parity_probes: 10,
            coordinate_samples: 1000,
            length_samples: 2000,
            self_intersection_samples: 500,
            curvature_samples: 500,
        }
    }
}

/// Numeric thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToleranceConfig {
    /// |g| below this is a root; also the bisection half-width stop.
    pub root: f64,
    /// Bisection iteration budget.
    pub max_bisect_iterations: usize,
    /// |f| at or below this counts as neither positive nor negative.
    pub sign_dead_band: f64,
    /// Minimum rise/fall for a discrete local extremum.
    pub extremum_dead_band: f64,
    /// Minimum derivative (or rise per step) for monotone classification.
    pub monotonicity_dead_band: f64,
    /// Parity probe agreement threshold.
    pub parity: f64,
    /// Sampled magnitude beyond which a range is reported unbounded.
    pub unbounded_magnitude: f64,
    /// Crossings closer than this along x are merged.
    pub intersection_merge: f64,
    /// Minimum parameter separation of a self-intersection.
    pub self_intersection_separation: f64,
    /// Maximum radius spread for a circle.
    pub circle_spread: f64,
    /// Curvature samples with a smaller denominator are skipped.
    pub curvature_floor: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        ToleranceConfig {
            root: 1e-6,
            max_bisect_iterations: 50,
            sign_dead_band: 1e-9,
            extremum_dead_band: 1e-9,
            monotonicity_dead_band: 1e-6,
            parity: 1e-4,
            unbounded_magnitude: 1e6,
            intersection_merge: 0.1,
            self_intersection_separation: 0.1,
            circle_spread: 0.1,
            curvature_floor: 1e-9,
        }
    }
}

/// Symbolic fast-path switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SymbolicConfig {
    /// Disable to force every field onto its numeric strategy.
    pub enabled: bool,
    /// Expression trees with more nodes than this are never lifted.
    pub node_limit: usize,
}

impl Default for SymbolicConfig {
    fn default() -> Self {
        SymbolicConfig {
            enabled: true,
            node_limit: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(r#"{ "sampling": { "zero_scan": 400 } }"#).unwrap();
        assert_eq!(config.sampling.zero_scan, 400);
        assert_eq!(config.sampling.intersection_scan, 2000);
        assert_eq!(config.tolerance, ToleranceConfig::default());
        assert!(config.symbolic.enabled);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AnalysisConfig::from_json("{ sampling: ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
