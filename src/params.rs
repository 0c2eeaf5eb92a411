//! Free single-letter parameters such as the `a` in `a*sin(x)`.
//!
//! Both operations work on normalised text, so `2a` is seen as `2*a`.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::normalize_text;

static KNOWN_NAMES: Lazy<Regex> = Lazy::new(|| compile(r"\b(sin|cos|tan|cot|asin|acos|atan|sqrt|log|exp|abs|pi|e)\b"));
// Every single letter except the variables `t` and `x`.
static PARAMETER: Lazy<Regex> = Lazy::new(|| compile(r"\b([a-su-wyz])\b"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid parameter pattern {pattern}: {e}"))
}

/// Sorted, distinct parameter letters of `raw`.
pub fn extract_parameters(raw: &str) -> Vec<char> {
    let text = normalize_text(raw);
    let stripped = KNOWN_NAMES.replace_all(&text, " ");
    let found: BTreeSet<char> = PARAMETER
        .captures_iter(&stripped)
        .filter_map(|caps| caps[1].chars().next())
        .collect();
    found.into_iter().collect()
}

/// Snaps a parameter value to the nearest multiple of 0.5.
pub fn snap(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Replaces every parameter in `values` with its snapped value.
/// Parameters without a value are left in place.
pub fn substitute(raw: &str, values: &BTreeMap<char, f64>) -> String {
    let mut text = normalize_text(raw);
    for (&name, &value) in values {
        let Ok(pattern) = Regex::new(&format!(r"\b{name}\b")) else {
            continue;
        };
        let value = snap(value);
        let literal = if value < 0.0 {
            format!("({value})")
        } else {
            format!("{value}")
        };
        text = pattern.replace_all(&text, literal.as_str()).into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_letters_only() {
        assert_eq!(extract_parameters("a*sin(b*x) + c"), vec!['a', 'b', 'c']);
        assert_eq!(extract_parameters("2k*x + e^x"), vec!['k']);
        assert_eq!(extract_parameters("r*cos(t)"), vec!['r']);
        assert!(extract_parameters("sqrt(x) + pi").is_empty());
    }

    #[test]
    fn duplicates_are_reported_once() {
        assert_eq!(extract_parameters("b*x^2 + b*x + a"), vec!['a', 'b']);
    }

    #[test]
    fn substitution_snaps_to_halves() {
        let values = BTreeMap::from([('a', 1.3), ('b', -0.8)]);
        assert_eq!(substitute("a*x + b", &values), "1.5*x + (-1)");
        assert_eq!(snap(2.74), 2.5);
    }

    #[test]
    fn unknown_parameters_stay() {
        let values = BTreeMap::from([('a', 2.0)]);
        assert_eq!(substitute("a*x + c", &values), "2*x + c");
    }
}
