//! Expression normaliser: user text → canonical expression.
//!
//! The rewrite rules run in a fixed order, each one consuming the previous
//! one's output:
//!
//! 1. lowercase and trim
//! 2. power notation (`^`, `²`, `³` → `**`)
//! 3. function aliases (`arcsin`, `ln`, `tg`, `ctg`, ...)
//! 4. implicit multiplication
//! 5. cleanup of `name*(` artifacts for known functions
//!
//! Running the rules on their own output changes nothing.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::expr::{Expr, Func};

// =============================================================================
// RULE TABLES
// =============================================================================
static FUNCTION_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b(?:arcsin|asin)\(", "asin("),
        (r"\b(?:arccos|acos)\(", "acos("),
        (r"\b(?:arctan|atan)\(", "atan("),
        (r"\bln\(", "log("),
        (r"\b(?:tg|tag)\(", "tan("),
        (r"\b(?:cot|ctg)\(", "cot("),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (compile(pattern), replacement))
    .collect()
});

static DIGIT_LETTER: Lazy<Regex> = Lazy::new(|| compile(r"(\d)([a-z])"));
static CALL_SITE: Lazy<Regex> = Lazy::new(|| compile(r"([a-z_][a-z0-9_]*|\))\("));
static PAREN_OPERAND: Lazy<Regex> = Lazy::new(|| compile(r"\)([a-z0-9])"));
static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| compile(r"([a-z])(\d)"));
static FUNCTION_STAR: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<&str> = Func::ALL.iter().map(|f| f.name()).collect();
    compile(&format!(r"\b({})\*\(", names.join("|")))
});

fn compile(pattern: &str) -> Regex {
    // Patterns are literals of this module; a failure is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid normaliser pattern {pattern}: {e}"))
}

// =============================================================================
// NORMALISATION
// =============================================================================

/// Applies the rewrite rules to raw user text.
pub fn normalize_text(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();

    s = s.replace('^', "**").replace('²', "**2").replace('³', "**3");

    for (pattern, replacement) in FUNCTION_ALIASES.iter() {
        s = pattern.replace_all(&s, *replacement).into_owned();
    }

    s = DIGIT_LETTER.replace_all(&s, "$1*$2").into_owned();
    s = CALL_SITE
        .replace_all(&s, |caps: &Captures| {
            let head = &caps[1];
            if Func::from_name(head).is_some() {
                format!("{head}(")
            } else {
                format!("{head}*(")
            }
        })
        .into_owned();
    s = PAREN_OPERAND.replace_all(&s, ")*$1").into_owned();
    s = LETTER_DIGIT.replace_all(&s, "$1*$2").into_owned();

    FUNCTION_STAR.replace_all(&s, "$1(").into_owned()
}

/// Rewrites canonical text into the dialect meval tokenises.
fn meval_dialect(canonical: &str) -> String {
    canonical.replace("**", "^")
}

/// Normalised formula together with its parsed tree. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalExpression {
    text: String,
    tree: Expr,
}

impl CanonicalExpression {
    /// Normalises `raw` and checks that the result is an evaluable expression.
    pub fn parse(raw: &str) -> Result<Self> {
        let text = normalize_text(raw);
        if text.is_empty() {
            return Err(Error::EmptyExpression);
        }
        let tree = Expr::parse(&meval_dialect(&text)).map_err(|err| match err {
            Error::Parse { reason, .. } => Error::Parse {
                expr: text.clone(),
                reason,
            },
            other => other,
        })?;
        log::trace!("normalised `{}` to `{}`", raw.trim(), text);
        Ok(CanonicalExpression { text, tree })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &Expr {
        &self.tree
    }
}

impl fmt::Display for CanonicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_notation() {
        assert_eq!(normalize_text("X^2"), "x**2");
        assert_eq!(normalize_text("x² + x³"), "x**2 + x**3");
    }

    #[test]
    fn function_aliases() {
        assert_eq!(normalize_text("arcsin(x)"), "asin(x)");
        assert_eq!(normalize_text("ln(x)"), "log(x)");
        assert_eq!(normalize_text("tg(x) + ctg(x)"), "tan(x) + cot(x)");
        assert_eq!(normalize_text("arctan(x)"), "atan(x)");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(normalize_text("2x"), "2*x");
        assert_eq!(normalize_text("2sin(x)"), "2*sin(x)");
        assert_eq!(normalize_text("x(x+1)"), "x*(x+1)");
        assert_eq!(normalize_text("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(normalize_text("(x+1)x"), "(x+1)*x");
        assert_eq!(normalize_text("x2"), "x*2");
        assert_eq!(normalize_text("3x^2 - 2x + 1"), "3*x**2 - 2*x + 1");
    }

    #[test]
    fn function_calls_survive() {
        assert_eq!(normalize_text("sin(x)cos(x)"), "sin(x)*cos(x)");
        assert_eq!(normalize_text("sqrt(x)"), "sqrt(x)");
        assert_eq!(normalize_text("abs(x)"), "abs(x)");
    }

    #[test]
    fn already_canonical_is_fixed_point() {
        for raw in [
            "x**2 - 4",
            "2*x**3 + sin(x)",
            "cot(t)*t",
            "(x+1)*(x-1)",
            "sqrt(abs(x))/x",
            "log(x**2 + 1)",
            "1 - cos(t)",
        ] {
            assert_eq!(normalize_text(raw), raw);
        }
        for raw in ["3x^2 - 2x", "ln(x)(x+1)", "2sin(x)²", "arccos(x)x3"] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn canonical_expression_parses() {
        let c = CanonicalExpression::parse(" 2X^2 ").unwrap();
        assert_eq!(c.as_str(), "2*x**2");
        assert_eq!(c.tree().eval("x", 3.0), Ok(18.0));
    }

    #[test]
    fn unparseable_input_is_rejected() {
        assert!(matches!(CanonicalExpression::parse("   "), Err(Error::EmptyExpression)));
        assert!(matches!(CanonicalExpression::parse("x +* 2"), Err(Error::Parse { .. })));
        assert!(matches!(CanonicalExpression::parse("sin(x"), Err(Error::Parse { .. })));
    }
}
