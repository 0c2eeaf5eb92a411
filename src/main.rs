use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fs;

use anyhow::{bail, Context, Result};
use colored::{ColoredString, Colorize};

use curvescope::params::{extract_parameters, substitute};
use curvescope::report::{AnalysisReport, CurvatureExtrema, Method, ParametricReport, StandardReport};
use curvescope::{analyze_function, analyze_parametric, find_intersections, AnalysisConfig, Interval, Span};

// =============================================================================
// CONFIGURATION
// =============================================================================
const DEFAULT_BOUNDS: (f64, f64) = (-10.0, 10.0);
const DEFAULT_PARAMETER_BOUNDS: (f64, f64) = (0.0, 2.0 * PI);

const USAGE: &str = "usage:
  curvescope [--config file.json] [--json] [--set a=1.5,b=-2] <f(x)> [lo hi]
  curvescope [--config file.json] [--json] --parametric <x(t)> <y(t)> [lo hi]
  curvescope [--config file.json] --intersect <f1(x)> <f2(x)> [lo hi]";

enum Mode {
    Showcase,
    Standard(String),
    Parametric(String, String),
    Intersect(String, String),
}

struct Options {
    mode: Mode,
    bounds: Option<(f64, f64)>,
    config: AnalysisConfig,
    json: bool,
    values: BTreeMap<char, f64>,
}

// =============================================================================
// ARGUMENTS
// =============================================================================

fn parse_args(args: Vec<String>) -> Result<Options> {
    let mut config = AnalysisConfig::default();
    let mut json = false;
    let mut values = BTreeMap::new();
    let mut positional = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a file path")?;
                let text = fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
                config = AnalysisConfig::from_json(&text).with_context(|| format!("parsing config {path}"))?;
            }
            "--json" => json = true,
            "--set" => {
                let assignments = iter.next().context("--set needs `name=value` pairs")?;
                for assignment in assignments.split(',') {
                    let (name, value) = parse_assignment(assignment)?;
                    values.insert(name, value);
                }
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            _ => positional.push(arg),
        }
    }

    let (mode, rest) = match positional.first().map(String::as_str) {
        None => (Mode::Showcase, &positional[..0]),
        Some(flag @ ("--parametric" | "--intersect")) => {
            if positional.len() < 3 {
                bail!("{flag} needs two formulas\n{USAGE}");
            }
            let (a, b) = (positional[1].clone(), positional[2].clone());
            let mode = if flag == "--parametric" {
                Mode::Parametric(a, b)
            } else {
                Mode::Intersect(a, b)
            };
            (mode, &positional[3..])
        }
        Some(_) => (Mode::Standard(positional[0].clone()), &positional[1..]),
    };

    let bounds = match rest {
        [] => None,
        [lo, hi] => Some((parse_bound(lo)?, parse_bound(hi)?)),
        _ => bail!("expected `lo hi` after the formulas\n{USAGE}"),
    };

    Ok(Options {
        mode,
        bounds,
        config,
        json,
        values,
    })
}

fn parse_assignment(text: &str) -> Result<(char, f64)> {
    let (name, value) = text
        .split_once('=')
        .with_context(|| format!("`{text}` is not a `name=value` pair"))?;
    let mut letters = name.trim().chars();
    let (Some(letter), None) = (letters.next(), letters.next()) else {
        bail!("parameter name `{name}` must be a single letter");
    };
    let value = value.trim().parse::<f64>().with_context(|| format!("`{value}` is not a number"))?;
    Ok((letter.to_ascii_lowercase(), value))
}

/// Substitutes `--set` values, snapped to multiples of 0.5.
fn bind(raw: &str, values: &BTreeMap<char, f64>) -> String {
    if values.is_empty() {
        return raw.to_string();
    }
    let bound = substitute(raw, values);
    println!("{}{}", "With parameters: ".dimmed(), bound.dimmed());
    bound
}

fn parse_bound(text: &str) -> Result<f64> {
    if text == "pi" {
        return Ok(PI);
    }
    if text == "2pi" {
        return Ok(2.0 * PI);
    }
    text.parse().with_context(|| format!("`{text}` is not a number"))
}

fn interval((lo, hi): (f64, f64)) -> Result<Interval> {
    Interval::new(lo, hi).context("invalid interval")
}

// =============================================================================
// OUTPUT
// =============================================================================

fn method_colored(text: String, method: Method) -> ColoredString {
    match method {
        Method::Symbolic => text.green(),
        Method::Pattern => text.cyan(),
        Method::Numeric => text.yellow(),
    }
}

fn spans_text(spans: &[Span]) -> String {
    if spans.is_empty() {
        return "none".to_string();
    }
    spans.iter().map(|s| s.display_fixed(2)).collect::<Vec<_>>().join(", ")
}

fn pair_text(pair: Option<(f64, f64)>) -> String {
    match pair {
        Some((lo, hi)) => format!("[{lo:.2}; {hi:.2}]"),
        None => "not determined".to_string(),
    }
}

fn print_field(label: &str, text: String, method: Method) {
    println!("  {}{} {}", label.green(), method_colored(text, method), format!("[{method}]").dimmed());
}

fn print_list<T: ToString>(label: &str, items: &[T], method: Method) {
    if items.is_empty() {
        println!("  {}{}", label.green(), "none found".dimmed());
        return;
    }
    println!("  {}{}", label.green(), format!("[{method}]").dimmed());
    for item in items {
        println!("    {}", method_colored(item.to_string(), method));
    }
}

fn print_standard(r: &StandardReport) {
    print_field("Domain D(f) = ", r.domain.value.to_string(), r.domain.method);
    print_field("Range E(f): ", r.range.value.to_string(), r.range.method);
    let zeros: Vec<String> = r.zeros.value.iter().map(|z| format!("x = {z}")).collect();
    print_list("Zeros: ", &zeros, r.zeros.method);
    println!("  {}{}", "f(x) > 0: ".green(), spans_text(&r.sign.positive));
    println!("  {}{}", "f(x) < 0: ".green(), spans_text(&r.sign.negative));
    print_list("Extrema: ", &r.extrema.value, r.extrema.method);
    print_field("Increasing: ", spans_text(&r.monotonicity.value.increasing), r.monotonicity.method);
    print_field("Decreasing: ", spans_text(&r.monotonicity.value.decreasing), r.monotonicity.method);
    print_field("Parity: ", r.parity.value.to_string(), r.parity.method);
}

fn print_parametric(r: &ParametricReport) {
    print_field("Curve type: ", r.curve_type.value.to_string(), r.curve_type.method);
    println!("  {}{}", "Parameter: t ∈ ".green(), pair_text(Some(r.parameter_range)));
    println!("  {}{}", "x range: ".green(), pair_text(r.x_range));
    println!("  {}{}", "y range: ".green(), pair_text(r.y_range));
    match r.curve_length {
        Some(length) => println!("  {}{length:.2}", "Length: L ≈ ".green()),
        None => println!("  {}{}", "Length: ".green(), "not determined".dimmed()),
    }
    print_list("Special points: ", &r.special_points.value, r.special_points.method);
    print_list("Self-intersections: ", &r.self_intersections, Method::Numeric);
    let CurvatureExtrema { min, max } = r.curvature_extrema.value;
    let kappa: Vec<String> = [("minimum", min), ("maximum", max)]
        .into_iter()
        .filter_map(|(label, point)| {
            point.map(|p| format!("{label} κ={:.3} at t={:.2}, ({:.2}, {:.2})", p.kappa, p.t, p.x, p.y))
        })
        .collect();
    print_list("Curvature extrema: ", &kappa, r.curvature_extrema.method);
}

fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).context("serialising report")?);
        return Ok(());
    }
    match report {
        AnalysisReport::Standard(r) => print_standard(r),
        AnalysisReport::Parametric(r) => print_parametric(r),
    }
    Ok(())
}

fn run_standard(raw: &str, bounds: (f64, f64), config: &AnalysisConfig, json: bool) -> Result<()> {
    println!("{}{}", "Input: ".cyan().bold(), raw.cyan());
    let free = extract_parameters(raw);
    if !free.is_empty() {
        let names: Vec<String> = free.iter().map(char::to_string).collect();
        println!("{}{}", "Free parameters: ".dimmed(), names.join(", ").dimmed());
    }
    let report = analyze_function(raw, interval(bounds)?, config).with_context(|| format!("analysing `{raw}`"))?;
    print_report(&report, json)
}

fn run_parametric(raw_x: &str, raw_y: &str, bounds: (f64, f64), config: &AnalysisConfig, json: bool) -> Result<()> {
    println!("{}x(t) = {}, y(t) = {}", "Input: ".cyan().bold(), raw_x.cyan(), raw_y.cyan());
    let report = analyze_parametric(raw_x, raw_y, interval(bounds)?, config)
        .with_context(|| format!("analysing ({raw_x}, {raw_y})"))?;
    print_report(&report, json)
}

fn run_intersect(raw_f1: &str, raw_f2: &str, bounds: (f64, f64), config: &AnalysisConfig) -> Result<()> {
    println!("{}{} ∩ {}", "Input: ".cyan().bold(), raw_f1.cyan(), raw_f2.cyan());
    let points = find_intersections(raw_f1, raw_f2, interval(bounds)?, config)
        .with_context(|| format!("intersecting `{raw_f1}` and `{raw_f2}`"))?;
    if points.is_empty() {
        println!("{}", "No intersections found".yellow());
    }
    for p in &points {
        println!("  {}", p.to_string().green());
    }
    Ok(())
}

// =============================================================================
// SHOWCASE
// =============================================================================

fn showcase(config: &AnalysisConfig) {
    println!("{}", "=== CURVESCOPE ===\n".magenta().bold());

    let standard = [
        "x^2 - 4",
        "x^3 - 3x",
        "1/x",
        "sqrt(x)",
        "ln(x)",
        "sin(x)",
        "tan(x)",
        "x*sin(x)",
        "exp(-x^2)",
        "(x^2 - 1)/(x^2 + 1)",
        "abs(x)",
        "a*x^2 + b",
    ];
    println!("{}", "--- Explicit curves ---".white().bold());
    for raw in standard {
        if let Err(err) = run_standard(raw, DEFAULT_BOUNDS, config, false) {
            println!("{}", format!("{err:#}").red());
        }
        println!();
    }

    let values = BTreeMap::from([('a', 1.3), ('b', -0.8)]);
    if let Err(err) = run_standard(&bind("a*x^2 + b", &values), DEFAULT_BOUNDS, config, false) {
        println!("{}", format!("{err:#}").red());
    }
    println!();

    let parametric = [
        ("cos(t)", "sin(t)"),
        ("3cos(t)", "2sin(t)"),
        ("t*sin(t)", "t*cos(t)"),
        ("t - sin(t)", "1 - cos(t)"),
        ("sin(t)", "sin(2t)"),
        ("t^3", "t^2"),
    ];
    println!("{}", "--- Parametric curves ---".white().bold());
    for (x, y) in parametric {
        if let Err(err) = run_parametric(x, y, DEFAULT_PARAMETER_BOUNDS, config, false) {
            println!("{}", format!("{err:#}").red());
        }
        println!();
    }

    println!("{}", "--- Intersections ---".white().bold());
    for (f1, f2) in [("x", "x^2"), ("sin(x)", "cos(x)"), ("x + 1", "x")] {
        if let Err(err) = run_intersect(f1, f2, DEFAULT_BOUNDS, config) {
            println!("{}", format!("{err:#}").red());
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = &options.config;
    let values = &options.values;
    match &options.mode {
        Mode::Showcase => showcase(config),
        Mode::Standard(raw) => run_standard(
            &bind(raw, values),
            options.bounds.unwrap_or(DEFAULT_BOUNDS),
            config,
            options.json,
        )?,
        Mode::Parametric(x, y) => run_parametric(
            &bind(x, values),
            &bind(y, values),
            options.bounds.unwrap_or(DEFAULT_PARAMETER_BOUNDS),
            config,
            options.json,
        )?,
        Mode::Intersect(f1, f2) => run_intersect(
            &bind(f1, values),
            &bind(f2, values),
            options.bounds.unwrap_or(DEFAULT_BOUNDS),
            config,
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_values_reach_the_formula() {
        let options = parse_args(args(&["--set", "a=1.3,b=-0.8", "a*x + b", "-2", "2"])).unwrap();
        assert_eq!(options.values, BTreeMap::from([('a', 1.3), ('b', -0.8)]));
        assert_eq!(options.bounds, Some((-2.0, 2.0)));
        let Mode::Standard(raw) = &options.mode else {
            panic!("expected standard mode");
        };
        assert_eq!(bind(raw, &options.values), "1.5*x + (-1)");
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(parse_assignment("a").is_err());
        assert!(parse_assignment("ab=1").is_err());
        assert!(parse_assignment("a=x").is_err());
        assert_eq!(parse_assignment(" K = 2 ").unwrap(), ('k', 2.0));
    }

    #[test]
    fn field_text_placeholders() {
        assert_eq!(pair_text(None), "not determined");
        assert_eq!(pair_text(Some((0.0, 1.5))), "[0.00; 1.50]");
        assert_eq!(spans_text(&[]), "none");
    }
}
