//! # Macro Functions
//!
//! Post-processing applied to a resolved macro value when the macro is
//! written as `{{<macro>}.<function>(<params>)}`.
//!
//! | Function | Parameters | Result |
//! |----------|------------|--------|
//! | `regsub` | pattern, output | `output` with `\0`..`\9` replaced by capture groups of the first match, `""` on no match |
//! | `iregsub` | pattern, output | as `regsub`, case-insensitive |
//! | `fmtnum` | digits | fractional number rounded to `digits` decimals |
//! | `lowercase` / `uppercase` | none | case conversion |
//! | `ltrim` / `rtrim` / `trim` | optional character set | whitespace or the given characters removed |
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::MacroFunction;
//! use macro_resolver::macro_function::apply_macro_function;
//!
//! let function = MacroFunction {
//!     name: "regsub".to_string(),
//!     inner: "{$VERSION}".to_string(),
//!     parameters: vec![r"^(\d+)\.".to_string(), r"v\1".to_string()],
//! };
//! assert_eq!(apply_macro_function("6.4.2", &function).as_deref(), Some("v6"));
//! ```

use macro_parser::MacroFunction;
use regex::{Captures, RegexBuilder};
use tracing::trace;

/// Most decimals `fmtnum` accepts.
const MAX_FMTNUM_DIGITS: usize = 20;

/// Apply `function` to `value`.
///
/// Returns `None` for unknown functions, wrong parameter counts, invalid
/// patterns or invalid digit counts.
pub fn apply_macro_function(value: &str, function: &MacroFunction) -> Option<String> {
    let params = function.parameters.as_slice();

    let result = match (function.name.as_str(), params) {
        ("regsub", [pattern, output]) => regsub(value, pattern, output, false),
        ("iregsub", [pattern, output]) => regsub(value, pattern, output, true),
        ("fmtnum", [digits]) => fmtnum(value, digits),
        ("lowercase", []) => Some(value.to_lowercase()),
        ("uppercase", []) => Some(value.to_uppercase()),
        ("ltrim", chars) => trim_with(chars, |set| value.trim_start_matches(set)),
        ("rtrim", chars) => trim_with(chars, |set| value.trim_end_matches(set)),
        ("trim", chars) => trim_with(chars, |set| value.trim_matches(set)),
        _ => None,
    };

    if result.is_none() {
        trace!(function = %function.name, params = params.len(), "macro function failed");
    }
    result
}

fn regsub(value: &str, pattern: &str, output: &str, case_insensitive: bool) -> Option<String> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .ok()?;

    Some(match regex.captures(value) {
        Some(captures) => expand(output, &captures),
        None => String::new(),
    })
}

/// Replace `\N` in `output` with capture group N, empty when absent.
fn expand(output: &str, captures: &Captures<'_>) -> String {
    let mut result = String::with_capacity(output.len());
    let mut chars = output.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(group) = chars.peek().and_then(|d| d.to_digit(10)) {
                chars.next();
                result.push_str(captures.get(group as usize).map_or("", |m| m.as_str()));
                continue;
            }
        }
        result.push(c);
    }
    result
}

/// Integers and non-numeric values are returned unchanged.
fn fmtnum(value: &str, digits: &str) -> Option<String> {
    let digits: usize = digits.trim().parse().ok()?;
    if digits > MAX_FMTNUM_DIGITS {
        return None;
    }

    let trimmed = value.trim();
    if trimmed.parse::<i64>().is_ok() {
        return Some(value.to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Some(format!("{number:.digits$}")),
        _ => Some(value.to_string()),
    }
}

fn trim_with<'a>(params: &[String], trim: impl Fn(&dyn Fn(char) -> bool) -> &'a str) -> Option<String> {
    match params {
        [] => Some(trim(&char::is_whitespace).to_string()),
        [set] if !set.is_empty() => Some(trim(&|c: char| set.contains(c)).to_string()),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
