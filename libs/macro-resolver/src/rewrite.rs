//! # String Rewriter
//!
//! Splices resolved values back into the strings they were found in.
//!
//! Output is built front to back from the untouched text between matches and
//! the values of matched tokens, so no offset is ever invalidated by an
//! earlier replacement. Matches without a value are left as they are.
//!
//! Item keys and function calls are rewritten per parameter: tokens are
//! substituted inside the parameter value, the value is re-quoted if needed,
//! and the parameter is spliced back at its recorded position.

use macro_parser::params::{
    quote_param, FunctionCallParser, ItemKeyParser, KeyParameter, ParamKind, ParamStyle,
};
use macro_parser::{MacroToken, Scanner};
use std::collections::{BTreeMap, HashMap};
use tracing::{trace, warn};

/// Replacement values keyed by exact token text.
pub type MacroValues = HashMap<String, String>;

// =============================================================================
// PLAIN TEXT
// =============================================================================

/// Replace matched tokens that have a value.
///
/// ## Parameters
///
/// - `text`: source string
/// - `matches`: byte offset to token text, as produced by
///   [`Scanner::positions`]
/// - `values`: token text to replacement
///
/// Matches that do not fit the text or overlap an earlier replaced match are
/// skipped.
///
/// ## Example
///
/// ```rust
/// use macro_resolver::rewrite::{substitute, MacroValues};
/// use std::collections::BTreeMap;
///
/// let matches = BTreeMap::from([(0, "{$A}".to_string()), (5, "{$B}".to_string())]);
/// let values = MacroValues::from([("{$A}".to_string(), "alpha".to_string())]);
/// assert_eq!(substitute("{$A}-{$B}", &matches, &values), "alpha-{$B}");
/// ```
pub fn substitute(text: &str, matches: &BTreeMap<usize, String>, values: &MacroValues) -> String {
    splice(
        text,
        matches.iter().map(|(offset, raw)| (*offset, raw.as_str())),
        values,
    )
}

/// Replace scanned tokens that have a value.
pub fn substitute_tokens(text: &str, tokens: &[MacroToken], values: &MacroValues) -> String {
    let mut matches: Vec<(usize, &str)> = tokens
        .iter()
        .map(|token| (token.offset(), token.raw.as_str()))
        .collect();
    matches.sort_by_key(|(offset, _)| *offset);
    splice(text, matches.into_iter(), values)
}

fn splice<'a>(
    text: &str,
    matches: impl Iterator<Item = (usize, &'a str)>,
    values: &MacroValues,
) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;

    for (offset, raw) in matches {
        let value = match values.get(raw) {
            Some(value) => value,
            None => continue,
        };
        if offset < copied {
            warn!(offset, raw, "skipping overlapping match");
            continue;
        }
        let end = offset + raw.len();
        if text.get(offset..end) != Some(raw) {
            warn!(offset, raw, "skipping match that does not fit the text");
            continue;
        }

        output.push_str(&text[copied..offset]);
        output.push_str(value);
        copied = end;
    }

    output.push_str(&text[copied..]);
    output
}

// =============================================================================
// ITEM KEYS AND FUNCTION CALLS
// =============================================================================

/// Substitute macros inside the parameters of an item key.
///
/// Keys that do not parse are returned unchanged.
///
/// ## Example
///
/// ```rust
/// use macro_parser::{Grammars, Scanner};
/// use macro_resolver::rewrite::{substitute_item_key, MacroValues};
///
/// let scanner = Scanner::new(&Grammars::new().user_macros());
/// let values = MacroValues::from([("{$FS}".to_string(), "/a,b".to_string())]);
/// assert_eq!(
///     substitute_item_key("vfs.fs.size[{$FS},free]", &scanner, &values),
///     r#"vfs.fs.size["/a,b",free]"#
/// );
/// ```
pub fn substitute_item_key(key: &str, scanner: &Scanner, values: &MacroValues) -> String {
    match ItemKeyParser::parse(key) {
        Ok(parsed) => {
            substitute_parameters(key, &parsed.parameters, scanner, values, ParamStyle::ItemKey)
        }
        Err(error) => {
            trace!(key, %error, "item key left unchanged");
            key.to_string()
        }
    }
}

/// Substitute macros inside the parameters of a function call.
///
/// The item query parameter is never rewritten. Calls that do not parse are
/// returned unchanged.
pub fn substitute_function(call: &str, scanner: &Scanner, values: &MacroValues) -> String {
    match FunctionCallParser::parse(call) {
        Ok(parsed) => {
            substitute_parameters(call, &parsed.parameters, scanner, values, ParamStyle::Function)
        }
        Err(error) => {
            trace!(call, %error, "function call left unchanged");
            call.to_string()
        }
    }
}

/// Rebuild `text` with each parameter replaced by its rewritten form.
///
/// `parameters` must come from parsing `text`, so their positions are
/// relative to it. Item queries are never rewritten.
pub fn substitute_parameters(
    text: &str,
    parameters: &[KeyParameter],
    scanner: &Scanner,
    values: &MacroValues,
    style: ParamStyle,
) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;

    for parameter in parameters {
        let rewritten = match parameter.kind {
            ParamKind::NestedArray => Some(substitute_parameters(
                &parameter.raw,
                &parameter.parameters,
                scanner,
                values,
                style,
            )),
            ParamKind::Query => None,
            ParamKind::Quoted | ParamKind::Unquoted => {
                rewrite_value(parameter, scanner, values, style)
            }
        };

        if let Some(rewritten) = rewritten {
            let span = parameter.span();
            output.push_str(&text[copied..span.start()]);
            output.push_str(&rewritten);
            copied = span.end();
        }
    }

    output.push_str(&text[copied..]);
    output
}

/// Substitute inside one parameter value, `None` when nothing changed.
fn rewrite_value(
    parameter: &KeyParameter,
    scanner: &Scanner,
    values: &MacroValues,
    style: ParamStyle,
) -> Option<String> {
    let value = parameter.value();
    let tokens = scanner.scan(&value);
    let changes = tokens
        .iter()
        .any(|token| values.get(&token.raw).is_some_and(|value| *value != token.raw));
    if !changes {
        return None;
    }

    let substituted = substitute_tokens(&value, &tokens, values);
    Some(quote_param(
        &substituted,
        parameter.kind == ParamKind::Quoted,
        style,
    ))
}
