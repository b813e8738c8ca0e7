//! # Trigger Helpers
//!
//! Function-id discovery and `$N` reference resolution for trigger
//! expressions in their collapsed form, where every function call has been
//! replaced by a `{<functionid>}` placeholder:
//!
//! ```text
//! {13}>{$LIMIT:"cpu"} or {14}<5K
//! ```

use config::constants::TRIGGER_VALUE_MACRO;
use macro_parser::cursor::Cursor;
use macro_parser::params::unquote_param;
use macro_parser::token::{FunctionIdParser, LldMacroParser, ReferenceParser, TokenParser, UserMacroParser};
use macro_parser::{Grammars, MacroKind, Scanner};
use std::collections::BTreeMap;

/// Unit suffixes allowed after a numeric constant.
const NUMBER_SUFFIXES: &str = "KMGTsmhdw";

// =============================================================================
// FUNCTION IDS
// =============================================================================

/// Number the function-id placeholders of `expression` from 1.
///
/// User macros and `{TRIGGER.VALUE}` are matched first so they are never
/// taken for placeholders. Index 0 refers to the first function as well.
///
/// ## Example
///
/// ```rust
/// use macro_resolver::trigger::find_functions;
///
/// let functions = find_functions("{7}>{$MAX} and {9}<>{TRIGGER.VALUE}");
/// assert_eq!(functions[&0], "7");
/// assert_eq!(functions[&1], "7");
/// assert_eq!(functions[&2], "9");
/// ```
pub fn find_functions(expression: &str) -> BTreeMap<usize, String> {
    let scanner = Scanner::new(
        &Grammars::new()
            .user_macros()
            .macros("trigger", [TRIGGER_VALUE_MACRO])
            .function_ids(),
    );

    let mut functions: BTreeMap<usize, String> = scanner
        .scan(expression)
        .into_iter()
        .filter(|token| token.kind == MacroKind::FunctionId)
        .enumerate()
        .map(|(index, token)| (index + 1, token.name))
        .collect();

    if let Some(first) = functions.get(&1).cloned() {
        functions.insert(0, first);
    }
    functions
}

// =============================================================================
// CONSTANTS AND REFERENCES
// =============================================================================

/// Constants of a trigger expression in order of appearance.
///
/// Numbers (with optional unit suffix) and user macros are kept as written,
/// quoted strings are unquoted. Function-id placeholders, LLD macros,
/// operators and function calls contribute nothing.
///
/// An expression with an unterminated string or function call does not
/// parse and has no constants.
///
/// ## Example
///
/// ```rust
/// use macro_resolver::trigger::trigger_constants;
///
/// let constants = trigger_constants(r#"{1}>5K and {2}="a \"b\"" or {3}<{$MIN}"#);
/// assert_eq!(constants, vec!["5K", r#"a "b""#, "{$MIN}"]);
/// ```
pub fn trigger_constants(expression: &str) -> Vec<String> {
    let mut constants = Vec::new();
    let mut cursor = Cursor::at(expression, 0);

    while let Some(c) = cursor.peek() {
        let pos = cursor.pos();

        if c == '{' {
            if let Some(token) = UserMacroParser::new().try_match(expression, pos) {
                cursor = Cursor::at(expression, token.span.end());
                constants.push(token.raw);
                continue;
            }
            let placeholder = FunctionIdParser
                .try_match(expression, pos)
                .or_else(|| LldMacroParser.try_match(expression, pos));
            if let Some(token) = placeholder {
                cursor = Cursor::at(expression, token.span.end());
                continue;
            }
            cursor.advance();
        } else if c == '"' {
            match quoted_string(&mut cursor) {
                Some(raw) => constants.push(unquote_param(raw)),
                None => return Vec::new(),
            }
        } else if c.is_ascii_digit() || (c == '.' && cursor.peek_next().is_some_and(|n| n.is_ascii_digit())) {
            constants.push(number(&mut cursor).to_string());
        } else if c.is_ascii_alphabetic() || c == '_' {
            cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if cursor.peek() == Some('(') && skip_call(&mut cursor).is_none() {
                return Vec::new();
            }
        } else {
            cursor.advance();
        }
    }

    constants
}

/// Value of each `$N` reference: constant N of `expression`, or `""`.
///
/// Inputs that are not references are ignored.
///
/// ## Example
///
/// ```rust
/// use macro_resolver::trigger::resolve_references;
///
/// let values = resolve_references("{1}>10 or {2}<2", ["$2", "$3"]);
/// assert_eq!(values["$2"], "2");
/// assert_eq!(values["$3"], "");
/// ```
pub fn resolve_references<I, S>(expression: &str, references: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let constants = trigger_constants(expression);

    references
        .into_iter()
        .filter_map(|reference| {
            let reference = reference.as_ref();
            let token = ReferenceParser
                .try_match(reference, 0)
                .filter(|token| token.len() == reference.len())?;
            let index = usize::from(token.suffix_index?);
            let value = constants.get(index - 1).cloned().unwrap_or_default();
            Some((token.raw, value))
        })
        .collect()
}

/// Consume a quoted string, `None` when it is not terminated.
fn quoted_string<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cursor.pos();
    cursor.advance();
    loop {
        match cursor.advance()? {
            '"' => return Some(cursor.since(start)),
            '\\' => {
                if matches!(cursor.peek(), Some('"' | '\\')) {
                    cursor.advance();
                }
            }
            _ => {}
        }
    }
}

/// Consume `digits[.digits][e[+-]digits][suffix]`.
fn number<'a>(cursor: &mut Cursor<'a>) -> &'a str {
    let start = cursor.pos();
    cursor.advance_while(|c| c.is_ascii_digit());
    if cursor.peek() == Some('.') {
        cursor.advance();
        cursor.advance_while(|c| c.is_ascii_digit());
    }
    if matches!(cursor.peek(), Some('e' | 'E')) {
        let mark = cursor.clone();
        cursor.advance();
        if matches!(cursor.peek(), Some('+' | '-')) {
            cursor.advance();
        }
        if cursor.advance_while(|c| c.is_ascii_digit()).is_empty() {
            *cursor = mark;
        }
    }
    if cursor.peek().is_some_and(|c| NUMBER_SUFFIXES.contains(c)) {
        cursor.advance();
    }
    cursor.since(start)
}

/// Skip a parenthesized argument list, honouring quoted strings.
///
/// `None` when the list or a string inside it is not closed.
fn skip_call(cursor: &mut Cursor<'_>) -> Option<()> {
    let mut depth = 0usize;
    while let Some(c) = cursor.peek() {
        match c {
            '"' => {
                quoted_string(cursor)?;
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    cursor.advance();
                    return Some(());
                }
            }
            _ => {}
        }
        cursor.advance();
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_functions_skips_macros() {
        let functions = find_functions("{$A}+{12}*{TRIGGER.VALUE}-{34}");
        assert_eq!(functions.len(), 3);
        assert_eq!(functions[&1], "12");
        assert_eq!(functions[&2], "34");
    }

    #[test]
    fn test_find_functions_keeps_repeats() {
        let functions = find_functions("{5}>1 and {5}<9");
        assert_eq!(functions[&1], "5");
        assert_eq!(functions[&2], "5");
    }

    #[test]
    fn test_find_functions_none() {
        assert!(find_functions("{$A}>{TRIGGER.VALUE}").is_empty());
    }

    #[test]
    fn test_constants_skip_calls_and_placeholders() {
        let constants = trigger_constants(r#"count(/h/k,5m,"eq","x")>2 and {#LLD}=1.5e3 or {7}=.5"#);
        assert_eq!(constants, vec!["2", "1.5e3", ".5"]);
    }

    #[test]
    fn test_constants_exponent_without_digits() {
        assert_eq!(trigger_constants("{1}>3e"), vec!["3"]);
        assert_eq!(trigger_constants("{1}>10s"), vec!["10s"]);
    }

    #[test]
    fn test_constants_context_macro() {
        let constants = trigger_constants(r#"{1}>{$LIMIT:"cpu"}"#);
        assert_eq!(constants, vec![r#"{$LIMIT:"cpu"}"#]);
    }

    #[test]
    fn test_unterminated_expression_has_no_constants() {
        assert!(trigger_constants(r#"{1}>5 and {2}="abc"#).is_empty());
        assert!(trigger_constants(r#"{1}>5 and count(/h/k,"x"#).is_empty());
        assert!(trigger_constants("{1}>5 and last(/h/k,3").is_empty());
    }

    #[test]
    fn test_unterminated_expression_references_are_empty() {
        let values = resolve_references(r#"{1}>5 and {2}="abc"#, ["$1", "$2"]);
        assert_eq!(values["$1"], "");
        assert_eq!(values["$2"], "");
    }

    #[test]
    fn test_references_out_of_range_are_empty() {
        let values = resolve_references("{1}>7", ["$1", "$9", "$0", "x"]);
        assert_eq!(values.len(), 2);
        assert_eq!(values["$1"], "7");
        assert_eq!(values["$9"], "");
    }
}
