//! # Parameter Parsing
//!
//! Splits item keys (`name[p1,"p2",[a,b]]`) and trigger function calls
//! (`name(p1,"p2")`) into a tree of parameters that records where each
//! parameter came from, so individual parameters can later be rewritten in
//! place.
//!
//! ## Grammar
//!
//! ```text
//! key        = name [ "[" params "]" ]
//! call       = name "(" [ params ] ")"
//! params     = param ( "," param )*
//! param      = spaces ( quoted | array | unquoted ) spaces
//! quoted     = '"' ( '\"' | '\\' | any )* '"'
//! array      = "[" params "]"               ; item keys only
//! unquoted   = any character up to "," or the closing delimiter
//! ```
//!
//! Inside a function call, an unquoted parameter may contain a bracketed run
//! (`/host/key[a,b]`), which is consumed as a whole.
//!
//! ## Positions
//!
//! Top-level parameter positions are byte offsets into the parsed string.
//! Parameters of a nested array are positioned relative to the start of the
//! array's own `raw` text.

mod function_call;
mod item_key;
mod quote;

pub use function_call::{FunctionCall, FunctionCallParser};
pub use item_key::{ItemKey, ItemKeyParser};
pub use quote::{quote_param, unquote_param, ParamStyle};

use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;
use config::constants::MAX_KEY_NESTING;

// =============================================================================
// KEY PARAMETER
// =============================================================================

/// How a parameter was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Plain text, surrounding spaces trimmed.
    Unquoted,
    /// `"..."` with `\"` and `\\` escapes.
    Quoted,
    /// `[...]`, item keys only.
    NestedArray,
    /// Leading `/host/key` item query of a function call. Never rewritten.
    Query,
}

/// A parameter of an item key or function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParameter {
    /// How the parameter was written.
    pub kind: ParamKind,
    /// Exact text, quotes and brackets included.
    pub raw: String,
    /// Byte offset of `raw` within its parent.
    pub pos: usize,
    /// Children of a nested array.
    pub parameters: Vec<KeyParameter>,
}

impl KeyParameter {
    fn new(kind: ParamKind, raw: &str, pos: usize) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
            pos,
            parameters: Vec::new(),
        }
    }

    /// Range of `raw` within the parent.
    pub fn span(&self) -> Span {
        Span::at(self.pos, self.raw.len())
    }

    /// Parameter value with quoting removed.
    pub fn value(&self) -> String {
        match self.kind {
            ParamKind::Quoted => unquote_param(&self.raw),
            _ => self.raw.clone(),
        }
    }
}

/// Flatten a parameter tree into unquoted values in source order.
///
/// Arrays contribute their children; item queries are skipped.
///
/// ## Example
///
/// ```rust
/// use macro_parser::params::{flatten_parameters, ItemKeyParser};
///
/// let key = ItemKeyParser::parse(r#"k[a,"b",[c,"d"]]"#).unwrap();
/// assert_eq!(flatten_parameters(&key.parameters), vec!["a", "b", "c", "d"]);
/// ```
pub fn flatten_parameters(parameters: &[KeyParameter]) -> Vec<String> {
    let mut values = Vec::new();
    collect_values(parameters, &mut values);
    values
}

fn collect_values(parameters: &[KeyParameter], values: &mut Vec<String>) {
    for parameter in parameters {
        match parameter.kind {
            ParamKind::NestedArray => collect_values(&parameter.parameters, values),
            ParamKind::Query => {}
            _ => values.push(parameter.value()),
        }
    }
}

// =============================================================================
// LIST PARSING
// =============================================================================

/// Delimiters and features of a parameter list.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ListSyntax {
    pub open: char,
    pub close: char,
    /// `[...]` parameters become nested arrays.
    pub arrays: bool,
    /// `[...]` inside an unquoted parameter is consumed as a whole.
    pub bracket_runs: bool,
    /// A first parameter starting with `/` is an item query.
    pub query_first: bool,
    /// `[]` holds one empty parameter rather than none.
    pub empty_is_param: bool,
}

impl ListSyntax {
    pub const ITEM_KEY: Self = Self {
        open: '[',
        close: ']',
        arrays: true,
        bracket_runs: false,
        query_first: false,
        empty_is_param: true,
    };

    pub const FUNCTION: Self = Self {
        open: '(',
        close: ')',
        arrays: false,
        bracket_runs: true,
        query_first: true,
        empty_is_param: false,
    };

    pub const MACRO_FUNCTION: Self = Self {
        query_first: false,
        ..Self::FUNCTION
    };

    fn expected_separator(&self) -> String {
        format!("',' or '{}'", self.close)
    }
}

/// Parse a delimited parameter list starting at byte `open`.
///
/// Parameter positions are relative to `base`. Returns the parameters and the
/// byte offset just past the closing delimiter.
pub(crate) fn parse_list(
    text: &str,
    open: usize,
    syntax: &ListSyntax,
    base: usize,
) -> Result<(Vec<KeyParameter>, usize), ParseError> {
    parse_nested(text, open, syntax, base, 0)
}

/// `depth` counts the arrays enclosing the list at `open`.
fn parse_nested(
    text: &str,
    open: usize,
    syntax: &ListSyntax,
    base: usize,
    depth: usize,
) -> Result<(Vec<KeyParameter>, usize), ParseError> {
    let mut cursor = Cursor::at(text, open);
    if !cursor.eat(syntax.open) {
        let expected = format!("'{}'", syntax.open);
        return Err(match cursor.peek() {
            Some(found) => ParseError::unexpected_char(found, &expected, cursor.pos()),
            None => ParseError::unexpected_end(&expected, cursor.pos()),
        });
    }

    let mut parameters = Vec::new();

    cursor.skip_spaces();
    if !syntax.empty_is_param && cursor.eat(syntax.close) {
        return Ok((parameters, cursor.pos()));
    }

    loop {
        cursor.skip_spaces();
        let start = cursor.pos();

        let parameter = match cursor.peek() {
            None => {
                return Err(ParseError::unexpected_end(
                    &syntax.expected_separator(),
                    start,
                ))
            }
            Some('"') => {
                scan_quoted(&mut cursor)?;
                KeyParameter::new(ParamKind::Quoted, cursor.since(start), start - base)
            }
            Some('[') if syntax.arrays => {
                if depth >= MAX_KEY_NESTING {
                    return Err(ParseError::new(
                        ParseErrorKind::NestingTooDeep {
                            limit: MAX_KEY_NESTING,
                        },
                        Span::at(start, 1),
                    ));
                }
                let (children, end) =
                    parse_nested(text, start, &ListSyntax::ITEM_KEY, start, depth + 1)?;
                cursor = Cursor::at(text, end);
                KeyParameter {
                    kind: ParamKind::NestedArray,
                    raw: text[start..end].to_string(),
                    pos: start - base,
                    parameters: children,
                }
            }
            Some(_) => {
                let end = scan_unquoted(&mut cursor, syntax)?;
                let raw = &text[start..end];
                let kind = if syntax.query_first && parameters.is_empty() && raw.starts_with('/') {
                    ParamKind::Query
                } else {
                    ParamKind::Unquoted
                };
                KeyParameter::new(kind, raw, start - base)
            }
        };
        parameters.push(parameter);

        cursor.skip_spaces();
        let at = cursor.pos();
        match cursor.advance() {
            Some(',') => continue,
            Some(c) if c == syntax.close => return Ok((parameters, cursor.pos())),
            Some(c) => return Err(ParseError::unexpected_char(c, &syntax.expected_separator(), at)),
            None => return Err(ParseError::unexpected_end(&syntax.expected_separator(), at)),
        }
    }
}

/// Consume a quoted parameter, cursor on the opening quote.
fn scan_quoted(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let start = cursor.pos();
    cursor.eat('"');

    loop {
        match cursor.advance() {
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedQuote,
                    Span::new(start, cursor.pos()),
                ))
            }
            Some('"') => return Ok(()),
            Some('\\') => {
                if matches!(cursor.peek(), Some('"' | '\\')) {
                    cursor.advance();
                }
            }
            Some(_) => {}
        }
    }
}

/// Consume an unquoted parameter and return the end of its text with
/// trailing spaces excluded.
fn scan_unquoted(cursor: &mut Cursor<'_>, syntax: &ListSyntax) -> Result<usize, ParseError> {
    let mut end = cursor.pos();

    while let Some(c) = cursor.peek() {
        if c == ',' || c == syntax.close {
            break;
        }
        if c == '[' && syntax.bracket_runs {
            skip_bracketed(cursor)?;
            end = cursor.pos();
            continue;
        }
        cursor.advance();
        if c != ' ' {
            end = cursor.pos();
        }
    }

    Ok(end)
}

/// Consume a balanced `[...]` run, honouring quoted sections.
fn skip_bracketed(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut quoted = false;

    loop {
        let c = cursor
            .advance()
            .ok_or_else(|| ParseError::unexpected_end("']'", cursor.pos()))?;
        match c {
            '\\' if quoted => {
                if matches!(cursor.peek(), Some('"' | '\\')) {
                    cursor.advance();
                }
            }
            '"' => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
