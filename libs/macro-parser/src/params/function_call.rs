//! Trigger function calls: `name(params)`.

use super::{parse_list, KeyParameter, ListSyntax};
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;

/// A parsed function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Parameters, positioned within the call string.
    pub parameters: Vec<KeyParameter>,
}

/// Parser for trigger function calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionCallParser;

impl FunctionCallParser {
    /// Parse a complete function call.
    ///
    /// A first parameter starting with `/` is an item query and is kept as
    /// [`ParamKind::Query`](super::ParamKind::Query).
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::params::{FunctionCallParser, ParamKind};
    ///
    /// let call = FunctionCallParser::parse("last(/host/key[a,b],#3)").unwrap();
    /// assert_eq!(call.name, "last");
    /// assert_eq!(call.parameters[0].kind, ParamKind::Query);
    /// assert_eq!(call.parameters[1].raw, "#3");
    /// ```
    pub fn parse(text: &str) -> Result<FunctionCall, ParseError> {
        let mut cursor = Cursor::at(text, 0);
        let name = cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyName, Span::at(0, 0)));
        }

        let (parameters, end) = parse_list(text, cursor.pos(), &ListSyntax::FUNCTION, 0)?;
        let cursor = Cursor::at(text, end);
        if let Some(found) = cursor.peek() {
            return Err(ParseError::unexpected_char(found, "end of function call", end));
        }

        Ok(FunctionCall {
            name: name.to_string(),
            parameters,
        })
    }
}
