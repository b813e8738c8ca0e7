//! Built-in macros from a caller-supplied allow-list, optionally indexed
//! (`{HOST.HOST2}` names the host of the second function of a trigger).

use super::{is_macro_name_char, MacroKind, MacroToken, TokenParser};
use crate::cursor::Cursor;
use std::collections::HashSet;

/// Whether a built-in macro may carry a trailing function index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceStyle {
    /// Only the exact allow-listed form matches.
    #[default]
    None,
    /// `{NAME}` and `{NAME1}`..`{NAME9}` match; the token carries the index,
    /// 0 for the unindexed form.
    Numeric,
}

/// Parser for built-in macros such as `{HOST.HOST}` or `{ITEM.LASTVALUE}`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinMacroParser {
    /// Allow-listed macros, braces included.
    macros: HashSet<String>,
    style: ReferenceStyle,
}

impl BuiltinMacroParser {
    /// Create a parser for the given `{NAME}` patterns.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::token::{BuiltinMacroParser, ReferenceStyle, TokenParser};
    ///
    /// let parser = BuiltinMacroParser::new(["{HOST.HOST}"], ReferenceStyle::Numeric);
    /// let token = parser.try_match("{HOST.HOST3}", 0).unwrap();
    /// assert_eq!(token.name, "HOST.HOST");
    /// assert_eq!(token.suffix_index, Some(3));
    /// ```
    pub fn new<I, S>(macros: I, style: ReferenceStyle) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            macros: macros.into_iter().map(Into::into).collect(),
            style,
        }
    }
}

impl TokenParser for BuiltinMacroParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat('{') {
            return None;
        }

        let body = cursor.advance_while(is_macro_name_char);
        if body.is_empty() || !cursor.eat('}') {
            return None;
        }

        let end = cursor.pos();
        if self.macros.contains(&text[pos..end]) {
            let mut token = MacroToken::new(MacroKind::BuiltinMacro, text, pos, end, body);
            if self.style == ReferenceStyle::Numeric {
                token.suffix_index = Some(0);
            }
            return Some(token);
        }

        if self.style != ReferenceStyle::Numeric {
            return None;
        }

        // {NAME<1-9>} where {NAME} is allow-listed
        let digit = body.chars().last()?;
        let index = digit.to_digit(10).filter(|d| *d >= 1)?;
        let name = &body[..body.len() - 1];
        if name.is_empty() || !self.macros.contains(&format!("{{{name}}}")) {
            return None;
        }

        let mut token = MacroToken::new(MacroKind::BuiltinMacro, text, pos, end, name);
        token.suffix_index = Some(index as u8);
        Some(token)
    }
}

// =============================================================================
// TESTS
// =============================================================================
