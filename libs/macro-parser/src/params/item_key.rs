//! Item keys: `name` or `name[params]`.

use super::{parse_list, KeyParameter, ListSyntax};
use crate::cursor::Cursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::span::Span;

/// A parsed item key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    /// Key name before the parameter list.
    pub name: String,
    /// Top-level parameters, positioned within the key string.
    pub parameters: Vec<KeyParameter>,
}

/// Parser for item keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemKeyParser;

impl ItemKeyParser {
    /// Parse a complete item key.
    ///
    /// ## Grammar
    ///
    /// ```text
    /// key = [0-9a-zA-Z_.-]+ ( "[" params "]" )?
    /// ```
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::params::{ItemKeyParser, ParamKind};
    ///
    /// let key = ItemKeyParser::parse("vfs.fs.size[/,free]").unwrap();
    /// assert_eq!(key.name, "vfs.fs.size");
    /// assert_eq!(key.parameters[1].raw, "free");
    /// assert_eq!(key.parameters[1].pos, 14);
    /// ```
    pub fn parse(key: &str) -> Result<ItemKey, ParseError> {
        let mut cursor = Cursor::at(key, 0);
        let name = cursor.advance_while(is_key_char);
        if name.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyName, Span::at(0, 0)));
        }

        if cursor.is_eof() {
            return Ok(ItemKey {
                name: name.to_string(),
                parameters: Vec::new(),
            });
        }

        let (parameters, end) = parse_list(key, cursor.pos(), &ListSyntax::ITEM_KEY, 0)?;
        let cursor = Cursor::at(key, end);
        if let Some(found) = cursor.peek() {
            return Err(ParseError::unexpected_char(found, "end of key", end));
        }

        Ok(ItemKey {
            name: name.to_string(),
            parameters,
        })
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}
