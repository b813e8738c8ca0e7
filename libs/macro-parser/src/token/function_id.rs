//! Trigger function ids: `{12345}`.

use super::{MacroKind, MacroToken, TokenParser};
use crate::cursor::Cursor;

/// Parser for `{digits}` tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionIdParser;

impl TokenParser for FunctionIdParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat('{') {
            return None;
        }

        let id = cursor.advance_while(|c| c.is_ascii_digit());
        if id.is_empty() || !cursor.eat('}') {
            return None;
        }

        Some(MacroToken::new(
            MacroKind::FunctionId,
            text,
            pos,
            cursor.pos(),
            id,
        ))
    }
}
