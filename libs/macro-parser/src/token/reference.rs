//! Positional references: `$1`..`$9`.

use super::{MacroKind, MacroToken, TokenParser};
use crate::cursor::Cursor;
use config::constants::MAX_REFERENCE_INDEX;

/// Parser for `$N` references where N is a single digit 1-9.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceParser;

impl TokenParser for ReferenceParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat('$') {
            return None;
        }

        let index = cursor
            .advance()?
            .to_digit(10)
            .filter(|d| (1..=u32::from(MAX_REFERENCE_INDEX)).contains(d))?;

        let end = cursor.pos();
        let mut token = MacroToken::new(MacroKind::Reference, text, pos, end, &text[pos + 1..end]);
        token.suffix_index = Some(index as u8);
        Some(token)
    }
}
