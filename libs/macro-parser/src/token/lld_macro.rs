//! Low-level discovery macros: `{#NAME}`.

use super::{is_macro_name_char, MacroKind, MacroToken, TokenParser};
use crate::cursor::Cursor;

/// Parser for `{#NAME}` tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct LldMacroParser;

impl TokenParser for LldMacroParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat_str("{#") {
            return None;
        }

        let name = cursor.advance_while(is_macro_name_char);
        if name.is_empty() || !cursor.eat('}') {
            return None;
        }

        Some(MacroToken::new(
            MacroKind::LldMacro,
            text,
            pos,
            cursor.pos(),
            name,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lld_macro() {
        let token = LldMacroParser.try_match("net.if.in[{#IFNAME}]", 10).unwrap();
        assert_eq!(token.kind, MacroKind::LldMacro);
        assert_eq!(token.name, "IFNAME");
        assert_eq!(token.raw, "{#IFNAME}");
    }

    #[test]
    fn test_lld_macro_rejects_lowercase_and_empty() {
        assert!(LldMacroParser.try_match("{#ifname}", 0).is_none());
        assert!(LldMacroParser.try_match("{#}", 0).is_none());
        assert!(LldMacroParser.try_match("{#A", 0).is_none());
    }
}
