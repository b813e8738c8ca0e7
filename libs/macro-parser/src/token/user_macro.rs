//! User macros: `{$NAME}`, `{$NAME:context}`, `{$NAME:"quoted context"}` and,
//! in macro definition keys only, `{$NAME:regex:"pattern"}`.

use super::{is_macro_name_char, MacroKind, MacroToken, TokenParser};
use crate::cursor::Cursor;
use config::constants::REGEX_CONTEXT_PREFIX;

/// Parser for the user macro grammar.
///
/// An unquoted context runs verbatim up to the closing brace. A quoted
/// context may escape `"` and `\` with a backslash and may be followed by
/// spaces before the closing brace.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserMacroParser {
    allow_regex: bool,
}

impl UserMacroParser {
    /// Parser for macros referenced in text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser for macro definition keys, which may carry a regex context.
    pub fn with_regex() -> Self {
        Self { allow_regex: true }
    }
}

impl TokenParser for UserMacroParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat_str("{$") {
            return None;
        }

        let name = cursor.advance_while(is_macro_name_char);
        if name.is_empty() {
            return None;
        }

        let mut context = None;
        let mut regex = None;

        if cursor.eat(':') {
            cursor.skip_spaces();
            let is_regex = self.allow_regex && cursor.eat_str(REGEX_CONTEXT_PREFIX);
            if is_regex {
                cursor.skip_spaces();
            }

            let value = if cursor.peek() == Some('"') {
                let value = quoted_context(&mut cursor)?;
                cursor.skip_spaces();
                value
            } else {
                cursor.advance_while(|c| c != '}').to_string()
            };

            if is_regex {
                regex = Some(value);
            } else {
                context = Some(value);
            }
        }

        if !cursor.eat('}') {
            return None;
        }

        let kind = if context.is_some() {
            MacroKind::ContextMacro
        } else {
            MacroKind::UserMacro
        };
        let mut token = MacroToken::new(kind, text, pos, cursor.pos(), name);
        token.context = context;
        token.regex = regex;
        Some(token)
    }
}

/// Read a `"..."` context and return it unescaped.
fn quoted_context(cursor: &mut Cursor<'_>) -> Option<String> {
    cursor.eat('"');
    let mut value = String::new();

    loop {
        match cursor.advance()? {
            '"' => return Some(value),
            '\\' => match cursor.peek() {
                Some(escaped @ ('"' | '\\')) => {
                    cursor.advance();
                    value.push(escaped);
                }
                _ => value.push('\\'),
            },
            c => value.push(c),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
