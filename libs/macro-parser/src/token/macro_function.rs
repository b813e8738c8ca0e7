//! Macro functions wrap another macro: `{{$NAME}.regsub("^(\d+)", \1)}`.

use super::{MacroFunction, MacroToken, TokenParser};
use crate::cursor::Cursor;
use crate::params::{parse_list, ListSyntax};
use crate::span::Span;

/// Parser for `{<inner macro>.<function>(<params>)}`.
///
/// The inner grammar decides what may be wrapped. The resulting token keeps
/// the kind, name and context of the inner macro and spans the whole
/// construct.
#[derive(Debug, Clone, Default)]
pub struct MacroFunctionParser<P> {
    inner: P,
}

impl<P: TokenParser> MacroFunctionParser<P> {
    /// Wrap a token parser.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: TokenParser> TokenParser for MacroFunctionParser<P> {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        let mut cursor = Cursor::at(text, pos);
        if !cursor.eat('{') {
            return None;
        }

        let inner = self.inner.try_match(text, cursor.pos())?;
        let mut cursor = Cursor::at(text, inner.span.end());
        if !cursor.eat('.') {
            return None;
        }

        let name = cursor.advance_while(|c| c.is_ascii_lowercase());
        if name.is_empty() || cursor.peek() != Some('(') {
            return None;
        }

        let open = cursor.pos();
        let (parameters, close_end) = parse_list(text, open, &ListSyntax::MACRO_FUNCTION, open).ok()?;
        let mut cursor = Cursor::at(text, close_end);
        if !cursor.eat('}') {
            return None;
        }

        let mut token = inner;
        let inner_raw = std::mem::take(&mut token.raw);
        token.raw = text[pos..cursor.pos()].to_string();
        token.span = Span::new(pos, cursor.pos());
        token.macro_function = Some(MacroFunction {
            name: name.to_string(),
            inner: inner_raw,
            parameters: parameters.iter().map(|p| p.value()).collect(),
        });
        Some(token)
    }
}

// =============================================================================
// TESTS
// =============================================================================
