//! # Macro Tokens
//!
//! One parser per macro-like grammar. Every parser attempts to match its
//! grammar starting at a given byte offset and reports the decoded token, or
//! `None` when the grammar does not match there.
//!
//! | Grammar | Example | Parser |
//! |---------|---------|--------|
//! | User macro | `{$NAME}`, `{$NAME:"ctx"}` | [`UserMacroParser`] |
//! | Built-in macro | `{HOST.HOST}`, `{ITEM.VALUE2}` | [`BuiltinMacroParser`] |
//! | LLD macro | `{#IFNAME}` | [`LldMacroParser`] |
//! | Reference | `$1`..`$9` | [`ReferenceParser`] |
//! | Function id | `{12345}` | [`FunctionIdParser`] |
//! | Macro function | `{{$NAME}.regsub("x", \1)}` | [`MacroFunctionParser`] |
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::token::{MacroKind, TokenParser, UserMacroParser};
//!
//! let token = UserMacroParser::new().try_match("x={$LIMIT:\"db\"}", 2).unwrap();
//! assert_eq!(token.kind, MacroKind::ContextMacro);
//! assert_eq!(token.name, "LIMIT");
//! assert_eq!(token.context.as_deref(), Some("db"));
//! ```

mod builtin_macro;
mod function_id;
mod lld_macro;
mod macro_function;
mod reference;
mod user_macro;

pub use builtin_macro::{BuiltinMacroParser, ReferenceStyle};
pub use function_id::FunctionIdParser;
pub use lld_macro::LldMacroParser;
pub use macro_function::MacroFunctionParser;
pub use reference::ReferenceParser;
pub use user_macro::UserMacroParser;

use crate::span::Span;

// =============================================================================
// TOKEN PARSER
// =============================================================================

/// A grammar that can be matched at an arbitrary byte offset.
pub trait TokenParser {
    /// Try to match the grammar at byte offset `pos` of `text`.
    ///
    /// Returns `None` when the grammar does not match there, including when a
    /// token is started but not properly closed.
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken>;
}

// =============================================================================
// MACRO TOKEN
// =============================================================================

/// Grammar a token was recognized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroKind {
    /// `{$NAME}`
    UserMacro,
    /// `{$NAME:context}`
    ContextMacro,
    /// `{HOST.HOST}` and friends, from an allow-list.
    BuiltinMacro,
    /// `{#NAME}`
    LldMacro,
    /// `$1`..`$9`
    Reference,
    /// `{12345}`
    FunctionId,
}

/// Function applied to a macro value, as in `{{$NAME}.regsub("x", \1)}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroFunction {
    /// Function name (lowercase letters).
    pub name: String,
    /// Text of the wrapped macro, e.g. `{$NAME}`.
    pub inner: String,
    /// Parameters with quoting removed.
    pub parameters: Vec<String>,
}

/// A recognized occurrence of a macro-like construct in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroToken {
    /// Grammar that matched.
    pub kind: MacroKind,
    /// Exact matched text.
    pub raw: String,
    /// Byte range of `raw` in the scanned string.
    pub span: Span,
    /// Decoded name without braces or sigils.
    pub name: String,
    /// Context of a context macro. `Some("")` is an empty context, not an
    /// absent one.
    pub context: Option<String>,
    /// Regex context of a macro definition key (`{$NAME:regex:"^a"}`).
    pub regex: Option<String>,
    /// Positional suffix: the function index of an indexed built-in macro
    /// (0 for the implicit first function) or the index of a reference.
    pub suffix_index: Option<u8>,
    /// Function wrapped around the macro, if any.
    pub macro_function: Option<MacroFunction>,
}

impl MacroToken {
    pub(crate) fn new(kind: MacroKind, text: &str, start: usize, end: usize, name: &str) -> Self {
        Self {
            kind,
            raw: text[start..end].to_string(),
            span: Span::new(start, end),
            name: name.to_string(),
            context: None,
            regex: None,
            suffix_index: None,
            macro_function: None,
        }
    }

    /// Byte offset of the token.
    pub fn offset(&self) -> usize {
        self.span.start()
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Tokens always cover at least one byte.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// True for both plain and context user macros.
    pub fn is_user_macro(&self) -> bool {
        matches!(self.kind, MacroKind::UserMacro | MacroKind::ContextMacro)
    }
}

/// Characters allowed in user, built-in and LLD macro names.
pub(crate) fn is_macro_name_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '_'
}
