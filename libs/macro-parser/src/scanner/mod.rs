//! # Token Scanner
//!
//! Walks a string left to right and reports every non-overlapping macro
//! token. At each offset the enabled grammars are tried in a fixed order and
//! the first match wins; the scan then continues after the match. Where no
//! grammar matches, the scan moves on by one character.
//!
//! ## Grammar Order
//!
//! 1. user macros, then user macros wrapped in a macro function
//! 2. built-in groups, then indexed built-in groups
//! 3. the same groups wrapped in a macro function
//! 4. references
//! 5. LLD macros, then LLD macros wrapped in a macro function
//! 6. function ids
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::scanner::{Grammars, Scanner};
//!
//! let scanner = Scanner::new(&Grammars::new().user_macros().lld_macros());
//! let positions = scanner.positions("{$A} and {#B} and {C}");
//! assert_eq!(positions.get(&0).map(String::as_str), Some("{$A}"));
//! assert_eq!(positions.get(&9).map(String::as_str), Some("{#B}"));
//! assert_eq!(positions.len(), 2);
//! ```

mod extract;
mod grammars;

pub use extract::ExtractedMacros;
pub use grammars::Grammars;

use crate::token::{
    BuiltinMacroParser, FunctionIdParser, LldMacroParser, MacroFunctionParser, MacroToken,
    ReferenceParser, ReferenceStyle, TokenParser, UserMacroParser,
};
use std::collections::BTreeMap;

// =============================================================================
// GRAMMAR SLOTS
// =============================================================================

/// Which result bucket a grammar feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Bucket {
    UserMacros,
    Macros(String),
    MacrosN(String),
    References,
    LldMacros,
    FunctionIds,
}

/// A configured token parser.
#[derive(Debug, Clone)]
enum MacroParser {
    User(UserMacroParser),
    UserFunction(MacroFunctionParser<UserMacroParser>),
    Builtin(BuiltinMacroParser),
    BuiltinFunction(MacroFunctionParser<BuiltinMacroParser>),
    Reference(ReferenceParser),
    Lld(LldMacroParser),
    LldFunction(MacroFunctionParser<LldMacroParser>),
    FunctionId(FunctionIdParser),
}

impl TokenParser for MacroParser {
    fn try_match(&self, text: &str, pos: usize) -> Option<MacroToken> {
        match self {
            Self::User(p) => p.try_match(text, pos),
            Self::UserFunction(p) => p.try_match(text, pos),
            Self::Builtin(p) => p.try_match(text, pos),
            Self::BuiltinFunction(p) => p.try_match(text, pos),
            Self::Reference(p) => p.try_match(text, pos),
            Self::Lld(p) => p.try_match(text, pos),
            Self::LldFunction(p) => p.try_match(text, pos),
            Self::FunctionId(p) => p.try_match(text, pos),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    bucket: Bucket,
    parser: MacroParser,
}

// =============================================================================
// SCANNER
// =============================================================================

/// Finds macro tokens for a fixed set of grammars.
#[derive(Debug, Clone)]
pub struct Scanner {
    slots: Vec<Slot>,
}

impl Scanner {
    /// Build a scanner for the enabled grammars.
    pub fn new(grammars: &Grammars) -> Self {
        let mut slots = Vec::new();
        let mut push = |bucket: Bucket, parser: MacroParser| slots.push(Slot { bucket, parser });

        if grammars.usermacros {
            push(Bucket::UserMacros, MacroParser::User(UserMacroParser::new()));
            push(
                Bucket::UserMacros,
                MacroParser::UserFunction(MacroFunctionParser::new(UserMacroParser::new())),
            );
        }

        let builtin = |group: &String, patterns: &Vec<String>, indexed: bool| {
            let style = if indexed {
                ReferenceStyle::Numeric
            } else {
                ReferenceStyle::None
            };
            let bucket = if indexed {
                Bucket::MacrosN(group.clone())
            } else {
                Bucket::Macros(group.clone())
            };
            (bucket, BuiltinMacroParser::new(patterns.iter().cloned(), style))
        };
        let builtins: Vec<_> = grammars
            .macros
            .iter()
            .map(|(group, patterns)| builtin(group, patterns, false))
            .chain(
                grammars
                    .macros_n
                    .iter()
                    .map(|(group, patterns)| builtin(group, patterns, true)),
            )
            .collect();

        for (bucket, parser) in &builtins {
            push(bucket.clone(), MacroParser::Builtin(parser.clone()));
        }
        for (bucket, parser) in builtins {
            push(
                bucket,
                MacroParser::BuiltinFunction(MacroFunctionParser::new(parser)),
            );
        }

        if grammars.references {
            push(Bucket::References, MacroParser::Reference(ReferenceParser));
        }
        if grammars.lldmacros {
            push(Bucket::LldMacros, MacroParser::Lld(LldMacroParser));
            push(
                Bucket::LldMacros,
                MacroParser::LldFunction(MacroFunctionParser::new(LldMacroParser)),
            );
        }
        if grammars.functionids {
            push(Bucket::FunctionIds, MacroParser::FunctionId(FunctionIdParser));
        }

        Self { slots }
    }

    /// All tokens of `text` in ascending, non-overlapping order.
    pub fn scan(&self, text: &str) -> Vec<MacroToken> {
        self.scan_tagged(text)
            .into_iter()
            .map(|(_, token)| token)
            .collect()
    }

    /// Map of byte offset to matched text.
    pub fn positions(&self, text: &str) -> BTreeMap<usize, String> {
        self.scan_tagged(text)
            .into_iter()
            .map(|(_, token)| (token.offset(), token.raw))
            .collect()
    }

    /// Tokens paired with the index of the slot that matched them.
    pub(crate) fn scan_tagged(&self, text: &str) -> Vec<(usize, MacroToken)> {
        let mut tokens = Vec::new();
        if self.slots.is_empty() {
            return tokens;
        }

        let mut pos = 0;
        while let Some(c) = text[pos..].chars().next() {
            let matched = if c == '{' || c == '$' {
                self.slots
                    .iter()
                    .enumerate()
                    .find_map(|(i, slot)| slot.parser.try_match(text, pos).map(|t| (i, t)))
            } else {
                None
            };

            match matched {
                Some((slot, token)) => {
                    pos = token.span.end();
                    tokens.push((slot, token));
                }
                None => pos += c.len_utf8(),
            }
        }

        tracing::trace!(tokens = tokens.len(), len = text.len(), "scanned text");
        tokens
    }

    pub(crate) fn bucket(&self, slot: usize) -> &Bucket {
        &self.slots[slot].bucket
    }
}

#[cfg(test)]
mod tests;
