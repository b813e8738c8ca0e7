//! # Parse Errors
//!
//! Error types for the item key and function call parsers.
//!
//! Token parsers never produce errors: a grammar that does not match at an
//! offset is a normal negative result. Only the whole-string parsers report
//! why a key or function call could not be split into parameters, and callers
//! are expected to leave such strings untouched.
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::error::ParseError;
//!
//! let error = ParseError::unexpected_end("]", 9);
//! assert!(error.to_string().contains("unexpected end"));
//! ```

use crate::span::Span;
use thiserror::Error;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at byte {}", .kind, .span.start())]
pub struct ParseError {
    /// Error kind with details.
    pub kind: ParseErrorKind,
    /// Source location of error.
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error.
    pub const fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Create unexpected character error at byte `pos`.
    pub fn unexpected_char(found: char, expected: &str, pos: usize) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedChar {
                found,
                expected: expected.to_string(),
            },
            Span::at(pos, found.len_utf8()),
        )
    }

    /// Create unexpected end-of-input error at byte `pos`.
    pub fn unexpected_end(expected: &str, pos: usize) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
            Span::at(pos, 0),
        )
    }
}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Found a character the grammar does not allow here.
    #[error("unexpected character '{found}', expected {expected}")]
    UnexpectedChar {
        /// Character that was found.
        found: char,
        /// Description of what was expected.
        expected: String,
    },

    /// Input ended in the middle of a construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// Description of what was expected.
        expected: String,
    },

    /// Quoted parameter without closing quote.
    #[error("unterminated quoted parameter")]
    UnterminatedQuote,

    /// Key or function name is missing.
    #[error("missing name")]
    EmptyName,

    /// Nested arrays go deeper than the parser accepts.
    #[error("arrays nested deeper than {limit} levels")]
    NestingTooDeep {
        /// Deepest nesting accepted.
        limit: usize,
    },
}

// =============================================================================
// TESTS
// =============================================================================
