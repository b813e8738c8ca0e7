//! # Macro Parser
//!
//! Recognizes the macro-like constructs embedded in monitoring configuration
//! strings and splits item keys and trigger function calls into parameters.
//!
//! ## Architecture
//!
//! ```text
//! Text → Scanner → [TokenParser per grammar] → MacroToken
//! Item key / function call → parameter list parser → KeyParameter tree
//! ```
//!
//! Nothing here knows macro values; substitution lives in `macro-resolver`.
//!
//! ## Example
//!
//! ```rust
//! use macro_parser::{Grammars, MacroKind, Scanner};
//!
//! let scanner = Scanner::new(&Grammars::new().user_macros());
//! let tokens = scanner.scan("CPU above {$CPU.LIMIT:\"web\"}%");
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].kind, MacroKind::ContextMacro);
//! assert_eq!(tokens[0].offset(), 10);
//! ```

pub mod cursor;
pub mod error;
pub mod params;
pub mod scanner;
pub mod span;
pub mod token;

// Re-export public API
pub use error::{ParseError, ParseErrorKind};
pub use params::{
    flatten_parameters, quote_param, unquote_param, FunctionCall, FunctionCallParser, ItemKey,
    ItemKeyParser, KeyParameter, ParamKind, ParamStyle,
};
pub use scanner::{ExtractedMacros, Grammars, Scanner};
pub use span::Span;
pub use token::{MacroFunction, MacroKind, MacroToken, TokenParser, UserMacroParser};
