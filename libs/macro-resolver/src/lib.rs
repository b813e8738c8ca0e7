//! # Macro Resolver
//!
//! Resolves user macros against a layered store of host, template and global
//! definitions and writes the values back into texts, item keys and trigger
//! function calls.
//!
//! ## Architecture
//!
//! ```text
//! text → macro-parser (Scanner) → tokens
//!      → MacroCatalog (hosts → templates → global) → values
//!      → rewrite → text
//! ```
//!
//! ## Example
//!
//! ```rust
//! use macro_resolver::{MacroEngine, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_host_macro(1, "{$DISK}", "/")
//!     .with_host_macro(1, "{$DISK:\"db\"}", "/var/lib/db")
//!     .with_global_macro("{$WARN}", "80");
//! let engine = MacroEngine::new(source);
//!
//! let text = engine.resolve_text(&[1], "{$DISK:\"db\"} above {$WARN}%").unwrap();
//! assert_eq!(text, "/var/lib/db above 80%");
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod macro_function;
pub mod rewrite;
pub mod source;
pub mod trigger;

// Re-export public API
pub use catalog::{MacroCatalog, ResolvedValue};
pub use engine::{MacroEngine, UserMacroRequest};
pub use error::{ResolveError, SourceError};
pub use rewrite::{
    substitute, substitute_function, substitute_item_key, substitute_parameters,
    substitute_tokens, MacroValues,
};
pub use source::{HostId, MacroRow, MacroSource, MacroValueType, MemorySource, TemplateLink};
pub use trigger::{find_functions, resolve_references, trigger_constants};
