//! # Config Crate
//!
//! Centralized configuration constants for the macro resolution engine.
//! Placeholder strings, safety bounds and the resolver settings snapshot are
//! defined here so the parser and resolver crates never scatter literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ResolverConfig, UNRESOLVED_MACRO_STRING, MAX_TEMPLATE_DEPTH};
//!
//! let cfg = ResolverConfig::default();
//! assert_eq!(cfg.max_template_depth, MAX_TEMPLATE_DEPTH);
//! assert_eq!(UNRESOLVED_MACRO_STRING, "*UNKNOWN*");
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Pure values, usable from every crate in the workspace
//! - **Validated Snapshots**: `ResolverConfig::new` rejects unusable settings

pub mod constants;

#[cfg(test)]
mod tests;
