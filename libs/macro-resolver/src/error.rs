//! # Resolution Errors
//!
//! Error types for macro resolution.
//!
//! Malformed input text is never an error: unresolvable macros stay verbatim
//! and unparsable keys are returned unchanged. Errors only come from the data
//! access layer and from invalid settings.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while resolving macros.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Lookup of host, template or global macros failed.
    #[error("Macro source error: {0}")]
    Source(#[from] SourceError),

    /// Invalid resolver settings.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors reported by a [`MacroSource`](crate::source::MacroSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store could not answer a lookup.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// A serialized snapshot could not be read.
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::from(SourceError::Lookup("connection reset".to_string()));
        assert!(err.to_string().contains("Macro source error"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_config_error_converts() {
        let err = ResolveError::from(ConfigError::InvalidTemplateDepth(0));
        assert!(matches!(err, ResolveError::Config(_)));
    }
}
