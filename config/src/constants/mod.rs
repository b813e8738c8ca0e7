//! Centralized configuration values shared across the macro engine crates.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// PLACEHOLDER STRINGS
// =============================================================================

/// Value produced for a macro whose resolution failed for a reason other than
/// "not defined" (unknown macro function, malformed function parameters).
///
/// # Examples
/// ```
/// use config::constants::UNRESOLVED_MACRO_STRING;
/// assert_eq!(UNRESOLVED_MACRO_STRING, "*UNKNOWN*");
/// ```
pub const UNRESOLVED_MACRO_STRING: &str = "*UNKNOWN*";

/// Placeholder shown instead of the value of secret and vault macros.
///
/// # Examples
/// ```
/// use config::constants::SECRET_MASK;
/// assert!(SECRET_MASK.chars().all(|c| c == '*'));
/// ```
pub const SECRET_MASK: &str = "******";

/// Value produced for a function-id placeholder that points at no function.
pub const ERROR_STRING: &str = "*ERROR*";

// =============================================================================
// GRAMMAR CONSTANTS
// =============================================================================

/// Prefix marking a regular-expression context in a macro definition key,
/// as in `{$MACRO:regex:"^/var"}`.
pub const REGEX_CONTEXT_PREFIX: &str = "regex:";

/// Highest positional index accepted by references (`$1`..`$9`) and by the
/// numeric suffix of indexed built-in macros (`{HOST.HOST1}`..`{HOST.HOST9}`).
///
/// # Examples
/// ```
/// use config::constants::MAX_REFERENCE_INDEX;
/// assert_eq!(MAX_REFERENCE_INDEX, 9);
/// ```
pub const MAX_REFERENCE_INDEX: u8 = 9;

/// Built-in macro recognized in trigger expressions while looking for
/// function-id placeholders.
pub const TRIGGER_VALUE_MACRO: &str = "{TRIGGER.VALUE}";

// =============================================================================
// SAFETY LIMITS
// =============================================================================

/// Maximum number of template tiers walked above the starting hosts.
///
/// The resolver already refuses to revisit a host id within one resolution,
/// so this bound only caps pathological but acyclic template chains.
///
/// # Examples
/// ```
/// use config::constants::MAX_TEMPLATE_DEPTH;
/// assert!(MAX_TEMPLATE_DEPTH >= 8);
/// ```
pub const MAX_TEMPLATE_DEPTH: usize = 64;

/// Maximum number of nested `[...]` arrays inside one item key parameter list.
///
/// Deeper keys are rejected as malformed and left unchanged by the rewriter.
///
/// # Examples
/// ```
/// use config::constants::MAX_KEY_NESTING;
/// assert!(MAX_KEY_NESTING >= 2);
/// ```
pub const MAX_KEY_NESTING: usize = 32;

// =============================================================================
// RESOLVER CONFIG
// =============================================================================

/// Immutable snapshot of resolver settings shared between crates.
///
/// # Examples
/// ```
/// use config::constants::ResolverConfig;
/// let config = ResolverConfig::default();
/// assert!(config.mask_secrets);
/// assert!(!config.unset_undefined);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Template tiers walked before the resolver gives up on a host chain.
    pub max_template_depth: usize,
    /// Replace secret and vault values with [`SECRET_MASK`].
    pub mask_secrets: bool,
    /// Drop macros that resolve nowhere instead of mapping them to their own
    /// token text.
    pub unset_undefined: bool,
}

impl ResolverConfig {
    /// Builds a configuration, rejecting a zero template depth.
    ///
    /// # Examples
    /// ```
    /// use config::constants::ResolverConfig;
    /// let cfg = ResolverConfig::new(16, false, true).expect("valid config");
    /// assert_eq!(cfg.max_template_depth, 16);
    /// ```
    pub fn new(
        max_template_depth: usize,
        mask_secrets: bool,
        unset_undefined: bool,
    ) -> Result<Self, ConfigError> {
        if max_template_depth == 0 {
            return Err(ConfigError::InvalidTemplateDepth(max_template_depth));
        }
        Ok(Self {
            max_template_depth,
            mask_secrets,
            unset_undefined,
        })
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_template_depth: MAX_TEMPLATE_DEPTH,
            mask_secrets: true,
            unset_undefined: false,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when the template depth bound is zero.
    InvalidTemplateDepth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTemplateDepth(value) => {
                write!(f, "max_template_depth must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
