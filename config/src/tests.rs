//! # Tests for Config Constants
//!
//! Unit tests verifying the configuration constants stay consistent with the
//! grammars that depend on them.

use crate::constants::*;

// =============================================================================
// PLACEHOLDER TESTS
// =============================================================================

#[test]
fn test_placeholders_are_not_macros() {
    // A placeholder must never be picked up again by the scanner.
    for placeholder in [UNRESOLVED_MACRO_STRING, SECRET_MASK, ERROR_STRING] {
        assert!(!placeholder.contains('{'));
        assert!(!placeholder.contains('$'));
    }
}

#[test]
fn test_placeholders_are_distinct() {
    assert_ne!(UNRESOLVED_MACRO_STRING, SECRET_MASK);
    assert_ne!(UNRESOLVED_MACRO_STRING, ERROR_STRING);
}

// =============================================================================
// GRAMMAR TESTS
// =============================================================================

#[test]
fn test_reference_index_is_single_digit() {
    assert!((1..=9).contains(&MAX_REFERENCE_INDEX));
}

#[test]
fn test_regex_prefix_ends_with_colon() {
    assert!(REGEX_CONTEXT_PREFIX.ends_with(':'));
}

#[test]
fn test_trigger_value_macro_is_braced() {
    assert!(TRIGGER_VALUE_MACRO.starts_with('{'));
    assert!(TRIGGER_VALUE_MACRO.ends_with('}'));
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_template_depth_is_bounded() {
    assert!(MAX_TEMPLATE_DEPTH > 1);
    assert!(MAX_TEMPLATE_DEPTH <= 1024);
}

#[test]
fn test_key_nesting_is_bounded() {
    assert!(MAX_KEY_NESTING >= 2);
    assert!(MAX_KEY_NESTING <= 1024);
}
