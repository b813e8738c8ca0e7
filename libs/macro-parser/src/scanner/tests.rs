//! Tests for the token scanner.

use super::*;
use crate::token::MacroKind;
use proptest::prelude::*;

fn trigger_grammars() -> Grammars {
    Grammars::new()
        .user_macros()
        .macros("host", ["{HOST.HOST}", "{HOST.NAME}"])
        .macros_n("item", ["{ITEM.VALUE}"])
        .references()
        .lld_macros()
        .function_ids()
}

// =============================================================================
// SCAN
// =============================================================================

#[test]
fn test_scan_mixed_text() {
    let scanner = Scanner::new(&trigger_grammars());
    let text = "{HOST.NAME}: {ITEM.VALUE2} > {$LIMIT:\"db\"} on {#IF} ($1) {42}";
    let tokens = scanner.scan(text);

    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            MacroKind::BuiltinMacro,
            MacroKind::BuiltinMacro,
            MacroKind::ContextMacro,
            MacroKind::LldMacro,
            MacroKind::Reference,
            MacroKind::FunctionId,
        ]
    );
    assert_eq!(tokens[1].suffix_index, Some(2));
    for token in &tokens {
        assert_eq!(token.span.slice(text), Some(token.raw.as_str()));
    }
}

#[test]
fn test_unclosed_token_then_valid_token() {
    let scanner = Scanner::new(&Grammars::new().user_macros());
    let positions = scanner.positions("{$FOO {$BAR}");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions.get(&6).map(String::as_str), Some("{$BAR}"));
}

#[test]
fn test_disabled_grammars_are_ignored() {
    let scanner = Scanner::new(&Grammars::new().user_macros());
    assert!(scanner.scan("{#A} {12} $1 {HOST.HOST}").is_empty());
    assert!(Scanner::new(&Grammars::new()).scan("{$A}").is_empty());
}

#[test]
fn test_macro_function_wins_over_plain_token() {
    let scanner = Scanner::new(&Grammars::new().user_macros());
    let tokens = scanner.scan("{{$A}.lowercase()}");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].raw, "{{$A}.lowercase()}");
    assert!(tokens[0].macro_function.is_some());
}

#[test]
fn test_broken_macro_function_falls_back_to_inner_token() {
    let scanner = Scanner::new(&Grammars::new().user_macros());
    let positions = scanner.positions("{{$A}.lowercase(}");
    assert_eq!(positions.len(), 1);
    assert_eq!(positions.get(&1).map(String::as_str), Some("{$A}"));
}

#[test]
fn test_multibyte_text_offsets() {
    let scanner = Scanner::new(&Grammars::new().user_macros());
    let text = "héllo {$A} ünïcode {$B}";
    for token in scanner.scan(text) {
        assert_eq!(token.span.slice(text), Some(token.raw.as_str()));
    }
}

// =============================================================================
// EXTRACT
// =============================================================================

#[test]
fn test_extract_buckets_by_group() {
    let scanner = Scanner::new(&trigger_grammars());
    let found = scanner.extract(&["{HOST.HOST} {ITEM.VALUE}", "{HOST.HOST2} {ITEM.VALUE3} $2 {{#X}.uppercase()}"]);

    assert_eq!(found.macros["host"].len(), 1);
    assert_eq!(found.macros_n["item"].len(), 2);
    assert!(found.references.contains("$2"));
    assert!(found.lldmacros.contains_key("{{#X}.uppercase()}"));
    assert!(!found.macros.contains_key("item"));
}

#[test]
fn test_extract_nothing() {
    let scanner = Scanner::new(&trigger_grammars());
    assert!(scanner.extract(&["plain text", ""]).is_empty());
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn macro_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("{$A}".to_string()),
            Just("{$B:\"x\"}".to_string()),
            Just("{#C}".to_string()),
            Just("{HOST.HOST}".to_string()),
            Just("{12}".to_string()),
            Just("$3".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("$".to_string()),
            "[a-z :\"é]{0,4}",
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn scan_results_are_ordered_and_disjoint(text in macro_soup()) {
        let scanner = Scanner::new(&trigger_grammars());
        let tokens = scanner.scan(&text);

        for token in &tokens {
            prop_assert_eq!(token.span.slice(&text), Some(token.raw.as_str()));
        }
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end() <= pair[1].span.start());
        }
    }
}
