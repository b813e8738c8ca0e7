//! Scanning, resolving and rewriting strings end to end.

use config::constants::{ERROR_STRING, UNRESOLVED_MACRO_STRING};
use macro_parser::{FunctionCallParser, Grammars, ItemKeyParser, KeyParameter, ParamKind, Scanner};
use macro_resolver::{
    find_functions, resolve_references, substitute, MacroEngine, MacroValues, MemorySource,
};
use std::collections::BTreeMap;

fn engine() -> MacroEngine<MemorySource> {
    let source = MemorySource::new()
        .with_template(1, 100)
        .with_host_macro(1, "{$NAME}", "Web Server")
        .with_host_macro(1, "{$LIST}", "a,b")
        .with_host_macro(100, "{$THRESHOLD}", "90")
        .with_host_macro(100, "{$VERSION}", "6.4.2")
        .with_global_macro("{$LOAD}", "1.23456");
    MacroEngine::new(source)
}

/// Rebuild the text between the outer delimiters from parameter spans.
fn reassemble(list_text: &str, parameters: &[KeyParameter]) -> String {
    let mut rebuilt = String::new();
    let mut copied = 0;
    for parameter in parameters {
        rebuilt.push_str(&list_text[copied..parameter.pos]);
        rebuilt.push_str(&parameter.raw);
        copied = parameter.pos + parameter.raw.len();
    }
    rebuilt.push_str(&list_text[copied..]);
    rebuilt
}

// =============================================================================
// PLAIN TEXT
// =============================================================================

#[test]
fn test_text_without_tokens_is_unchanged() {
    let text = "no {macros} $here {#at} all";
    let scanner = Scanner::new(&Grammars::new().user_macros());
    assert!(scanner.positions(text).is_empty());
    assert_eq!(substitute(text, &BTreeMap::new(), &MacroValues::new()), text);
    assert_eq!(engine().resolve_text(&[1], text).unwrap(), text);
}

#[test]
fn test_unresolved_macros_keep_their_place() {
    let resolved = engine()
        .resolve_text(&[1], "{$UNDEFINED} on {$NAME} ({$NAME:\"x\"}) {$ALSO.UNDEFINED:ctx}")
        .unwrap();
    assert_eq!(resolved, "{$UNDEFINED} on Web Server (Web Server) {$ALSO.UNDEFINED:ctx}");
}

#[test]
fn test_malformed_macros_are_left_alone() {
    let resolved = engine().resolve_text(&[1], "{$NAME {$NAME} {$name}").unwrap();
    assert_eq!(resolved, "{$NAME Web Server {$name}");
}

#[test]
fn test_resolve_many_texts() {
    let texts = ["{$NAME}", "{$THRESHOLD}%", "plain", "{$LOAD}/{$MISSING}"];
    let resolved = engine().resolve_texts(&[1], &texts).unwrap();
    assert_eq!(resolved, vec!["Web Server", "90%", "plain", "1.23456/{$MISSING}"]);
}

// =============================================================================
// ITEM KEYS AND FUNCTIONS
// =============================================================================

#[test]
fn test_item_key_round_trip() {
    let key = r#"sensor["a,b", [c, "d\"e"]]"#;
    let parsed = ItemKeyParser::parse(key).unwrap();
    assert_eq!(parsed.parameters.len(), 2);
    assert_eq!(parsed.parameters[1].kind, ParamKind::NestedArray);

    assert_eq!(reassemble(key, &parsed.parameters), key);

    let array = &parsed.parameters[1];
    assert_eq!(reassemble(&array.raw, &array.parameters), array.raw);
}

#[test]
fn test_forced_quoting_on_substitution() {
    let engine = engine();
    assert_eq!(engine.resolve_item_key(&[1], "k[{$LIST},x]").unwrap(), r#"k["a,b",x]"#);
    assert_eq!(engine.resolve_item_key(&[1], "k[{$THRESHOLD}]").unwrap(), "k[90]");
    assert_eq!(engine.resolve_item_key(&[1], "k[\"{$THRESHOLD}\"]").unwrap(), "k[\"90\"]");
    assert_eq!(engine.resolve_item_key(&[1], "k[{$LIST}").unwrap(), "k[{$LIST}");
    assert_eq!(engine.resolve_item_key(&[1], "k[{$NONE}]").unwrap(), "k[{$NONE}]");
}

#[test]
fn test_deeply_nested_key_is_returned_unchanged() {
    let engine = engine();
    let deep = format!("k[{}{{$THRESHOLD}}{}]", "[".repeat(100_000), "]".repeat(100_000));
    assert_eq!(engine.resolve_item_key(&[1], &deep).unwrap(), deep);

    let shallow = "k[[[{$THRESHOLD}]]]";
    assert_eq!(engine.resolve_item_key(&[1], shallow).unwrap(), "k[[[90]]]");
}

#[test]
fn test_function_end_to_end() {
    let call = "last({$THRESHOLD})";
    let parsed = FunctionCallParser::parse(call).unwrap();
    assert_eq!(parsed.parameters.len(), 1);
    assert_eq!(parsed.parameters[0].kind, ParamKind::Unquoted);
    assert_eq!(parsed.parameters[0].raw, "{$THRESHOLD}");

    assert_eq!(engine().resolve_function(&[1], call).unwrap(), "last(90)");
}

#[test]
fn test_function_query_is_not_substituted() {
    let resolved = engine()
        .resolve_function(&[1], "count(/{$NAME}/key,{$THRESHOLD}m,\"gt\",{$LIST})")
        .unwrap();
    assert_eq!(resolved, "count(/{$NAME}/key,90m,\"gt\",\"a,b\")");
}

// =============================================================================
// MACRO FUNCTIONS AND BUILT-IN VALUES
// =============================================================================

#[test]
fn test_user_macro_functions() {
    let engine = engine();
    assert_eq!(
        engine.resolve_text(&[1], r#"v{{$VERSION}.regsub("^(\d+)\.(\d+)", \1.\2)}"#).unwrap(),
        "v6.4"
    );
    assert_eq!(engine.resolve_text(&[1], "{{$LOAD}.fmtnum(2)}").unwrap(), "1.23");
    assert_eq!(
        engine.resolve_text(&[1], "{{$NAME}.nosuchfunc()}").unwrap(),
        UNRESOLVED_MACRO_STRING
    );
    assert_eq!(
        engine.resolve_text(&[1], "{{$MISSING}.lowercase()}").unwrap(),
        "{{$MISSING}.lowercase()}"
    );
}

#[test]
fn test_builtin_values_supplied_by_caller() {
    let grammars = Grammars::new()
        .user_macros()
        .macros("host", ["{HOST.NAME}"])
        .macros_n("item", ["{ITEM.VALUE}"])
        .lld_macros()
        .references();
    let builtin: MacroValues = [
        ("{HOST.NAME}", "srv-01"),
        ("{ITEM.VALUE}", "42"),
        ("{ITEM.VALUE2}", "43"),
        ("{#FS}", "/data"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let text = "{HOST.NAME}/{{HOST.NAME}.uppercase()}: {ITEM.VALUE} {ITEM.VALUE2} {ITEM.VALUE3} on {#FS} > {$THRESHOLD} $1";
    let resolved = engine().resolve_text_with(&[1], text, &grammars, &builtin).unwrap();
    assert_eq!(resolved, "srv-01/SRV-01: 42 43 {ITEM.VALUE3} on /data > 90 $1");
}

// =============================================================================
// TRIGGER HELPERS
// =============================================================================

#[test]
fn test_trigger_reference_substitution() {
    let expression = r#"{15}>{$THRESHOLD} and {16}="disk full""#;
    let functions = find_functions(expression);
    assert_eq!(functions[&1], "15");
    assert_eq!(functions[&2], "16");

    let references = resolve_references(expression, ["$1", "$2", "$3"]);
    assert_eq!(references["$1"], "{$THRESHOLD}");
    assert_eq!(references["$2"], "disk full");
    assert_eq!(references["$3"], "");

    let description = "Value above $1: $2";
    let grammars = Grammars::new().references();
    let values: MacroValues = references.into_iter().collect();
    let described = engine()
        .resolve_text_with(&[1], description, &grammars, &values)
        .unwrap();
    assert_eq!(described, "Value above {$THRESHOLD}: disk full");
}

#[test]
fn test_unknown_function_id_is_an_error_value() {
    let grammars = Grammars::new().user_macros().function_ids();
    let values: MacroValues = [("{15}".to_string(), "12.5".to_string())].into_iter().collect();
    let expanded = engine()
        .resolve_text_with(&[1], "{15}>{$THRESHOLD} or {99}>0", &grammars, &values)
        .unwrap();
    assert_eq!(expanded, format!("12.5>90 or {ERROR_STRING}>0"));
}
