//! Tests for item key and function call parsing.

use super::*;

// =============================================================================
// ITEM KEYS
// =============================================================================

#[test]
fn test_key_without_parameters() {
    let key = ItemKeyParser::parse("system.uptime").unwrap();
    assert_eq!(key.name, "system.uptime");
    assert!(key.parameters.is_empty());
}

#[test]
fn test_key_parameter_kinds_and_positions() {
    let text = r#"web.page.get[ host , "/index.html", [a, "b"] ]"#;
    let key = ItemKeyParser::parse(text).unwrap();

    let kinds: Vec<_> = key.parameters.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![ParamKind::Unquoted, ParamKind::Quoted, ParamKind::NestedArray]
    );

    for parameter in &key.parameters {
        assert_eq!(parameter.span().slice(text), Some(parameter.raw.as_str()));
    }
    assert_eq!(key.parameters[0].raw, "host");
    assert_eq!(key.parameters[1].value(), "/index.html");
}

#[test]
fn test_nested_positions_are_relative_to_array() {
    let key = ItemKeyParser::parse(r#"k[x,[ a ,"b"]]"#).unwrap();
    let array = &key.parameters[1];
    assert_eq!(array.raw, r#"[ a ,"b"]"#);
    assert_eq!(array.pos, 4);

    for child in &array.parameters {
        assert_eq!(child.span().slice(&array.raw), Some(child.raw.as_str()));
    }
    assert_eq!(array.parameters[0].pos, 2);
    assert_eq!(array.parameters[1].pos, 5);
}

#[test]
fn test_empty_parameters() {
    let key = ItemKeyParser::parse("k[]").unwrap();
    assert_eq!(key.parameters.len(), 1);
    assert_eq!(key.parameters[0].raw, "");

    let key = ItemKeyParser::parse("k[a,,]").unwrap();
    let raws: Vec<_> = key.parameters.iter().map(|p| p.raw.as_str()).collect();
    assert_eq!(raws, vec!["a", "", ""]);
    assert_eq!(key.parameters[2].pos, 5);
}

#[test]
fn test_quoted_parameter_with_escapes() {
    let key = ItemKeyParser::parse(r#"k["a\"],b"]"#).unwrap();
    assert_eq!(key.parameters.len(), 1);
    assert_eq!(key.parameters[0].value(), r#"a"],b"#);
}

#[test]
fn test_malformed_keys() {
    assert!(ItemKeyParser::parse("").is_err());
    assert!(ItemKeyParser::parse("k[a").is_err());
    assert!(ItemKeyParser::parse(r#"k["a]"#).is_err());
    assert!(ItemKeyParser::parse(r#"k["a"b]"#).is_err());
    assert!(ItemKeyParser::parse("k[a]x").is_err());

    let error = ItemKeyParser::parse(r#"k["abc"#).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::UnterminatedQuote);
    assert_eq!(error.span.start(), 2);
}

fn nested_key(depth: usize) -> String {
    format!("k[{}x{}]", "[".repeat(depth), "]".repeat(depth))
}

#[test]
fn test_nesting_up_to_limit() {
    let key = ItemKeyParser::parse(&nested_key(MAX_KEY_NESTING)).unwrap();
    let mut parameter = &key.parameters[0];
    for _ in 1..MAX_KEY_NESTING {
        assert_eq!(parameter.kind, ParamKind::NestedArray);
        parameter = &parameter.parameters[0];
    }
    assert_eq!(parameter.parameters[0].raw, "x");
}

#[test]
fn test_nesting_past_limit_is_an_error() {
    let error = ItemKeyParser::parse(&nested_key(MAX_KEY_NESTING + 1)).unwrap_err();
    assert_eq!(
        error.kind,
        ParseErrorKind::NestingTooDeep {
            limit: MAX_KEY_NESTING
        }
    );
    assert_eq!(error.span.start(), 2 + MAX_KEY_NESTING);
}

#[test]
fn test_very_deep_nesting_is_an_error() {
    let error = ItemKeyParser::parse(&nested_key(200_000)).unwrap_err();
    assert!(matches!(error.kind, ParseErrorKind::NestingTooDeep { .. }));
}

// =============================================================================
// FUNCTION CALLS
// =============================================================================

#[test]
fn test_function_call() {
    let call = FunctionCallParser::parse("last({$PERIOD})").unwrap();
    assert_eq!(call.name, "last");
    assert_eq!(call.parameters.len(), 1);
    assert_eq!(call.parameters[0].raw, "{$PERIOD}");
    assert_eq!(call.parameters[0].pos, 5);
}

#[test]
fn test_function_without_parameters() {
    let call = FunctionCallParser::parse("now()").unwrap();
    assert!(call.parameters.is_empty());
}

#[test]
fn test_function_query_keeps_brackets() {
    let text = r#"count(/srv/net.if.in[eth0,"x,y"], 5m, "eq", "{$V}")"#;
    let call = FunctionCallParser::parse(text).unwrap();

    assert_eq!(call.parameters[0].kind, ParamKind::Query);
    assert_eq!(call.parameters[0].raw, r#"/srv/net.if.in[eth0,"x,y"]"#);
    assert_eq!(call.parameters[3].kind, ParamKind::Quoted);
    assert_eq!(call.parameters[3].value(), "{$V}");

    for parameter in &call.parameters {
        assert_eq!(parameter.span().slice(text), Some(parameter.raw.as_str()));
    }
}

#[test]
fn test_function_arrays_are_not_nested() {
    let call = FunctionCallParser::parse("f(1,[a,b])").unwrap();
    assert_eq!(call.parameters.len(), 2);
    assert_eq!(call.parameters[1].kind, ParamKind::Unquoted);
    assert_eq!(call.parameters[1].raw, "[a,b]");
}

#[test]
fn test_malformed_function_calls() {
    assert!(FunctionCallParser::parse("last").is_err());
    assert!(FunctionCallParser::parse("last(1").is_err());
    assert!(FunctionCallParser::parse("(1)").is_err());
    assert!(FunctionCallParser::parse("f(/h/k[a)").is_err());
}

// =============================================================================
// FLATTEN
// =============================================================================

#[test]
fn test_flatten_skips_query() {
    let call = FunctionCallParser::parse(r#"avg(/h/k,"1h",{$X})"#).unwrap();
    assert_eq!(flatten_parameters(&call.parameters), vec!["1h", "{$X}"]);
}
