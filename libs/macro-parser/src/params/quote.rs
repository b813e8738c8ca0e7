//! Quoting rules for rewritten parameters.

/// Which kind of list a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `key[...]`
    ItemKey,
    /// `func(...)`
    Function,
}

impl ParamStyle {
    /// Closing delimiter of the list.
    pub fn close(self) -> char {
        match self {
            Self::ItemKey => ']',
            Self::Function => ')',
        }
    }
}

/// Quote `value` for use as a parameter if needed.
///
/// A value is quoted when `forced` is set, or when leaving it unquoted would
/// change how the list parses: it contains `"`, `,` or the closing delimiter,
/// starts with `[`, or has surrounding spaces. Inside quotes `\` becomes `\\`
/// and `"` becomes `\"`.
///
/// ## Example
///
/// ```rust
/// use macro_parser::params::{quote_param, ParamStyle};
///
/// assert_eq!(quote_param("eth0", false, ParamStyle::ItemKey), "eth0");
/// assert_eq!(quote_param("a,b", false, ParamStyle::ItemKey), r#""a,b""#);
/// assert_eq!(quote_param(r#"say "x""#, true, ParamStyle::Function), r#""say \"x\"""#);
/// ```
pub fn quote_param(value: &str, forced: bool, style: ParamStyle) -> String {
    if !forced && !needs_quoting(value, style) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn needs_quoting(value: &str, style: ParamStyle) -> bool {
    value.contains(['"', ',', style.close()])
        || value.starts_with('[')
        || value.starts_with(' ')
        || value.ends_with(' ')
}

/// Strip the quotes from a quoted parameter and resolve `\"` and `\\`.
///
/// Text that is not quoted is returned as is. Other backslashes are kept.
pub fn unquote_param(raw: &str) -> String {
    let inner = match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next_if(|next| matches!(next, '"' | '\\')) {
                value.push(escaped);
                continue;
            }
        }
        value.push(c);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_stays_unquoted() {
        assert_eq!(quote_param("/var/log", false, ParamStyle::ItemKey), "/var/log");
        assert_eq!(quote_param("", false, ParamStyle::ItemKey), "");
    }

    #[test]
    fn test_delimiters_force_quotes() {
        assert_eq!(quote_param("a]b", false, ParamStyle::ItemKey), r#""a]b""#);
        assert_eq!(quote_param("a)b", false, ParamStyle::ItemKey), "a)b");
        assert_eq!(quote_param("a)b", false, ParamStyle::Function), r#""a)b""#);
        assert_eq!(quote_param("[x", false, ParamStyle::ItemKey), r#""[x""#);
        assert_eq!(quote_param(" x", false, ParamStyle::ItemKey), r#"" x""#);
    }

    #[test]
    fn test_backslash_escaped_inside_quotes() {
        assert_eq!(quote_param(r"C:\tmp", true, ParamStyle::ItemKey), r#""C:\\tmp""#);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote_param(r#""a \"b\" \\ \n""#), r#"a "b" \ \n"#);
        assert_eq!(unquote_param("plain"), "plain");
        assert_eq!(unquote_param(r#""""#), "");
    }

    #[test]
    fn test_quote_then_unquote_restores_value() {
        for value in [r#"x"y"#, r"back\slash", r#"\""#, "a,b]c"] {
            assert_eq!(unquote_param(&quote_param(value, true, ParamStyle::ItemKey)), value);
        }
    }
}
