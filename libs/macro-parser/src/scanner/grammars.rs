//! Grammar selection for a [`Scanner`](super::Scanner).

use std::collections::BTreeMap;

/// The set of grammars a scanner recognizes.
///
/// Built-in macros are grouped so extraction results can be bucketed per
/// group. `macros` groups match only their exact allow-listed form,
/// `macros_n` groups also accept a `1`-`9` function index suffix.
///
/// ## Example
///
/// ```rust
/// use macro_parser::scanner::Grammars;
///
/// let grammars = Grammars::new()
///     .user_macros()
///     .macros("host", ["{HOST.HOST}", "{HOST.NAME}"])
///     .macros_n("item", ["{ITEM.VALUE}"])
///     .references();
/// assert!(grammars.usermacros);
/// assert_eq!(grammars.macros["host"].len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammars {
    /// `{$NAME}` and `{$NAME:context}`, plain or wrapped in a macro function.
    pub usermacros: bool,
    /// Built-in macro groups without index suffix.
    pub macros: BTreeMap<String, Vec<String>>,
    /// Built-in macro groups with optional index suffix.
    pub macros_n: BTreeMap<String, Vec<String>>,
    /// `$1`..`$9`
    pub references: bool,
    /// `{#NAME}`, plain or wrapped in a macro function.
    pub lldmacros: bool,
    /// `{12345}`
    pub functionids: bool,
}

impl Grammars {
    /// No grammars enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable user macros.
    pub fn user_macros(mut self) -> Self {
        self.usermacros = true;
        self
    }

    /// Add a built-in macro group.
    pub fn macros<I, S>(mut self, group: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.macros
            .entry(group.to_string())
            .or_default()
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add an indexed built-in macro group.
    pub fn macros_n<I, S>(mut self, group: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.macros_n
            .entry(group.to_string())
            .or_default()
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Enable `$N` references.
    pub fn references(mut self) -> Self {
        self.references = true;
        self
    }

    /// Enable LLD macros.
    pub fn lld_macros(mut self) -> Self {
        self.lldmacros = true;
        self
    }

    /// Enable function ids.
    pub fn function_ids(mut self) -> Self {
        self.functionids = true;
        self
    }
}
