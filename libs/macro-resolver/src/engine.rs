//! # Macro Engine
//!
//! Facade that scans strings, resolves the user macros found in them through
//! a [`MacroSource`] and writes the values back.
//!
//! Every call is one resolution request: definitions are loaded into a fresh
//! [`MacroCatalog`] and dropped when the call returns.
//!
//! ## Example
//!
//! ```rust
//! use macro_resolver::{MacroEngine, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_template(1, 100)
//!     .with_host_macro(100, "{$THRESHOLD}", "90");
//! let engine = MacroEngine::new(source);
//!
//! assert_eq!(engine.resolve_function(&[1], "last({$THRESHOLD})").unwrap(), "last(90)");
//! ```

use crate::catalog::{MacroCatalog, ResolvedValue};
use crate::error::ResolveError;
use crate::macro_function::apply_macro_function;
use crate::rewrite::{substitute, substitute_parameters, substitute_tokens, MacroValues};
use crate::source::{HostId, MacroSource};
use config::constants::{ResolverConfig, ERROR_STRING, UNRESOLVED_MACRO_STRING};
use macro_parser::params::{
    flatten_parameters, FunctionCallParser, ItemKeyParser, KeyParameter, ParamStyle,
};
use macro_parser::{Grammars, MacroKind, MacroToken, Scanner};
use std::collections::BTreeSet;
use tracing::debug;

// =============================================================================
// REQUESTS
// =============================================================================

/// User macros to resolve against one set of hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMacroRequest {
    /// Hosts the macros are resolved for.
    pub host_ids: Vec<HostId>,
    /// Tokens to resolve. Tokens that are not user macros are ignored.
    pub macros: Vec<MacroToken>,
}

impl UserMacroRequest {
    /// Create a request.
    pub fn new(host_ids: &[HostId], macros: impl IntoIterator<Item = MacroToken>) -> Self {
        Self {
            host_ids: host_ids.to_vec(),
            macros: macros.into_iter().collect(),
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Resolves and substitutes user macros.
#[derive(Debug, Clone)]
pub struct MacroEngine<S> {
    source: S,
    config: ResolverConfig,
    scanner: Scanner,
}

impl<S: MacroSource> MacroEngine<S> {
    /// Engine with default settings.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    /// Engine with explicit settings.
    pub fn with_config(source: S, config: ResolverConfig) -> Self {
        Self {
            source,
            config,
            scanner: Scanner::new(&Grammars::new().user_macros()),
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Backing lookup source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve one macro name and context, global tier included.
    ///
    /// ## Returns
    ///
    /// The layered result before placeholder handling: both fields are
    /// `None` when nothing defines the macro.
    pub fn resolve_value(
        &self,
        host_ids: &[HostId],
        name: &str,
        context: Option<&str>,
    ) -> Result<ResolvedValue, ResolveError> {
        let mut catalog = MacroCatalog::load(&self.source, host_ids, self.config)?;
        let resolved = catalog.resolve(name, context, host_ids);
        if resolved.value.is_some() {
            return Ok(resolved);
        }

        catalog.load_globals(&self.source)?;
        Ok(catalog.apply_global(name, context, resolved))
    }

    /// Resolve the user macros of many requests with one catalog load.
    ///
    /// Host definitions are fetched once for the union of all host ids. The
    /// global tier is fetched only when some macro is still unresolved.
    ///
    /// ## Returns
    ///
    /// One map per request from token text to final value. A macro with no
    /// value anywhere maps to its own token text, or is left out when
    /// `unset_undefined` is set.
    pub fn resolve_user_macros(
        &self,
        requests: &[UserMacroRequest],
    ) -> Result<Vec<MacroValues>, ResolveError> {
        let host_ids: Vec<HostId> = requests
            .iter()
            .flat_map(|request| request.host_ids.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut catalog = MacroCatalog::load(&self.source, &host_ids, self.config)?;

        let mut resolved: Vec<Vec<(&MacroToken, ResolvedValue)>> = requests
            .iter()
            .map(|request| {
                request
                    .macros
                    .iter()
                    .filter(|token| token.is_user_macro())
                    .map(|token| {
                        let value =
                            catalog.resolve(&token.name, token.context.as_deref(), &request.host_ids);
                        (token, value)
                    })
                    .collect()
            })
            .collect();

        let unresolved = resolved
            .iter()
            .flatten()
            .filter(|(_, value)| value.value.is_none())
            .count();
        debug!(
            requests = requests.len(),
            hosts = host_ids.len(),
            unresolved,
            "resolved user macros on host tiers"
        );

        if unresolved > 0 {
            catalog.load_globals(&self.source)?;
            for (token, value) in resolved.iter_mut().flatten() {
                let carried = std::mem::take(value);
                *value = catalog.apply_global(&token.name, token.context.as_deref(), carried);
            }
        }

        Ok(resolved
            .into_iter()
            .map(|entries| {
                entries
                    .into_iter()
                    .filter_map(|(token, value)| {
                        self.final_value(token, value)
                            .map(|value| (token.raw.clone(), value))
                    })
                    .collect()
            })
            .collect())
    }

    /// Substitute the user macros of `text`.
    pub fn resolve_text(&self, host_ids: &[HostId], text: &str) -> Result<String, ResolveError> {
        let tokens = self.scanner.scan(text);
        if tokens.is_empty() {
            return Ok(text.to_string());
        }

        let values = self.resolve_tokens(host_ids, tokens.iter().cloned())?;
        Ok(substitute_tokens(text, &tokens, &values))
    }

    /// Substitute the user macros of many texts with one catalog load.
    pub fn resolve_texts<T>(&self, host_ids: &[HostId], texts: &[T]) -> Result<Vec<String>, ResolveError>
    where
        T: AsRef<str> + Sync,
    {
        let extracted = self.scanner.extract(texts);
        let values = self.resolve_tokens(host_ids, extracted.usermacros.into_values())?;

        Ok(texts
            .iter()
            .map(|text| {
                let text = text.as_ref();
                substitute(text, &self.scanner.positions(text), &values)
            })
            .collect())
    }

    /// Substitute the user macros inside the parameters of an item key.
    ///
    /// Keys that do not parse are returned unchanged.
    pub fn resolve_item_key(&self, host_ids: &[HostId], key: &str) -> Result<String, ResolveError> {
        let parameters = match ItemKeyParser::parse(key) {
            Ok(parsed) => parsed.parameters,
            Err(_) => return Ok(key.to_string()),
        };
        let tokens = self.parameter_tokens(&parameters);
        if tokens.is_empty() {
            return Ok(key.to_string());
        }

        let values = self.resolve_tokens(host_ids, tokens)?;
        Ok(substitute_parameters(
            key,
            &parameters,
            &self.scanner,
            &values,
            ParamStyle::ItemKey,
        ))
    }

    /// Substitute the user macros inside the parameters of a function call.
    ///
    /// The item query parameter is left alone. Calls that do not parse are
    /// returned unchanged.
    pub fn resolve_function(&self, host_ids: &[HostId], call: &str) -> Result<String, ResolveError> {
        let parameters = match FunctionCallParser::parse(call) {
            Ok(parsed) => parsed.parameters,
            Err(_) => return Ok(call.to_string()),
        };
        let tokens = self.parameter_tokens(&parameters);
        if tokens.is_empty() {
            return Ok(call.to_string());
        }

        let values = self.resolve_tokens(host_ids, tokens)?;
        Ok(substitute_parameters(
            call,
            &parameters,
            &self.scanner,
            &values,
            ParamStyle::Function,
        ))
    }

    /// Substitute every token `grammars` recognizes in `text`.
    ///
    /// User macros go through the resolver. Other tokens take their value from
    /// `builtin_values`, keyed by token text; a wrapped token without its own
    /// entry uses the entry of the macro it wraps, passed through its macro
    /// function. Function-id placeholders without a value become
    /// `ERROR_STRING`; other tokens without a value stay as they are.
    pub fn resolve_text_with(
        &self,
        host_ids: &[HostId],
        text: &str,
        grammars: &Grammars,
        builtin_values: &MacroValues,
    ) -> Result<String, ResolveError> {
        let scanner = Scanner::new(grammars);
        let tokens = scanner.scan(text);

        let user_macros: Vec<MacroToken> = tokens
            .iter()
            .filter(|token| token.is_user_macro())
            .cloned()
            .collect();
        let mut values = if user_macros.is_empty() {
            MacroValues::new()
        } else {
            self.resolve_tokens(host_ids, user_macros)?
        };

        for token in tokens.iter().filter(|token| !token.is_user_macro()) {
            if let Some(value) = builtin_value(token, builtin_values) {
                values.insert(token.raw.clone(), value);
            }
        }

        Ok(substitute_tokens(text, &tokens, &values))
    }

    fn resolve_tokens(
        &self,
        host_ids: &[HostId],
        tokens: impl IntoIterator<Item = MacroToken>,
    ) -> Result<MacroValues, ResolveError> {
        let request = UserMacroRequest::new(host_ids, tokens);
        Ok(self
            .resolve_user_macros(std::slice::from_ref(&request))?
            .pop()
            .unwrap_or_default())
    }

    fn parameter_tokens(&self, parameters: &[KeyParameter]) -> Vec<MacroToken> {
        flatten_parameters(parameters)
            .iter()
            .flat_map(|value| self.scanner.scan(value))
            .collect()
    }

    fn final_value(&self, token: &MacroToken, resolved: ResolvedValue) -> Option<String> {
        match resolved.value.or(resolved.value_default) {
            Some(value) => Some(match &token.macro_function {
                Some(function) => apply_macro_function(&value, function)
                    .unwrap_or_else(|| UNRESOLVED_MACRO_STRING.to_string()),
                None => value,
            }),
            None if self.config.unset_undefined => None,
            None => Some(token.raw.clone()),
        }
    }
}

fn builtin_value(token: &MacroToken, builtin_values: &MacroValues) -> Option<String> {
    if let Some(value) = builtin_values.get(&token.raw) {
        return Some(value.clone());
    }
    if token.kind == MacroKind::FunctionId {
        return Some(ERROR_STRING.to_string());
    }
    let function = token.macro_function.as_ref()?;
    let value = builtin_values.get(&function.inner)?;
    Some(apply_macro_function(value, function).unwrap_or_else(|| UNRESOLVED_MACRO_STRING.to_string()))
}
