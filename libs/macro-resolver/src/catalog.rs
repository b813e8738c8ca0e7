//! # Macro Catalog
//!
//! Request-scoped snapshot of the macro definitions reachable from a set of
//! hosts, and the layered lookup over it.
//!
//! ## Resolution Order
//!
//! ```text
//! starting hosts → their templates → templates of those → ... → global
//! ```
//!
//! Within one tier, hosts are visited in ascending id order. For each host
//! that defines the macro:
//!
//! - an exact context match wins outright
//! - otherwise the first regex context (pattern order) matching the
//!   requested context wins outright
//! - otherwise a base value wins outright when no context was requested, or
//!   becomes the carried default when one was (first default found wins)
//!
//! The global tier follows the same rules but never replaces a default
//! carried up from a host or template.
//!
//! A host id is visited at most once per resolution, so template cycles end
//! the walk instead of looping. The walk is also capped at
//! `max_template_depth` template tiers.

use crate::error::ResolveError;
use crate::source::{HostId, MacroRow, MacroSource};
use config::constants::{ResolverConfig, SECRET_MASK};
use macro_parser::token::{TokenParser, UserMacroParser};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, trace, warn};

// =============================================================================
// RESOLVED VALUE
// =============================================================================

/// Outcome of resolving one macro name and context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedValue {
    /// Value that won outright.
    pub value: Option<String>,
    /// Base value met on the way while looking for a context value.
    pub value_default: Option<String>,
}

impl ResolvedValue {
    /// The value if any, otherwise the default.
    pub fn effective(&self) -> Option<&str> {
        self.value.as_deref().or(self.value_default.as_deref())
    }
}

// =============================================================================
// MACRO DEFINITION
// =============================================================================

/// All values one host (or the global tier) defines for one macro name.
#[derive(Debug, Clone, Default)]
pub struct MacroDefinition {
    base: Option<String>,
    contexts: HashMap<String, String>,
    /// Regex contexts keyed by pattern text, so iteration is in byte order.
    regex: BTreeMap<String, (Regex, String)>,
}

enum Lookup<'a> {
    Found(&'a str),
    Default(&'a str),
    Miss,
}

impl MacroDefinition {
    fn lookup(&self, context: Option<&str>) -> Lookup<'_> {
        match context {
            Some(context) => {
                if let Some(value) = self.contexts.get(context) {
                    return Lookup::Found(value);
                }
                let regex_hit = self
                    .regex
                    .values()
                    .find(|(pattern, _)| pattern.is_match(context));
                if let Some((_, value)) = regex_hit {
                    return Lookup::Found(value);
                }
                match &self.base {
                    Some(base) => Lookup::Default(base),
                    None => Lookup::Miss,
                }
            }
            None => match &self.base {
                Some(base) => Lookup::Found(base),
                None => Lookup::Miss,
            },
        }
    }
}

type MacroTable = HashMap<String, MacroDefinition>;

/// Parse a definition key and file its value under the right slot.
fn insert_row(table: &mut MacroTable, row: MacroRow, config: &ResolverConfig) {
    let key = row.macro_key.as_str();
    let token = match UserMacroParser::with_regex().try_match(key, 0) {
        Some(token) if token.len() == key.len() => token,
        _ => {
            warn!(key, "skipping malformed macro definition");
            return;
        }
    };

    let value = if config.mask_secrets && row.value_type.is_hidden() {
        SECRET_MASK.to_string()
    } else {
        row.value
    };

    let definition = table.entry(token.name).or_default();
    match (token.context, token.regex) {
        (_, Some(pattern)) => match Regex::new(&pattern) {
            Ok(regex) => {
                definition.regex.insert(pattern, (regex, value));
            }
            Err(error) => warn!(key, %error, "skipping invalid regex context"),
        },
        (Some(context), None) => {
            definition.contexts.insert(context, value);
        }
        (None, None) => definition.base = Some(value),
    }
}

// =============================================================================
// MACRO CATALOG
// =============================================================================

/// Macro definitions and template links loaded for one resolution request.
#[derive(Debug, Clone)]
pub struct MacroCatalog {
    config: ResolverConfig,
    host_macros: HashMap<HostId, MacroTable>,
    /// Linked templates per host, sorted and deduplicated.
    host_templates: HashMap<HostId, Vec<HostId>>,
    /// Hosts whose macros and links have been fetched.
    loaded: HashSet<HostId>,
    global_macros: Option<MacroTable>,
}

impl MacroCatalog {
    /// Empty catalog.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            host_macros: HashMap::new(),
            host_templates: HashMap::new(),
            loaded: HashSet::new(),
            global_macros: None,
        }
    }

    /// Load everything reachable from `host_ids` through template links.
    ///
    /// Fetches one tier at a time; every host is fetched at most once.
    ///
    /// ## Parameters
    ///
    /// - `source`: lookup backend
    /// - `host_ids`: starting hosts
    /// - `config`: resolver settings
    ///
    /// ## Example
    ///
    /// ```rust
    /// use config::constants::ResolverConfig;
    /// use macro_resolver::catalog::MacroCatalog;
    /// use macro_resolver::source::MemorySource;
    ///
    /// let source = MemorySource::new()
    ///     .with_template(1, 2)
    ///     .with_host_macro(2, "{$M}", "from template");
    /// let catalog = MacroCatalog::load(&source, &[1], ResolverConfig::default()).unwrap();
    /// let resolved = catalog.resolve("M", None, &[1]);
    /// assert_eq!(resolved.value.as_deref(), Some("from template"));
    /// ```
    pub fn load<S>(source: &S, host_ids: &[HostId], config: ResolverConfig) -> Result<Self, ResolveError>
    where
        S: MacroSource + ?Sized,
    {
        let mut catalog = Self::new(config);
        catalog.load_hosts(source, host_ids)?;
        Ok(catalog)
    }

    /// Fetch hosts not loaded yet, then their templates tier by tier.
    pub fn load_hosts<S>(&mut self, source: &S, host_ids: &[HostId]) -> Result<(), ResolveError>
    where
        S: MacroSource + ?Sized,
    {
        let mut tier: BTreeSet<HostId> = host_ids.iter().copied().collect();
        let mut depth = 0;

        loop {
            let fetch: Vec<HostId> = tier
                .iter()
                .copied()
                .filter(|id| !self.loaded.contains(id))
                .collect();
            if fetch.is_empty() {
                break;
            }

            let rows = source.host_macros(&fetch)?;
            let links = source.host_templates(&fetch)?;
            debug!(
                depth,
                hosts = fetch.len(),
                macros = rows.len(),
                links = links.len(),
                "loaded macro tier"
            );

            for row in rows {
                match row.host_id {
                    Some(host_id) => insert_row(self.host_macros.entry(host_id).or_default(), row, &self.config),
                    None => warn!(key = %row.macro_key, "host macro row without host id"),
                }
            }
            for link in links {
                self.host_templates
                    .entry(link.host_id)
                    .or_default()
                    .push(link.template_id);
            }
            for templates in self.host_templates.values_mut() {
                templates.sort_unstable();
                templates.dedup();
            }
            self.loaded.extend(fetch.iter().copied());

            tier = fetch
                .iter()
                .flat_map(|id| self.templates_of(*id))
                .copied()
                .filter(|id| !self.loaded.contains(id))
                .collect();

            if !tier.is_empty() && depth >= self.config.max_template_depth {
                warn!(
                    depth,
                    pending = tier.len(),
                    "template depth limit reached, not loading further templates"
                );
                break;
            }
            depth += 1;
        }

        Ok(())
    }

    /// Fetch global macros unless already loaded.
    pub fn load_globals<S>(&mut self, source: &S) -> Result<(), ResolveError>
    where
        S: MacroSource + ?Sized,
    {
        if self.global_macros.is_some() {
            return Ok(());
        }

        let rows = source.global_macros()?;
        debug!(macros = rows.len(), "loaded global macros");

        let mut table = MacroTable::new();
        for row in rows {
            insert_row(&mut table, row, &self.config);
        }
        self.global_macros = Some(table);
        Ok(())
    }

    /// True once global macros have been fetched.
    pub fn has_globals(&self) -> bool {
        self.global_macros.is_some()
    }

    /// Settings the catalog was loaded with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn templates_of(&self, host_id: HostId) -> &[HostId] {
        self.host_templates
            .get(&host_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve `name` with optional `context` across host and template tiers.
    ///
    /// The global tier is not consulted; see [`MacroCatalog::apply_global`].
    /// Hosts and templates that were not loaded are treated as defining
    /// nothing.
    pub fn resolve(&self, name: &str, context: Option<&str>, host_ids: &[HostId]) -> ResolvedValue {
        let mut resolved = ResolvedValue::default();
        let mut visited = HashSet::new();
        let mut tier: BTreeSet<HostId> = host_ids.iter().copied().collect();
        let mut depth = 0;

        loop {
            tier.retain(|id| visited.insert(*id));
            if tier.is_empty() {
                return resolved;
            }

            for host_id in &tier {
                let definition = match self.host_macros.get(host_id).and_then(|t| t.get(name)) {
                    Some(definition) => definition,
                    None => continue,
                };
                match definition.lookup(context) {
                    Lookup::Found(value) => {
                        trace!(name, host_id, depth, "macro resolved");
                        resolved.value = Some(value.to_string());
                        return resolved;
                    }
                    Lookup::Default(value) => {
                        if resolved.value_default.is_none() {
                            resolved.value_default = Some(value.to_string());
                        }
                    }
                    Lookup::Miss => {}
                }
            }

            let next: BTreeSet<HostId> = tier
                .iter()
                .flat_map(|id| self.templates_of(*id))
                .copied()
                .filter(|id| !visited.contains(id))
                .collect();
            if !next.is_empty() && depth >= self.config.max_template_depth {
                warn!(name, depth, "template depth limit reached");
                return resolved;
            }
            depth += 1;
            tier = next;
        }
    }

    /// Fall back to the global tier when the host tiers found no value.
    ///
    /// A global base value only becomes the default when no host or template
    /// default was carried up.
    pub fn apply_global(&self, name: &str, context: Option<&str>, resolved: ResolvedValue) -> ResolvedValue {
        if resolved.value.is_some() {
            return resolved;
        }
        let definition = match self.global_macros.as_ref().and_then(|t| t.get(name)) {
            Some(definition) => definition,
            None => return resolved,
        };

        match definition.lookup(context) {
            Lookup::Found(value) => ResolvedValue {
                value: Some(value.to_string()),
                ..resolved
            },
            Lookup::Default(value) if resolved.value_default.is_none() => ResolvedValue {
                value: None,
                value_default: Some(value.to_string()),
            },
            _ => resolved,
        }
    }
}
