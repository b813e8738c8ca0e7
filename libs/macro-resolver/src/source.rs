//! # Macro Source
//!
//! Read-only lookup seam between the resolver and wherever macro definitions
//! and template links are stored.
//!
//! Lookups are batched by host id set; the resolver never asks for one host
//! at a time. [`MemorySource`] is an in-memory snapshot that can be built in
//! code or loaded from JSON.
//!
//! ## Example
//!
//! ```rust
//! use macro_resolver::source::{MacroSource, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with_host_macro(10, "{$PORT}", "8080")
//!     .with_template(10, 20);
//! assert_eq!(source.host_macros(&[10]).unwrap().len(), 1);
//! assert_eq!(source.host_templates(&[10]).unwrap()[0].template_id, 20);
//! ```

use crate::error::SourceError;
use serde::{Deserialize, Serialize};

/// Host and template identifier. Templates share the id space of hosts.
pub type HostId = u64;

// =============================================================================
// ROWS
// =============================================================================

/// How a macro value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroValueType {
    /// Plain text.
    #[default]
    Text,
    /// Secret text, never shown.
    Secret,
    /// Path into an external vault, never shown.
    Vault,
}

impl MacroValueType {
    /// True for values that must be masked.
    pub fn is_hidden(self) -> bool {
        matches!(self, Self::Secret | Self::Vault)
    }
}

/// One macro definition row.
///
/// `macro_key` is the definition key as written, e.g. `{$NAME}`,
/// `{$NAME:"ctx"}` or `{$NAME:regex:"^a"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRow {
    /// Owning host or template; absent for global macros.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<HostId>,
    /// Definition key.
    #[serde(rename = "macro")]
    pub macro_key: String,
    /// Stored value.
    pub value: String,
    /// Storage type of the value.
    #[serde(default, rename = "type")]
    pub value_type: MacroValueType,
}

/// One host-to-template link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateLink {
    /// Linking host or template.
    pub host_id: HostId,
    /// Linked template.
    pub template_id: HostId,
}

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Batched, read-only lookups of macro definitions and template links.
pub trait MacroSource {
    /// Macro rows defined directly on any of `host_ids`.
    fn host_macros(&self, host_ids: &[HostId]) -> Result<Vec<MacroRow>, SourceError>;

    /// Template links out of any of `host_ids`.
    fn host_templates(&self, host_ids: &[HostId]) -> Result<Vec<TemplateLink>, SourceError>;

    /// All global macro rows.
    fn global_macros(&self) -> Result<Vec<MacroRow>, SourceError>;
}

impl<S: MacroSource + ?Sized> MacroSource for &S {
    fn host_macros(&self, host_ids: &[HostId]) -> Result<Vec<MacroRow>, SourceError> {
        (**self).host_macros(host_ids)
    }

    fn host_templates(&self, host_ids: &[HostId]) -> Result<Vec<TemplateLink>, SourceError> {
        (**self).host_templates(host_ids)
    }

    fn global_macros(&self) -> Result<Vec<MacroRow>, SourceError> {
        (**self).global_macros()
    }
}

// =============================================================================
// MEMORY SOURCE
// =============================================================================

/// In-memory snapshot of macro definitions and template links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySource {
    /// Host and template macro rows.
    #[serde(default)]
    pub host_macros: Vec<MacroRow>,
    /// Template link edges.
    #[serde(default)]
    pub templates: Vec<TemplateLink>,
    /// Global macro rows.
    #[serde(default)]
    pub global_macros: Vec<MacroRow>,
}

impl MemorySource {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from JSON.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_resolver::source::MemorySource;
    ///
    /// let source = MemorySource::from_json(r#"{
    ///     "host_macros": [{"host_id": 1, "macro": "{$A}", "value": "x"}],
    ///     "global_macros": [{"macro": "{$B}", "value": "y", "type": "secret"}]
    /// }"#).unwrap();
    /// assert_eq!(source.host_macros.len(), 1);
    /// assert!(source.global_macros[0].value_type.is_hidden());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a plain macro to a host or template.
    pub fn with_host_macro(self, host_id: HostId, key: &str, value: &str) -> Self {
        self.with_typed_host_macro(host_id, key, value, MacroValueType::Text)
    }

    /// Add a macro of the given storage type to a host or template.
    pub fn with_typed_host_macro(
        mut self,
        host_id: HostId,
        key: &str,
        value: &str,
        value_type: MacroValueType,
    ) -> Self {
        self.host_macros.push(MacroRow {
            host_id: Some(host_id),
            macro_key: key.to_string(),
            value: value.to_string(),
            value_type,
        });
        self
    }

    /// Link `template_id` to `host_id`.
    pub fn with_template(mut self, host_id: HostId, template_id: HostId) -> Self {
        self.templates.push(TemplateLink {
            host_id,
            template_id,
        });
        self
    }

    /// Add a plain global macro.
    pub fn with_global_macro(mut self, key: &str, value: &str) -> Self {
        self.global_macros.push(MacroRow {
            host_id: None,
            macro_key: key.to_string(),
            value: value.to_string(),
            value_type: MacroValueType::Text,
        });
        self
    }
}

impl MacroSource for MemorySource {
    fn host_macros(&self, host_ids: &[HostId]) -> Result<Vec<MacroRow>, SourceError> {
        Ok(self
            .host_macros
            .iter()
            .filter(|row| row.host_id.is_some_and(|id| host_ids.contains(&id)))
            .cloned()
            .collect())
    }

    fn host_templates(&self, host_ids: &[HostId]) -> Result<Vec<TemplateLink>, SourceError> {
        Ok(self
            .templates
            .iter()
            .filter(|link| host_ids.contains(&link.host_id))
            .copied()
            .collect())
    }

    fn global_macros(&self) -> Result<Vec<MacroRow>, SourceError> {
        Ok(self.global_macros.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
