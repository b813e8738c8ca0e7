//! Batch extraction of macro tokens across many strings.

use super::{Bucket, Scanner};
use crate::token::MacroToken;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct macros found in a batch of strings, bucketed by grammar.
///
/// Macro maps are keyed by the exact token text and keep the first decoded
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMacros {
    /// User macros, wrapped ones included.
    pub usermacros: BTreeMap<String, MacroToken>,
    /// Built-in macros per group.
    pub macros: BTreeMap<String, BTreeMap<String, MacroToken>>,
    /// Indexed built-in macros per group.
    pub macros_n: BTreeMap<String, BTreeMap<String, MacroToken>>,
    /// `$N` references.
    pub references: BTreeSet<String>,
    /// LLD macros, wrapped ones included.
    pub lldmacros: BTreeMap<String, MacroToken>,
    /// Function ids, without braces.
    pub functionids: BTreeSet<String>,
}

impl ExtractedMacros {
    /// True when no string contained any token.
    pub fn is_empty(&self) -> bool {
        self.usermacros.is_empty()
            && self.macros.is_empty()
            && self.macros_n.is_empty()
            && self.references.is_empty()
            && self.lldmacros.is_empty()
            && self.functionids.is_empty()
    }

    fn add(&mut self, bucket: &Bucket, token: MacroToken) {
        match bucket {
            Bucket::UserMacros => {
                self.usermacros.entry(token.raw.clone()).or_insert(token);
            }
            Bucket::Macros(group) => {
                self.macros
                    .entry(group.clone())
                    .or_default()
                    .entry(token.raw.clone())
                    .or_insert(token);
            }
            Bucket::MacrosN(group) => {
                self.macros_n
                    .entry(group.clone())
                    .or_default()
                    .entry(token.raw.clone())
                    .or_insert(token);
            }
            Bucket::References => {
                self.references.insert(token.raw);
            }
            Bucket::LldMacros => {
                self.lldmacros.entry(token.raw.clone()).or_insert(token);
            }
            Bucket::FunctionIds => {
                self.functionids.insert(token.name);
            }
        }
    }
}

impl Scanner {
    /// Extract the distinct tokens of all `texts`.
    ///
    /// Strings are scanned in parallel; results are merged in input order so
    /// "first occurrence" is deterministic.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use macro_parser::scanner::{Grammars, Scanner};
    ///
    /// let scanner = Scanner::new(&Grammars::new().user_macros().function_ids());
    /// let found = scanner.extract(&["{$A}>{12}", "{$A}<{$B:x}"]);
    /// assert_eq!(found.usermacros.len(), 2);
    /// assert!(found.functionids.contains("12"));
    /// ```
    pub fn extract<S>(&self, texts: &[S]) -> ExtractedMacros
    where
        S: AsRef<str> + Sync,
    {
        let scanned: Vec<_> = texts
            .par_iter()
            .map(|text| self.scan_tagged(text.as_ref()))
            .collect();

        let mut extracted = ExtractedMacros::default();
        for (slot, token) in scanned.into_iter().flatten() {
            extracted.add(self.bucket(slot), token);
        }

        tracing::debug!(
            texts = texts.len(),
            usermacros = extracted.usermacros.len(),
            functionids = extracted.functionids.len(),
            "extracted macros"
        );
        extracted
    }
}
