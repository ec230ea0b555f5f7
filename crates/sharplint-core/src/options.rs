//! Per-rule option schemas and the per-(file, rule) binding cache.
//!
//! Every rule describes its typed configuration as a [`RuleOptions`] impl:
//! `Default` supplies the fallback snapshot and `bind` converts raw string
//! key/value pairs into the typed shape. Binding is total: any malformed
//! value degrades silently to that one field's default.
//!
//! Keys follow the `<ruleId>.<option_name>` convention, e.g.
//! `MNA0004.min_length`. Lookup tries the literal key first and the
//! lowercased key second, tolerating upstream case normalization.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::model::{Compilation, FileId, MethodDef, SourceFile};

/// Per-file string-keyed configuration lookup, supplied by the host.
pub trait OptionsProvider: Send + Sync {
    fn raw_option(&self, file: &str, key: &str) -> Option<String>;
}

/// Map-backed provider applying the same values to every file.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    values: HashMap<String, String>,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl OptionsProvider for MapOptions {
    fn raw_option(&self, _file: &str, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

/// Raw lookup scoped to one (file, rule) pair.
pub struct OptionLookup<'a> {
    provider: &'a dyn OptionsProvider,
    file: &'a str,
    rule_id: &'a str,
}

impl<'a> OptionLookup<'a> {
    pub fn new(provider: &'a dyn OptionsProvider, file: &'a str, rule_id: &'a str) -> Self {
        Self {
            provider,
            file,
            rule_id,
        }
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        let key = format!("{}.{}", self.rule_id, name);
        self.provider
            .raw_option(self.file, &key)
            .or_else(|| self.provider.raw_option(self.file, &key.to_lowercase()))
    }

    /// Parsed integer clamped into `range`; absent or unparsable values
    /// fall back to `default` before clamping.
    pub fn integer(&self, name: &str, default: i64, range: RangeInclusive<i64>) -> i64 {
        let value = match self.raw(name) {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    debug!(rule = self.rule_id, option = name, value = %raw, "unparsable integer option");
                    default
                }
            },
            None => default,
        };
        value.clamp(*range.start(), *range.end())
    }

    /// Case-insensitive `true`/`1` and `false`/`0`; anything else is the
    /// default.
    pub fn boolean(&self, name: &str, default: bool) -> bool {
        match self.raw(name) {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    debug!(rule = self.rule_id, option = name, value = %raw, "unparsable boolean option");
                    default
                }
            },
            None => default,
        }
    }

    /// Trimmed free-text value.
    pub fn string(&self, name: &str, default: &str) -> String {
        match self.raw(name) {
            Some(raw) => raw.trim().to_string(),
            None => default.to_string(),
        }
    }

    /// Name set split on commas or semicolons. An absent key yields
    /// `default`; a present key replaces it wholesale.
    pub fn name_set(
        &self,
        name: &str,
        default: &[&str],
        case: CaseSensitivity,
    ) -> HashSet<String> {
        match self.raw(name) {
            Some(raw) => parse_name_set(&raw, case),
            None => default
                .iter()
                .map(|entry| match case {
                    CaseSensitivity::Sensitive => entry.to_string(),
                    CaseSensitivity::Insensitive => entry.to_lowercase(),
                })
                .collect(),
        }
    }
}

/// Splits on `,` or `;`, trims whitespace and surrounding quotes, drops
/// empty segments, and deduplicates.
pub fn parse_name_set(raw: &str, case: CaseSensitivity) -> HashSet<String> {
    raw.split([',', ';'])
        .map(|segment| segment.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|segment| !segment.is_empty())
        .map(|segment| match case {
            CaseSensitivity::Sensitive => segment.to_string(),
            CaseSensitivity::Insensitive => segment.to_lowercase(),
        })
        .collect()
}

/// Typed, immutable configuration snapshot for one rule.
pub trait RuleOptions: Default + Send + Sync + 'static {
    const RULE_ID: &'static str;

    /// Total conversion from raw lookup to snapshot; never fails.
    fn bind(lookup: &OptionLookup<'_>) -> Self;
}

type CacheKey = (FileId, &'static str);

/// Memoizes bound snapshots per (file, rule) for one session.
///
/// The binding pass runs inside the map entry, so even under concurrent
/// first access each key is computed at most once. The cache is dropped
/// with the session; there is no eviction.
#[derive(Default)]
pub struct OptionsCache {
    entries: Mutex<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
}

impl OptionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_file<O: RuleOptions>(
        &self,
        file: &SourceFile,
        provider: &dyn OptionsProvider,
    ) -> Arc<O> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries
            .entry((file.id, O::RULE_ID))
            .or_insert_with(|| {
                debug!(rule = O::RULE_ID, file = %file.path, "binding rule options");
                let lookup = OptionLookup::new(provider, &file.path, O::RULE_ID);
                Arc::new(O::bind(&lookup)) as Arc<dyn Any + Send + Sync>
            })
            .clone();
        drop(entries);

        // The key carries the rule id, so the stored snapshot is of type O;
        // fail open to defaults rather than panicking if it ever is not.
        entry
            .downcast::<O>()
            .unwrap_or_else(|_| Arc::new(O::default()))
    }

    /// Options at a symbol's declaration site; symbols without a source
    /// location get the rule's defaults.
    pub fn for_declaration_site<O: RuleOptions>(
        &self,
        method: &MethodDef,
        compilation: &Compilation,
        provider: &dyn OptionsProvider,
    ) -> Arc<O> {
        match method.file {
            Some(file) => self.for_file(compilation.file(file), provider),
            None => Arc::new(O::default()),
        }
    }
}
