//! The resolution environment.
//!
//! An [`Environment`] is assembled once per build or run from two sources:
//! host entries (one `<namespace>.library.<name> = "true"` per available
//! built-in library) and user-supplied defines. User values win on key
//! collision. The environment is read-only after construction.

use crate::directive::DottedName;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Key announcing an available built-in library: `<namespace>.library.<name>`.
pub fn library_key(namespace: &str, name: &str) -> String {
    DottedName::parse(&format!("{namespace}.library.{name}")).to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    values: FxHashMap<String, String>,
}

impl Environment {
    /// An environment with no keys; every test is false.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// Build from user-level pairs. Keys are normalized.
    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        pairs
            .into_iter()
            .fold(Self::builder(), |b, (k, v)| b.define(k.as_ref(), v))
            .build()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn lookup(&self, name: &DottedName) -> Option<&str> {
        self.get(&name.to_string())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by key.
    pub fn sorted_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

/// Error for a malformed `-D key=value` define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDefine {
    pub input: String,
}

impl fmt::Display for InvalidDefine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid define '{}': expected key or key=value", self.input)
    }
}

impl std::error::Error for InvalidDefine {}

/// Collects host and user entries; user entries take precedence.
#[derive(Clone, Debug, Default)]
pub struct EnvironmentBuilder {
    host: FxHashMap<String, String>,
    user: FxHashMap<String, String>,
}

impl EnvironmentBuilder {
    /// Announce an available built-in library.
    pub fn host_library(mut self, namespace: &str, name: &str) -> Self {
        self.host
            .insert(library_key(namespace, name), "true".to_string());
        self
    }

    /// Set a host-provided key.
    pub fn host(mut self, key: &str, value: impl Into<String>) -> Self {
        self.host
            .insert(DottedName::parse(key).to_string(), value.into());
        self
    }

    /// Set a user-supplied key. Overrides any host value for the same key.
    pub fn define(mut self, key: &str, value: impl Into<String>) -> Self {
        self.user
            .insert(DottedName::parse(key).to_string(), value.into());
        self
    }

    /// Parse and apply a `key=value` (or bare `key`, meaning `true`) define.
    pub fn parse_define(self, input: &str) -> Result<Self, InvalidDefine> {
        let (key, value) = match input.split_once('=') {
            Some((key, value)) => (key, value),
            None => (input, "true"),
        };
        if DottedName::parse(key).is_empty() {
            return Err(InvalidDefine {
                input: input.to_string(),
            });
        }
        Ok(self.define(key, value))
    }

    pub fn build(self) -> Environment {
        let mut values = self.host;
        let host_count = values.len();
        values.extend(self.user);
        debug!(host = host_count, total = values.len(), "environment built");
        Environment { values }
    }
}
