//! Visible namespaces.
//!
//! A [`Namespace`] maps each public name of a library to exactly one
//! [`Member`]. It is built from the library's own public declarations plus
//! everything it re-exports, with `show`/`hide` combinators applied per
//! export. Names starting with `_` never appear.

use crate::library::Combinator;
use crate::members::Member;
use crate::program::Program;
use crate::types::DeclRef;
use cfgimport_common::limits::{MAX_REEXPORT_DEPTH, is_private_name};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// One visible name: the member and the library that declares it.
#[derive(Clone, Debug, PartialEq)]
struct Entry {
    member: Member,
    origin: Arc<str>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Namespace {
    uri: Arc<str>,
    entries: IndexMap<String, Entry>,
    /// Reverse index: type-level declaration -> visible name.
    visible: FxHashMap<DeclRef, String>,
}

/// Errors raised while building a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    UnknownLibrary {
        uri: Arc<str>,
    },
    /// Two different declarations are exported under one name.
    Conflict {
        name: String,
        first: Arc<str>,
        second: Arc<str>,
    },
    ReexportTooDeep {
        uri: Arc<str>,
    },
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLibrary { uri } => write!(f, "library '{uri}' is not loaded"),
            Self::Conflict {
                name,
                first,
                second,
            } => write!(
                f,
                "'{name}' is exported from both '{first}' and '{second}'"
            ),
            Self::ReexportTooDeep { uri } => write!(
                f,
                "re-export chain through '{uri}' exceeds {MAX_REEXPORT_DEPTH} libraries"
            ),
        }
    }
}

impl std::error::Error for NamespaceError {}

impl Namespace {
    /// Build the export namespace of the library at `uri`.
    pub fn export_namespace(program: &Program, uri: &str) -> Result<Self, NamespaceError> {
        let mut visiting = FxHashSet::default();
        let entries = collect_exports(program, uri, 0, &mut visiting)?;
        let uri = program
            .library(uri)
            .map(|lib| lib.uri.clone())
            .unwrap_or_else(|| Arc::from(uri));
        let namespace = Self::from_entries(uri, entries);
        debug!(uri = %namespace.uri, names = namespace.len(), "built export namespace");
        Ok(namespace)
    }

    /// Build a namespace directly from members declared in `uri`.
    ///
    /// Private names are dropped. Later members replace earlier ones with the
    /// same key.
    pub fn from_members(
        uri: impl Into<Arc<str>>,
        members: impl IntoIterator<Item = Member>,
    ) -> Self {
        let uri = uri.into();
        let entries = members
            .into_iter()
            .filter(|member| !is_private_name(member.name()))
            .map(|member| {
                (
                    member.key(),
                    Entry {
                        member,
                        origin: uri.clone(),
                    },
                )
            })
            .collect();
        Self::from_entries(uri, entries)
    }

    fn from_entries(uri: Arc<str>, entries: IndexMap<String, Entry>) -> Self {
        let visible = entries
            .iter()
            .filter_map(|(key, entry)| Some((entry.member.decl()?.clone(), key.clone())))
            .collect();
        Self {
            uri,
            entries,
            visible,
        }
    }

    /// Apply import-side `show`/`hide` combinators.
    pub fn filtered(&self, combinators: &[Combinator]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| combinators.iter().all(|c| c.admits(key)))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        Self::from_entries(self.uri.clone(), entries)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn get(&self, key: &str) -> Option<&Member> {
        self.entries.get(key).map(|entry| &entry.member)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Library that declares the member visible under `key`.
    pub fn origin_of(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| &*entry.origin)
    }

    /// Keys in namespace order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.as_str(), &entry.member))
    }

    /// Name under which `decl` is visible, if it is.
    pub fn name_of(&self, decl: &DeclRef) -> Option<&str> {
        self.visible.get(decl).map(String::as_str)
    }

    /// Whether any visible member is a typedef, class or enum.
    pub fn has_type_declarations(&self) -> bool {
        self.entries
            .values()
            .any(|entry| entry.member.kind().is_type_declaration())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_exports(
    program: &Program,
    uri: &str,
    depth: u32,
    visiting: &mut FxHashSet<Arc<str>>,
) -> Result<IndexMap<String, Entry>, NamespaceError> {
    let library = program
        .library(uri)
        .ok_or_else(|| NamespaceError::UnknownLibrary { uri: Arc::from(uri) })?;
    if depth > MAX_REEXPORT_DEPTH {
        return Err(NamespaceError::ReexportTooDeep {
            uri: library.uri.clone(),
        });
    }
    visiting.insert(library.uri.clone());

    let mut entries: IndexMap<String, Entry> = library
        .members
        .iter()
        .filter(|(_, member)| !is_private_name(member.name()))
        .map(|(key, member)| {
            (
                key.clone(),
                Entry {
                    member: member.clone(),
                    origin: library.uri.clone(),
                },
            )
        })
        .collect();

    for export in &library.exports {
        if visiting.contains(&export.uri) {
            trace!(from = %library.uri, to = %export.uri, "skipping cyclic re-export");
            continue;
        }
        let exported = collect_exports(program, &export.uri, depth + 1, visiting)?;
        for (key, entry) in exported {
            if !export.combinators.iter().all(|c| c.admits(&key)) {
                continue;
            }
            match entries.get(&key) {
                Some(existing) if existing.origin == entry.origin => {}
                Some(existing) => {
                    return Err(NamespaceError::Conflict {
                        name: key,
                        first: existing.origin.clone(),
                        second: entry.origin,
                    });
                }
                None => {
                    entries.insert(key, entry);
                }
            }
        }
    }

    visiting.remove(&library.uri);
    Ok(entries)
}

#[cfg(test)]
#[path = "../tests/namespace_tests.rs"]
mod tests;
