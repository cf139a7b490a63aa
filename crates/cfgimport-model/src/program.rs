//! Program-wide declaration store.
//!
//! The `Program` owns every loaded [`Library`] and is the single place a
//! [`DeclRef`] is turned back into the member that declares it. Lookups are
//! by qualified name, so references between classes never form ownership
//! edges even when the class graph is cyclic.

use crate::library::Library;
use crate::members::{ClassDecl, Member};
use crate::namespace::{Namespace, NamespaceError};
use crate::types::DeclRef;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct Program {
    libraries: IndexMap<Arc<str>, Library>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a library, replacing any previous library with the same URI.
    pub fn add(&mut self, library: Library) {
        debug!(uri = %library.uri, members = library.members.len(), "register library");
        self.libraries.insert(library.uri.clone(), library);
    }

    /// Builder-style [`add`](Self::add).
    pub fn with_library(mut self, library: Library) -> Self {
        self.add(library);
        self
    }

    pub fn library(&self, uri: &str) -> Option<&Library> {
        self.libraries.get(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.libraries.contains_key(uri)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Resolve a declaration reference to its declaring member.
    ///
    /// Returns `None` for unknown libraries, unknown names, and names that
    /// resolve to something other than a type-level declaration.
    pub fn lookup(&self, decl: &DeclRef) -> Option<&Member> {
        let member = self.library(&decl.library)?.member(&decl.name)?;
        (member.decl() == Some(decl)).then_some(member)
    }

    /// Resolve a declaration reference that must name a class.
    pub fn class(&self, decl: &DeclRef) -> Option<&Arc<ClassDecl>> {
        self.lookup(decl)?.as_class()
    }

    /// Public export namespace of the library at `uri`.
    pub fn namespace(&self, uri: &str) -> Result<Namespace, NamespaceError> {
        Namespace::export_namespace(self, uri)
    }
}
