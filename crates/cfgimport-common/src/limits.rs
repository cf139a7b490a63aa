//! Centralized limits and thresholds.
//!
//! The comparator's depth bound is derived per check from the namespaces it
//! compares; the values here bound the graph walks done while building the
//! declaration model and flattening inheritance.

/// Maximum depth of a re-export chain followed while building a namespace.
///
/// Re-export cycles are cut by a visited set; this bound only stops absurdly
/// long acyclic chains.
pub const MAX_REEXPORT_DEPTH: u32 = 64;

/// Maximum number of classes visited while flattening inherited members.
///
/// Superclass and mixin chains are normally a handful of classes deep. Cyclic
/// hierarchies are cut by a visited set before this limit matters.
pub const MAX_INHERITANCE_CHAIN: usize = 256;

/// Prefix marking a library-private name.
pub const PRIVATE_PREFIX: char = '_';

/// Returns `true` when `name` is library-private.
#[inline]
pub fn is_private_name(name: &str) -> bool {
    name.starts_with(PRIVATE_PREFIX)
}
