//! Environment & Configuration Resolver
//!
//! Picks which URI a configurable import or export binds to. A directive
//! names a default URI and an ordered list of `(test, uri)` configurations;
//! the first configuration whose test holds in the [`Environment`] wins.
//!
//! Resolution is pure: it never fails and performs no I/O. An absent
//! environment key simply makes its test false.

pub mod directive;
pub mod environment;
mod resolve;

pub use directive::{Configuration, ConfiguredDirective, DirectiveKind, DottedName, Test};
pub use environment::{Environment, EnvironmentBuilder, InvalidDefine, library_key};
pub use resolve::{resolve, resolve_all};

#[cfg(test)]
#[path = "../tests/environment_tests.rs"]
mod environment_tests;
#[cfg(test)]
#[path = "../tests/resolve_tests.rs"]
mod resolve_tests;
