//! Declaration Model
//!
//! In-memory representation of a library's declarations and of its visible
//! namespace, shared by the resolver and the compatibility checker.
//!
//! - **Types** (`Type`, `ParamList`, `TypeParam`): signatures that reference
//!   declarations through non-owning [`DeclRef`]s, so cyclic class graphs are
//!   representable without ownership cycles.
//! - **Members** (`Member`): typedefs, classes, enums, constructors, methods,
//!   getters and setters. Variables are normalized into getter/setter pairs
//!   by the builders.
//! - **Libraries** (`Library`, `LibraryBuilder`) and the **Program** store
//!   that resolves a `DeclRef` to its declaring member.
//! - **Namespaces** (`Namespace`): the public, `show`/`hide`-filtered view of
//!   a library including re-exports.

mod format;
pub mod library;
pub mod members;
pub mod namespace;
pub mod program;
pub mod types;

pub use library::{ClassBuilder, Combinator, Export, Library, LibraryBuilder};
pub use members::{
    ClassDecl, ConstructorDecl, EnumDecl, GetterDecl, Member, MemberKind, MethodDecl, Modifiers,
    SetterDecl, TypedefDecl, setter_key,
};
pub use namespace::{Namespace, NamespaceError};
pub use program::Program;
pub use types::{
    CORE_LIBRARY, ConstValue, DeclRef, FunctionType, NamedParam, ParamList, ParamRef, Type,
    TypeParam,
};

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
// library_tests: loaded from library.rs
// namespace_tests: loaded from namespace.rs
