//! Member declarations.
//!
//! A [`Member`] is one entry of a library, a namespace or a class member map.
//! Type-level members (typedef, class, enum) carry the [`DeclRef`] under which
//! other signatures refer to them.

use crate::types::{DeclRef, ParamList, Type, TypeParam};
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Declaration modifiers relevant to compatibility.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const ABSTRACT = 1 << 0;
        const CONST = 1 << 1;
        /// Factory constructor (absent means generative).
        const FACTORY = 1 << 2;
        const STATIC = 1 << 3;
    }
}

/// Key under which a setter is stored in a member map.
///
/// Setters live next to the getter of the same name, so `x=` is distinct
/// from `x`.
pub fn setter_key(name: &str) -> String {
    format!("{name}=")
}

// =============================================================================
// MemberKind
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Typedef,
    Class,
    Enum,
    Constructor,
    Method,
    Getter,
    Setter,
}

impl MemberKind {
    /// Typedefs, classes and enums.
    pub const fn is_type_declaration(self) -> bool {
        matches!(self, Self::Typedef | Self::Class | Self::Enum)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typedef => "typedef",
            Self::Class => "class",
            Self::Enum => "enum",
            Self::Constructor => "constructor",
            Self::Method => "method",
            Self::Getter => "getter",
            Self::Setter => "setter",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct TypedefDecl {
    pub decl: DeclRef,
    pub type_params: Vec<TypeParam>,
    pub return_type: Type,
    pub params: ParamList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub decl: DeclRef,
    pub values: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorDecl {
    /// Empty for the unnamed constructor.
    pub name: String,
    pub modifiers: Modifiers,
    pub params: ParamList,
}

impl ConstructorDecl {
    pub fn is_factory(&self) -> bool {
        self.modifiers.contains(Modifiers::FACTORY)
    }

    pub fn is_const(&self) -> bool {
        self.modifiers.contains(Modifiers::CONST)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub return_type: Type,
    pub params: ParamList,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GetterDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub return_type: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetterDecl {
    /// Base name, without the trailing `=`.
    pub name: String,
    pub modifiers: Modifiers,
    pub value_type: Type,
}

/// A class declaration.
///
/// Member maps only hold members declared directly in this class; inherited
/// members are reached through `superclass` and `mixins`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub decl: DeclRef,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<Type>,
    pub mixins: Vec<Type>,
    pub interfaces: Vec<Type>,
    pub constructors: IndexMap<String, ConstructorDecl>,
    pub instance_members: IndexMap<String, Member>,
    pub static_members: IndexMap<String, Member>,
}

impl ClassDecl {
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }
}

// =============================================================================
// Member
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    Typedef(Arc<TypedefDecl>),
    Class(Arc<ClassDecl>),
    Enum(Arc<EnumDecl>),
    Constructor(ConstructorDecl),
    Method(MethodDecl),
    Getter(GetterDecl),
    Setter(SetterDecl),
}

impl Member {
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Typedef(_) => MemberKind::Typedef,
            Self::Class(_) => MemberKind::Class,
            Self::Enum(_) => MemberKind::Enum,
            Self::Constructor(_) => MemberKind::Constructor,
            Self::Method(_) => MemberKind::Method,
            Self::Getter(_) => MemberKind::Getter,
            Self::Setter(_) => MemberKind::Setter,
        }
    }

    /// Source name of the member (setters without `=`).
    pub fn name(&self) -> &str {
        match self {
            Self::Typedef(t) => &t.decl.name,
            Self::Class(c) => &c.decl.name,
            Self::Enum(e) => &e.decl.name,
            Self::Constructor(c) => &c.name,
            Self::Method(m) => &m.name,
            Self::Getter(g) => &g.name,
            Self::Setter(s) => &s.name,
        }
    }

    /// Key under which the member is stored in a member map.
    pub fn key(&self) -> String {
        match self {
            Self::Setter(s) => setter_key(&s.name),
            other => other.name().to_string(),
        }
    }

    /// Declaration identity, for type-level members.
    pub fn decl(&self) -> Option<&DeclRef> {
        match self {
            Self::Typedef(t) => Some(&t.decl),
            Self::Class(c) => Some(&c.decl),
            Self::Enum(e) => Some(&e.decl),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Class(c) => c.modifiers,
            Self::Constructor(c) => c.modifiers,
            Self::Method(m) => m.modifiers,
            Self::Getter(g) => g.modifiers,
            Self::Setter(s) => s.modifiers,
            Self::Typedef(_) | Self::Enum(_) => Modifiers::empty(),
        }
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(Modifiers::ABSTRACT)
    }

    pub fn as_class(&self) -> Option<&Arc<ClassDecl>> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Instantiate an inherited class member for a subclass. See
    /// [`Type::substitute`]. Type-level members are returned unchanged.
    pub fn substitute(&self, args: &[Type], outer: u32) -> Member {
        match self {
            Self::Constructor(c) => Self::Constructor(ConstructorDecl {
                params: c.params.substitute(args, outer),
                ..c.clone()
            }),
            Self::Method(m) => Self::Method(MethodDecl {
                name: m.name.clone(),
                modifiers: m.modifiers,
                type_params: m
                    .type_params
                    .iter()
                    .map(|p| p.substitute(args, outer))
                    .collect(),
                return_type: m.return_type.substitute(args, outer),
                params: m.params.substitute(args, outer),
            }),
            Self::Getter(g) => Self::Getter(GetterDecl {
                return_type: g.return_type.substitute(args, outer),
                ..g.clone()
            }),
            Self::Setter(s) => Self::Setter(SetterDecl {
                value_type: s.value_type.substitute(args, outer),
                ..s.clone()
            }),
            Self::Typedef(_) | Self::Class(_) | Self::Enum(_) => self.clone(),
        }
    }
}
