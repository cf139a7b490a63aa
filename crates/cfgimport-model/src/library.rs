//! Libraries and their builders.
//!
//! The builders are the only way the front-end assembles declarations, which
//! is where variables are normalized: a variable becomes a getter and, unless
//! it is final, a setter. No variable member kind exists past this point.

use crate::members::{
    ClassDecl, ConstructorDecl, EnumDecl, GetterDecl, Member, MethodDecl, Modifiers, SetterDecl,
    TypedefDecl,
};
use crate::types::{DeclRef, ParamList, Type, TypeParam};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

/// A `show` or `hide` combinator on an export or import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Combinator {
    Show(Vec<String>),
    Hide(Vec<String>),
}

impl Combinator {
    /// Whether a member with source name `name` survives this combinator.
    ///
    /// A setter is matched by its base name, so `show x` keeps both `x` and `x=`.
    pub fn admits(&self, name: &str) -> bool {
        let base = name.strip_suffix('=').unwrap_or(name);
        match self {
            Self::Show(names) => names.iter().any(|n| n == base),
            Self::Hide(names) => !names.iter().any(|n| n == base),
        }
    }
}

/// A re-export directive: `export 'uri' show a, b;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub uri: Arc<str>,
    pub combinators: Vec<Combinator>,
}

/// A library: its own top-level declarations and its re-exports.
#[derive(Clone, Debug, PartialEq)]
pub struct Library {
    pub uri: Arc<str>,
    pub members: IndexMap<String, Member>,
    pub exports: Vec<Export>,
}

impl Library {
    /// Look up a top-level member by map key (setters use `name=`).
    pub fn member(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }
}

// =============================================================================
// LibraryBuilder
// =============================================================================

#[derive(Debug)]
pub struct LibraryBuilder {
    uri: Arc<str>,
    members: IndexMap<String, Member>,
    exports: Vec<Export>,
}

impl LibraryBuilder {
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self {
            uri: uri.into(),
            members: IndexMap::new(),
            exports: Vec::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Reference to a type-level declaration of this library.
    pub fn decl_ref(&self, name: &str) -> DeclRef {
        DeclRef::new(self.uri.clone(), name)
    }

    /// Add an already-built member. Later members replace earlier ones with
    /// the same key.
    pub fn member(mut self, member: Member) -> Self {
        let key = member.key();
        trace!(library = %self.uri, key = %key, kind = %member.kind(), "add member");
        self.members.insert(key, member);
        self
    }

    pub fn function(self, name: impl Into<String>, return_type: Type, params: ParamList) -> Self {
        self.generic_function(name, Vec::new(), return_type, params)
    }

    pub fn generic_function(
        self,
        name: impl Into<String>,
        type_params: Vec<TypeParam>,
        return_type: Type,
        params: ParamList,
    ) -> Self {
        self.member(Member::Method(MethodDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            type_params,
            return_type,
            params,
        }))
    }

    pub fn getter(self, name: impl Into<String>, return_type: Type) -> Self {
        self.member(Member::Getter(GetterDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            return_type,
        }))
    }

    pub fn setter(self, name: impl Into<String>, value_type: Type) -> Self {
        self.member(Member::Setter(SetterDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            value_type,
        }))
    }

    /// A top-level variable: a getter, plus a setter unless `is_final`.
    pub fn variable(mut self, name: impl Into<String>, ty: Type, is_final: bool) -> Self {
        for member in variable_accessors(name.into(), ty, is_final, Modifiers::empty()) {
            self = self.member(member);
        }
        self
    }

    pub fn typedef(
        self,
        name: &str,
        type_params: Vec<TypeParam>,
        return_type: Type,
        params: ParamList,
    ) -> Self {
        let decl = self.decl_ref(name);
        self.member(Member::Typedef(Arc::new(TypedefDecl {
            decl,
            type_params,
            return_type,
            params,
        })))
    }

    pub fn enumeration<S: Into<String>>(
        self,
        name: &str,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let decl = self.decl_ref(name);
        self.member(Member::Enum(Arc::new(EnumDecl {
            decl,
            values: values.into_iter().map(Into::into).collect(),
        })))
    }

    pub fn class(self, class: ClassBuilder) -> Self {
        let decl = class.build(&self.uri);
        self.member(Member::Class(Arc::new(decl)))
    }

    pub fn export(mut self, uri: impl Into<Arc<str>>, combinators: Vec<Combinator>) -> Self {
        self.exports.push(Export {
            uri: uri.into(),
            combinators,
        });
        self
    }

    pub fn build(self) -> Library {
        Library {
            uri: self.uri,
            members: self.members,
            exports: self.exports,
        }
    }
}

/// Expand a variable into its accessor members.
pub(crate) fn variable_accessors(
    name: String,
    ty: Type,
    is_final: bool,
    modifiers: Modifiers,
) -> Vec<Member> {
    let getter = Member::Getter(GetterDecl {
        name: name.clone(),
        modifiers,
        return_type: ty.clone(),
    });
    if is_final {
        return vec![getter];
    }
    vec![
        getter,
        Member::Setter(SetterDecl {
            name,
            modifiers,
            value_type: ty,
        }),
    ]
}

// =============================================================================
// ClassBuilder
// =============================================================================

/// Builder for a [`ClassDecl`]. The owning library is supplied when the class
/// is added to a [`LibraryBuilder`].
#[derive(Debug, Default)]
pub struct ClassBuilder {
    name: String,
    modifiers: Modifiers,
    type_params: Vec<TypeParam>,
    superclass: Option<Type>,
    mixins: Vec<Type>,
    interfaces: Vec<Type>,
    constructors: IndexMap<String, ConstructorDecl>,
    instance_members: IndexMap<String, Member>,
    static_members: IndexMap<String, Member>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn set_abstract(mut self) -> Self {
        self.modifiers |= Modifiers::ABSTRACT;
        self
    }

    pub fn type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn extends(mut self, superclass: Type) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_mixin(mut self, mixin: Type) -> Self {
        self.mixins.push(mixin);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn constructor_decl(mut self, ctor: ConstructorDecl) -> Self {
        self.constructors.insert(ctor.name.clone(), ctor);
        self
    }

    /// A generative constructor. Use `""` for the unnamed one.
    pub fn constructor(self, name: impl Into<String>, params: ParamList) -> Self {
        self.constructor_decl(ConstructorDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            params,
        })
    }

    pub fn const_constructor(self, name: impl Into<String>, params: ParamList) -> Self {
        self.constructor_decl(ConstructorDecl {
            name: name.into(),
            modifiers: Modifiers::CONST,
            params,
        })
    }

    pub fn factory(self, name: impl Into<String>, params: ParamList) -> Self {
        self.constructor_decl(ConstructorDecl {
            name: name.into(),
            modifiers: Modifiers::FACTORY,
            params,
        })
    }

    /// Add an instance member, or a static one when it carries
    /// [`Modifiers::STATIC`].
    pub fn member(mut self, member: Member) -> Self {
        let key = member.key();
        if member.modifiers().contains(Modifiers::STATIC) {
            self.static_members.insert(key, member);
        } else {
            self.instance_members.insert(key, member);
        }
        self
    }

    pub fn method(self, name: impl Into<String>, return_type: Type, params: ParamList) -> Self {
        self.member(Member::Method(MethodDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            return_type,
            params,
        }))
    }

    pub fn abstract_method(
        self,
        name: impl Into<String>,
        return_type: Type,
        params: ParamList,
    ) -> Self {
        self.member(Member::Method(MethodDecl {
            name: name.into(),
            modifiers: Modifiers::ABSTRACT,
            type_params: Vec::new(),
            return_type,
            params,
        }))
    }

    pub fn static_method(
        self,
        name: impl Into<String>,
        return_type: Type,
        params: ParamList,
    ) -> Self {
        self.member(Member::Method(MethodDecl {
            name: name.into(),
            modifiers: Modifiers::STATIC,
            type_params: Vec::new(),
            return_type,
            params,
        }))
    }

    pub fn getter(self, name: impl Into<String>, return_type: Type) -> Self {
        self.member(Member::Getter(GetterDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            return_type,
        }))
    }

    pub fn abstract_getter(self, name: impl Into<String>, return_type: Type) -> Self {
        self.member(Member::Getter(GetterDecl {
            name: name.into(),
            modifiers: Modifiers::ABSTRACT,
            return_type,
        }))
    }

    pub fn setter(self, name: impl Into<String>, value_type: Type) -> Self {
        self.member(Member::Setter(SetterDecl {
            name: name.into(),
            modifiers: Modifiers::empty(),
            value_type,
        }))
    }

    /// An instance field: a getter, plus a setter unless `is_final`.
    pub fn field(self, name: impl Into<String>, ty: Type, is_final: bool) -> Self {
        self.field_with(name, ty, is_final, Modifiers::empty())
    }

    pub fn static_field(self, name: impl Into<String>, ty: Type, is_final: bool) -> Self {
        self.field_with(name, ty, is_final, Modifiers::STATIC)
    }

    pub fn field_with(
        mut self,
        name: impl Into<String>,
        ty: Type,
        is_final: bool,
        modifiers: Modifiers,
    ) -> Self {
        for member in variable_accessors(name.into(), ty, is_final, modifiers) {
            self = self.member(member);
        }
        self
    }

    pub(crate) fn build(self, library: &Arc<str>) -> ClassDecl {
        ClassDecl {
            decl: DeclRef::new(library.clone(), self.name),
            modifiers: self.modifiers,
            type_params: self.type_params,
            superclass: self.superclass,
            mixins: self.mixins,
            interfaces: self.interfaces,
            constructors: self.constructors,
            instance_members: self.instance_members,
            static_members: self.static_members,
        }
    }
}

#[cfg(test)]
#[path = "../tests/library_tests.rs"]
mod tests;
