//! Type representation for declaration signatures.
//!
//! Types never own the declarations they mention. A [`Type::Named`] holds a
//! [`DeclRef`], a `(library, name)` pair that is resolved through
//! [`Program::lookup`](crate::Program::lookup) or a
//! [`Namespace`](crate::Namespace) when needed. This keeps self- and
//! mutually-referential class graphs acyclic in memory.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Library that declares the built-in types.
pub const CORE_LIBRARY: &str = "dart:core";

// =============================================================================
// DeclRef - Qualified Declaration Reference
// =============================================================================

/// Qualified, non-owning reference to a type-level declaration.
///
/// Two references are the same declaration iff library URI and name match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclRef {
    pub library: Arc<str>,
    pub name: Arc<str>,
}

impl DeclRef {
    pub fn new(library: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
        }
    }

    /// Returns `true` when the referenced declaration is library-private.
    pub fn is_private(&self) -> bool {
        cfgimport_common::limits::is_private_name(&self.name)
    }
}

// =============================================================================
// Type
// =============================================================================

/// A type as it appears in a signature.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// `void`
    Void,
    /// A reference to a class, enum or typedef, with type arguments.
    Named { decl: DeclRef, args: Vec<Type> },
    /// A function type: return type plus parameter list.
    Function(Box<FunctionType>),
    /// A type parameter of an enclosing declaration.
    Parameter(ParamRef),
}

impl Type {
    /// Shorthand for a non-generic named type.
    pub fn named(library: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self::Named {
            decl: DeclRef::new(library, name),
            args: Vec::new(),
        }
    }

    /// Shorthand for a generic named type.
    pub fn generic(decl: DeclRef, args: Vec<Type>) -> Self {
        Self::Named { decl, args }
    }

    pub fn function(return_type: Type, params: ParamList) -> Self {
        Self::Function(Box::new(FunctionType {
            return_type,
            params,
        }))
    }

    /// Reference to the enclosing type parameter at `index`.
    pub fn param(index: u32, name: impl Into<Arc<str>>) -> Self {
        Self::Parameter(ParamRef {
            index,
            name: name.into(),
        })
    }

    /// `dynamic`, which a raw generic supertype is instantiated with.
    pub fn dynamic() -> Self {
        Self::named(CORE_LIBRARY, "dynamic")
    }

    /// Rewrite a type from a generic declaration's frame into a user's frame.
    ///
    /// `args` instantiate the declaration's own type parameters. References
    /// past them belong to a generic member nested in the declaration; they
    /// are renumbered to follow the user's `outer` type parameters.
    pub fn substitute(&self, args: &[Type], outer: u32) -> Type {
        match self {
            Self::Void => Self::Void,
            Self::Named { decl, args: inner } => Self::Named {
                decl: decl.clone(),
                args: inner.iter().map(|arg| arg.substitute(args, outer)).collect(),
            },
            Self::Function(func) => Self::function(
                func.return_type.substitute(args, outer),
                func.params.substitute(args, outer),
            ),
            Self::Parameter(param) => {
                let index = usize::try_from(param.index).unwrap_or(usize::MAX);
                match args.get(index) {
                    Some(arg) => arg.clone(),
                    None => {
                        let consumed = u32::try_from(args.len()).unwrap_or(u32::MAX);
                        let index = param.index.saturating_sub(consumed).saturating_add(outer);
                        Self::param(index, param.name.clone())
                    }
                }
            }
        }
    }

    /// The referenced declaration, for named types.
    pub fn decl(&self) -> Option<&DeclRef> {
        match self {
            Self::Named { decl, .. } => Some(decl),
            _ => None,
        }
    }

    /// Short variant name used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Named { .. } => "named type",
            Self::Function(_) => "function type",
            Self::Parameter(_) => "type parameter",
        }
    }
}

/// Positional reference to a type parameter. Indices count from the
/// outermost declaration: class parameters first, then the parameters of a
/// generic method or typedef.
///
/// The name is only used for rendering. Two references are equal when their
/// positions are.
#[derive(Clone, Debug)]
pub struct ParamRef {
    pub index: u32,
    pub name: Arc<str>,
}

impl PartialEq for ParamRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ParamRef {}

/// Return type plus parameter list of a function type.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub return_type: Type,
    pub params: ParamList,
}

// =============================================================================
// Parameters
// =============================================================================

/// A full parameter list.
///
/// A list never mixes optional-positional and named parameters in source,
/// but the model does not rely on that.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    pub required: Vec<Type>,
    pub optional: Vec<Type>,
    pub named: IndexMap<String, NamedParam>,
}

impl ParamList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, ty: Type) -> Self {
        self.required.push(ty);
        self
    }

    pub fn optional(mut self, ty: Type) -> Self {
        self.optional.push(ty);
        self
    }

    pub fn named(mut self, name: impl Into<String>, ty: Type, default: Option<ConstValue>) -> Self {
        self.named.insert(name.into(), NamedParam { ty, default });
        self
    }

    pub fn len(&self) -> usize {
        self.required.len() + self.optional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`Type::substitute`] over every parameter type.
    pub fn substitute(&self, args: &[Type], outer: u32) -> ParamList {
        ParamList {
            required: self.required.iter().map(|ty| ty.substitute(args, outer)).collect(),
            optional: self.optional.iter().map(|ty| ty.substitute(args, outer)).collect(),
            named: self
                .named
                .iter()
                .map(|(name, param)| {
                    let param = NamedParam {
                        ty: param.ty.substitute(args, outer),
                        default: param.default.clone(),
                    };
                    (name.clone(), param)
                })
                .collect(),
        }
    }
}

/// A named parameter: its type and default value, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedParam {
    pub ty: Type,
    pub default: Option<ConstValue>,
}

/// A compile-time constant used as a parameter default.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ConstValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// A reference to a constant declaration such as `Color.red`.
    Reference(String),
}

impl ConstValue {
    /// Constant identity: doubles compare bit-for-bit, so `NaN` equals
    /// itself and `0.0` differs from `-0.0`.
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Reference(a), Self::Reference(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other)
    }
}

// =============================================================================
// Type Parameters
// =============================================================================

/// A type parameter with its optional upper bound.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub bound: Option<Type>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound: None,
        }
    }

    pub fn bounded(name: impl Into<String>, bound: Type) -> Self {
        Self {
            name: name.into(),
            bound: Some(bound),
        }
    }

    pub fn substitute(&self, args: &[Type], outer: u32) -> TypeParam {
        TypeParam {
            name: self.name.clone(),
            bound: self.bound.as_ref().map(|bound| bound.substitute(args, outer)),
        }
    }
}
