//! The JSON manifest: libraries, configured directives and the default
//! environment.
//!
//! ```json
//! {
//!   "hostLibraries": ["dart:io"],
//!   "defines": { "app.flavor": "prod" },
//!   "libraries": [
//!     {
//!       "uri": "stub.dart",
//!       "declarations": [
//!         { "kind": "function", "name": "parse", "returns": "int",
//!           "params": { "required": ["String"],
//!                       "named": [{ "name": "radix", "type": "int", "default": 10 }] } },
//!         { "kind": "variable", "name": "verbose", "type": "bool" }
//!       ]
//!     }
//!   ],
//!   "directives": [
//!     { "uri": "stub.dart",
//!       "configurations": [{ "when": "dart.library.io", "uri": "io.dart" }] }
//!   ]
//! }
//! ```
//!
//! Type names resolve, in order, to an enclosing type parameter, a class,
//! enum or typedef of the same library, or the core library (`coreLibrary`,
//! `dart:core` by default). `lib::Name` names a declaration explicitly.
//! A JSON `null` default means "no default"; a null constant is written
//! `{ "ref": "null" }`.

use anyhow::{Context, Result, bail};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::path::Path;

use cfgimport_model::{
    CORE_LIBRARY, ClassBuilder, Combinator, ConstValue, ConstructorDecl, DeclRef, GetterDecl, Library,
    LibraryBuilder, Member, MethodDecl, Modifiers, ParamList, Program, SetterDecl, Type,
    TypeParam,
};
use cfgimport_resolver::{ConfiguredDirective, DirectiveKind, Environment};

fn default_core_library() -> String {
    CORE_LIBRARY.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default = "default_core_library")]
    pub core_library: String,
    /// Built-in libraries as `namespace:name`, e.g. `dart:io`.
    #[serde(default)]
    pub host_libraries: Vec<String>,
    #[serde(default)]
    pub defines: FxHashMap<String, String>,
    #[serde(default)]
    pub libraries: Vec<LibrarySpec>,
    #[serde(default)]
    pub directives: Vec<DirectiveSpec>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            core_library: default_core_library(),
            host_libraries: Vec::new(),
            defines: FxHashMap::default(),
            libraries: Vec::new(),
            directives: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySpec {
    pub uri: String,
    #[serde(default)]
    pub exports: Vec<ExportSpec>,
    #[serde(default)]
    pub declarations: Vec<DeclSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSpec {
    pub uri: String,
    /// Applied in order: `[{ "show": ["a", "b"] }, { "hide": ["b"] }]`.
    #[serde(default)]
    pub combinators: Vec<CombinatorSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinatorSpec {
    Show(Vec<String>),
    Hide(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum DeclSpec {
    Function {
        name: String,
        #[serde(default)]
        type_params: Vec<TypeParamSpec>,
        #[serde(default)]
        returns: TypeSpec,
        #[serde(default)]
        params: ParamsSpec,
    },
    Getter {
        name: String,
        #[serde(rename = "type")]
        ty: TypeSpec,
    },
    Setter {
        name: String,
        #[serde(rename = "type")]
        ty: TypeSpec,
    },
    /// Expands into a getter, plus a setter unless final.
    Variable {
        name: String,
        #[serde(rename = "type")]
        ty: TypeSpec,
        #[serde(default, rename = "final")]
        is_final: bool,
    },
    Typedef {
        name: String,
        #[serde(default)]
        type_params: Vec<TypeParamSpec>,
        #[serde(default)]
        returns: TypeSpec,
        #[serde(default)]
        params: ParamsSpec,
    },
    Enum {
        name: String,
        values: Vec<String>,
    },
    Class(ClassSpec),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    pub name: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub type_params: Vec<TypeParamSpec>,
    #[serde(default)]
    pub extends: Option<TypeSpec>,
    #[serde(default, rename = "with")]
    pub mixins: Vec<TypeSpec>,
    #[serde(default)]
    pub implements: Vec<TypeSpec>,
    #[serde(default)]
    pub constructors: Vec<ConstructorSpec>,
    #[serde(default)]
    pub members: Vec<ClassMemberSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorSpec {
    /// Empty for the unnamed constructor.
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "const")]
    pub is_const: bool,
    #[serde(default)]
    pub factory: bool,
    #[serde(default)]
    pub params: ParamsSpec,
}

#[derive(Debug, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClassMemberSpec {
    Method {
        name: String,
        #[serde(default, rename = "static")]
        is_static: bool,
        #[serde(default, rename = "abstract")]
        is_abstract: bool,
        #[serde(default)]
        type_params: Vec<TypeParamSpec>,
        #[serde(default)]
        returns: TypeSpec,
        #[serde(default)]
        params: ParamsSpec,
    },
    Getter {
        name: String,
        #[serde(default, rename = "static")]
        is_static: bool,
        #[serde(default, rename = "abstract")]
        is_abstract: bool,
        #[serde(rename = "type")]
        ty: TypeSpec,
    },
    Setter {
        name: String,
        #[serde(default, rename = "static")]
        is_static: bool,
        #[serde(default, rename = "abstract")]
        is_abstract: bool,
        #[serde(rename = "type")]
        ty: TypeSpec,
    },
    Field {
        name: String,
        #[serde(default, rename = "static")]
        is_static: bool,
        #[serde(default, rename = "final")]
        is_final: bool,
        #[serde(rename = "type")]
        ty: TypeSpec,
    },
}

/// `"int"`, `{ "name": "List", "args": ["int"] }` or
/// `{ "returns": "void", "params": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Simple(String),
    Generic {
        name: String,
        args: Vec<TypeSpec>,
    },
    Function {
        returns: Box<TypeSpec>,
        #[serde(default)]
        params: ParamsSpec,
    },
}

impl Default for TypeSpec {
    fn default() -> Self {
        Self::Simple("void".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamsSpec {
    #[serde(default)]
    pub required: Vec<TypeSpec>,
    #[serde(default)]
    pub optional: Vec<TypeSpec>,
    #[serde(default)]
    pub named: Vec<NamedParamSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub default: Option<ConstSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConstSpec {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl ConstSpec {
    fn lower(&self) -> ConstValue {
        match self {
            Self::Bool(b) => ConstValue::Bool(*b),
            Self::Int(i) => ConstValue::Int(*i),
            Self::Double(d) => ConstValue::Double(*d),
            Self::String(s) => ConstValue::String(s.clone()),
            Self::Reference { reference } if reference == "null" => ConstValue::Null,
            Self::Reference { reference } => ConstValue::Reference(reference.clone()),
        }
    }
}

/// `"T"` or `{ "name": "T", "bound": "num" }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeParamSpec {
    Name(String),
    Bounded { name: String, bound: TypeSpec },
}

impl TypeParamSpec {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Bounded { name, .. } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveSpec {
    #[serde(default)]
    pub kind: DirectiveKind,
    pub uri: String,
    #[serde(default)]
    pub configurations: Vec<ConfigurationSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSpec {
    /// Dotted environment key, e.g. `dart.library.io`.
    pub when: String,
    /// Expected value; absent means `"true"`.
    #[serde(default)]
    pub equals: Option<String>,
    pub uri: String,
}

// =============================================================================
// Loading
// =============================================================================

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    parse_manifest(&source).with_context(|| format!("failed to parse manifest {}", path.display()))
}

pub fn parse_manifest(source: &str) -> Result<Manifest> {
    let manifest = serde_json::from_str(source).context("invalid manifest JSON")?;
    Ok(manifest)
}

/// Split `dart:io` into `("dart", "io")`.
pub fn parse_host_library(text: &str) -> Result<(&str, &str)> {
    match text.split_once(':') {
        Some((namespace, name)) if !namespace.trim().is_empty() && !name.trim().is_empty() => {
            Ok((namespace.trim(), name.trim()))
        }
        _ => bail!("invalid host library '{text}': expected namespace:name"),
    }
}

impl Manifest {
    /// Build the environment: manifest host libraries and `extra_hosts`,
    /// then manifest defines, then `defines` (`key=value`), which win.
    pub fn environment(&self, extra_hosts: &[String], defines: &[String]) -> Result<Environment> {
        let mut builder = Environment::builder();
        for host in self.host_libraries.iter().chain(extra_hosts) {
            let (namespace, name) = parse_host_library(host)?;
            builder = builder.host_library(namespace, name);
        }
        for (key, value) in &self.defines {
            builder = builder.define(key, value.clone());
        }
        for define in defines {
            builder = builder.parse_define(define)?;
        }
        Ok(builder.build())
    }

    pub fn directives(&self) -> Vec<ConfiguredDirective> {
        self.directives
            .iter()
            .map(|spec| {
                spec.configurations.iter().fold(
                    ConfiguredDirective::new(spec.kind, spec.uri.clone()),
                    |directive, config| {
                        directive.when(&config.when, config.equals.as_deref(), config.uri.clone())
                    },
                )
            })
            .collect()
    }

    /// Lower every library into a [`Program`].
    pub fn program(&self) -> Result<Program> {
        let mut type_names: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
        for library in &self.libraries {
            let names = library
                .declarations
                .iter()
                .filter_map(|decl| match decl {
                    DeclSpec::Typedef { name, .. } | DeclSpec::Enum { name, .. } => {
                        Some(name.as_str())
                    }
                    DeclSpec::Class(class) => Some(class.name.as_str()),
                    _ => None,
                })
                .collect();
            if type_names.insert(library.uri.as_str(), names).is_some() {
                bail!("library '{}' is declared more than once", library.uri);
            }
        }

        let mut program = Program::new();
        for library in &self.libraries {
            let scope = TypeScope {
                library: &library.uri,
                core: &self.core_library,
                local_types: &type_names[library.uri.as_str()],
                params: Vec::new(),
            };
            program.add(
                lower_library(library, &scope)
                    .with_context(|| format!("in library '{}'", library.uri))?,
            );
        }
        Ok(program)
    }
}

// =============================================================================
// Lowering
// =============================================================================

/// Name resolution context for type expressions.
#[derive(Clone)]
struct TypeScope<'a> {
    library: &'a str,
    core: &'a str,
    local_types: &'a FxHashSet<&'a str>,
    /// Enclosing type parameters, outermost first.
    params: Vec<String>,
}

impl TypeScope<'_> {
    fn with_params(&self, params: &[TypeParamSpec]) -> Self {
        let mut scope = self.clone();
        scope
            .params
            .extend(params.iter().map(|p| p.name().to_string()));
        scope
    }

    fn param_index(&self, name: &str) -> Option<u32> {
        self.params
            .iter()
            .rposition(|p| p == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    fn decl(&self, name: &str) -> DeclRef {
        if let Some((library, name)) = name.rsplit_once("::") {
            return DeclRef::new(library, name);
        }
        if self.local_types.contains(name) {
            return DeclRef::new(self.library, name);
        }
        DeclRef::new(self.core, name)
    }

    fn ty(&self, spec: &TypeSpec) -> Result<Type> {
        match spec {
            TypeSpec::Simple(name) if name == "void" => Ok(Type::Void),
            TypeSpec::Simple(name) => Ok(match self.param_index(name) {
                Some(index) => Type::param(index, name.as_str()),
                None => Type::Named {
                    decl: self.decl(name),
                    args: Vec::new(),
                },
            }),
            TypeSpec::Generic { name, args } => {
                if self.param_index(name).is_some() {
                    bail!("type parameter '{name}' cannot take type arguments");
                }
                let args = args.iter().map(|arg| self.ty(arg)).collect::<Result<_>>()?;
                Ok(Type::generic(self.decl(name), args))
            }
            TypeSpec::Function { returns, params } => {
                Ok(Type::function(self.ty(returns)?, self.params(params)?))
            }
        }
    }

    fn params(&self, spec: &ParamsSpec) -> Result<ParamList> {
        let mut params = ParamList::new();
        for ty in &spec.required {
            params = params.required(self.ty(ty)?);
        }
        for ty in &spec.optional {
            params = params.optional(self.ty(ty)?);
        }
        for named in &spec.named {
            params = params.named(
                named.name.clone(),
                self.ty(&named.ty)?,
                named.default.as_ref().map(ConstSpec::lower),
            );
        }
        Ok(params)
    }

    /// Lower a type-parameter list. `self` must already have the list's
    /// names in scope, since bounds may refer to them.
    fn type_params(&self, specs: &[TypeParamSpec]) -> Result<Vec<TypeParam>> {
        specs
            .iter()
            .map(|spec| match spec {
                TypeParamSpec::Name(name) => Ok(TypeParam::new(name.clone())),
                TypeParamSpec::Bounded { name, bound } => {
                    Ok(TypeParam::bounded(name.clone(), self.ty(bound)?))
                }
            })
            .collect()
    }
}

fn modifiers(is_static: bool, is_abstract: bool) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::STATIC, is_static);
    modifiers.set(Modifiers::ABSTRACT, is_abstract);
    modifiers
}

fn lower_library(spec: &LibrarySpec, scope: &TypeScope<'_>) -> Result<Library> {
    let mut builder = LibraryBuilder::new(spec.uri.as_str());
    for decl in &spec.declarations {
        builder = match decl {
            DeclSpec::Function {
                name,
                type_params,
                returns,
                params,
            } => {
                let inner = scope.with_params(type_params);
                builder.generic_function(
                    name.clone(),
                    inner.type_params(type_params)?,
                    inner.ty(returns)?,
                    inner.params(params)?,
                )
            }
            DeclSpec::Getter { name, ty } => builder.getter(name.clone(), scope.ty(ty)?),
            DeclSpec::Setter { name, ty } => builder.setter(name.clone(), scope.ty(ty)?),
            DeclSpec::Variable { name, ty, is_final } => {
                builder.variable(name.clone(), scope.ty(ty)?, *is_final)
            }
            DeclSpec::Typedef {
                name,
                type_params,
                returns,
                params,
            } => {
                let inner = scope.with_params(type_params);
                builder.typedef(
                    name,
                    inner.type_params(type_params)?,
                    inner.ty(returns)?,
                    inner.params(params)?,
                )
            }
            DeclSpec::Enum { name, values } => builder.enumeration(name, values.iter().cloned()),
            DeclSpec::Class(class) => builder.class(
                lower_class(class, scope).with_context(|| format!("in class '{}'", class.name))?,
            ),
        };
    }
    for export in &spec.exports {
        let combinators = export
            .combinators
            .iter()
            .map(|c| match c {
                CombinatorSpec::Show(names) => Combinator::Show(names.clone()),
                CombinatorSpec::Hide(names) => Combinator::Hide(names.clone()),
            })
            .collect();
        builder = builder.export(export.uri.as_str(), combinators);
    }
    Ok(builder.build())
}

fn lower_class(spec: &ClassSpec, scope: &TypeScope<'_>) -> Result<ClassBuilder> {
    let scope = scope.with_params(&spec.type_params);
    let mut class = ClassBuilder::new(spec.name.clone());
    if spec.is_abstract {
        class = class.set_abstract();
    }
    for param in scope.type_params(&spec.type_params)? {
        class = class.type_param(param);
    }
    if let Some(superclass) = &spec.extends {
        class = class.extends(scope.ty(superclass)?);
    }
    for mixin in &spec.mixins {
        class = class.with_mixin(scope.ty(mixin)?);
    }
    for interface in &spec.implements {
        class = class.implements(scope.ty(interface)?);
    }

    for ctor in &spec.constructors {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::CONST, ctor.is_const);
        modifiers.set(Modifiers::FACTORY, ctor.factory);
        class = class.constructor_decl(ConstructorDecl {
            name: ctor.name.clone(),
            modifiers,
            params: scope.params(&ctor.params)?,
        });
    }

    for member in &spec.members {
        class = match member {
            ClassMemberSpec::Method {
                name,
                is_static,
                is_abstract,
                type_params,
                returns,
                params,
            } => {
                let inner = scope.with_params(type_params);
                class.member(Member::Method(MethodDecl {
                    name: name.clone(),
                    modifiers: modifiers(*is_static, *is_abstract),
                    type_params: inner.type_params(type_params)?,
                    return_type: inner.ty(returns)?,
                    params: inner.params(params)?,
                }))
            }
            ClassMemberSpec::Getter {
                name,
                is_static,
                is_abstract,
                ty,
            } => class.member(Member::Getter(GetterDecl {
                name: name.clone(),
                modifiers: modifiers(*is_static, *is_abstract),
                return_type: scope.ty(ty)?,
            })),
            ClassMemberSpec::Setter {
                name,
                is_static,
                is_abstract,
                ty,
            } => class.member(Member::Setter(SetterDecl {
                name: name.clone(),
                modifiers: modifiers(*is_static, *is_abstract),
                value_type: scope.ty(ty)?,
            })),
            ClassMemberSpec::Field {
                name,
                is_static,
                is_final,
                ty,
            } => class.field_with(
                name.clone(),
                scope.ty(ty)?,
                *is_final,
                modifiers(*is_static, false),
            ),
        };
    }
    Ok(class)
}
