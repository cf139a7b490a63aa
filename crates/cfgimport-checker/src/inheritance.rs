//! Inherited-member flattening.
//!
//! A class's comparable instance surface is everything it inherits from its
//! superclass chain and mixins plus what it declares itself. Members declared
//! later in that order override earlier ones with the same key.
//!
//! Inherited members are instantiated with the supertype's arguments, so a
//! type-parameter reference in the result always indexes the flattened
//! class's own parameters.

use cfgimport_common::limits::{MAX_INHERITANCE_CHAIN, is_private_name};
use cfgimport_model::{ClassDecl, DeclRef, Member, Program, Type};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::trace;

/// Public instance members of `class`, including inherited ones.
///
/// Order: superclass chain (root first), then mixins in declaration order,
/// then the class's own members. Supertypes that cannot be resolved through
/// `program` contribute nothing. Inheritance cycles terminate.
pub fn flatten_instance_members(program: &Program, class: &ClassDecl) -> IndexMap<String, Member> {
    let mut visited = FxHashSet::default();
    surface(program, class, &mut visited)
}

/// Flattened members of `class` in its own type-parameter frame.
fn surface(
    program: &Program,
    class: &ClassDecl,
    visited: &mut FxHashSet<DeclRef>,
) -> IndexMap<String, Member> {
    let mut out = IndexMap::new();
    if visited.len() >= MAX_INHERITANCE_CHAIN || !visited.insert(class.decl.clone()) {
        trace!(class = %class.decl, "inheritance walk stopped");
        return out;
    }
    let outer = u32::try_from(class.type_params.len()).unwrap_or(u32::MAX);

    if let Some((superclass, args)) = class
        .superclass
        .as_ref()
        .and_then(|ty| resolve(program, ty))
    {
        for (key, member) in surface(program, superclass, visited) {
            out.insert(key, member.substitute(&args, outer));
        }
    }

    // A mixin application adds the mixin's own members only.
    for (mixin, args) in class.mixins.iter().filter_map(|ty| resolve(program, ty)) {
        if visited.contains(&mixin.decl) {
            continue;
        }
        for (key, member) in own_members(mixin) {
            out.insert(key.clone(), member.substitute(&args, outer));
        }
    }

    for (key, member) in own_members(class) {
        out.insert(key.clone(), member.clone());
    }
    out
}

fn own_members(class: &ClassDecl) -> impl Iterator<Item = (&String, &Member)> {
    class
        .instance_members
        .iter()
        .filter(|(_, member)| !is_private_name(member.name()))
}

/// The class a supertype names, with the arguments it is instantiated with.
/// A raw reference to a generic class is instantiated to bounds, with
/// `dynamic` for unbounded parameters.
fn resolve<'p>(program: &'p Program, ty: &Type) -> Option<(&'p ClassDecl, Vec<Type>)> {
    let Type::Named { decl, args } = ty else {
        return None;
    };
    let Some(class) = program.class(decl) else {
        trace!(supertype = %decl, "unresolved supertype");
        return None;
    };
    let args = if args.len() == class.type_params.len() {
        args.clone()
    } else {
        class
            .type_params
            .iter()
            .map(|param| param.bound.clone().unwrap_or_else(Type::dynamic))
            .collect()
    };
    Some((&**class, args))
}
