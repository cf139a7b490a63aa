//! Member and class comparison.
//!
//! Findings for class members are reported at `Class.member` with the
//! member's own reason; class header clauses report `ClassMismatch`.

use crate::compare::Comparator;
use crate::diagnostics::{ClassClause, FailureReason, Finding, Modifier, Side};
use crate::inheritance::flatten_instance_members;
use cfgimport_common::limits::is_private_name;
use cfgimport_model::{
    ClassDecl, ConstructorDecl, GetterDecl, Member, MethodDecl, Modifiers, SetterDecl, Type,
    TypedefDecl,
};
use indexmap::IndexMap;

impl Comparator<'_> {
    /// Compare two members visible under the same key, appending findings.
    pub(crate) fn compare_members(
        &mut self,
        path: &str,
        a: &Member,
        b: &Member,
        out: &mut Vec<Finding>,
    ) {
        let result = match (a, b) {
            (Member::Typedef(x), Member::Typedef(y)) => self
                .compare_typedefs(x, y)
                .map_err(|cause| FailureReason::TypedefMismatch { cause: Box::new(cause) }),
            (Member::Class(x), Member::Class(y)) => {
                if self.phase.is_full() {
                    self.compare_classes(path, x, y, out);
                }
                Ok(())
            }
            (Member::Enum(x), Member::Enum(y)) => {
                if x.values == y.values {
                    Ok(())
                } else {
                    Err(FailureReason::EnumMismatch {
                        interface: x.values.clone(),
                        candidate: y.values.clone(),
                    })
                }
            }
            (Member::Constructor(x), Member::Constructor(y)) => self
                .compare_constructors(x, y)
                .map_err(|cause| FailureReason::ConstructorMismatch { cause: Box::new(cause) }),
            (Member::Method(x), Member::Method(y)) => self
                .compare_methods(x, y)
                .map_err(|cause| FailureReason::MethodMismatch { cause: Box::new(cause) }),
            (Member::Getter(x), Member::Getter(y)) => self
                .compare_getters(x, y)
                .map_err(|cause| FailureReason::GetterMismatch { cause: Box::new(cause) }),
            (Member::Setter(x), Member::Setter(y)) => self
                .compare_setters(x, y)
                .map_err(|cause| FailureReason::SetterMismatch { cause: Box::new(cause) }),
            _ => Err(FailureReason::KindMismatch {
                interface: a.kind(),
                candidate: b.kind(),
            }),
        };
        if let Err(reason) = result {
            self.report(out, path, reason);
        }
    }

    fn compare_typedefs(&mut self, a: &TypedefDecl, b: &TypedefDecl) -> Result<(), FailureReason> {
        self.check_type_params(&a.type_params, &b.type_params)?;
        self.check_types(&a.return_type, &b.return_type)?;
        self.check_params(&a.params, &b.params)
    }

    fn compare_constructors(
        &mut self,
        a: &ConstructorDecl,
        b: &ConstructorDecl,
    ) -> Result<(), FailureReason> {
        check_modifier(Modifier::Factory, a.is_factory(), b.is_factory())?;
        check_modifier(Modifier::Const, a.is_const(), b.is_const())?;
        self.check_params(&a.params, &b.params)
    }

    fn compare_methods(&mut self, a: &MethodDecl, b: &MethodDecl) -> Result<(), FailureReason> {
        self.check_abstract(a.modifiers, b.modifiers)?;
        self.check_type_params(&a.type_params, &b.type_params)?;
        self.check_types(&a.return_type, &b.return_type)?;
        self.check_params(&a.params, &b.params)
    }

    fn compare_getters(&mut self, a: &GetterDecl, b: &GetterDecl) -> Result<(), FailureReason> {
        self.check_abstract(a.modifiers, b.modifiers)?;
        self.check_types(&a.return_type, &b.return_type)
    }

    fn compare_setters(&mut self, a: &SetterDecl, b: &SetterDecl) -> Result<(), FailureReason> {
        self.check_abstract(a.modifiers, b.modifiers)?;
        self.check_types(&a.value_type, &b.value_type)
    }

    /// Abstractness only matters in a full check.
    fn check_abstract(&self, a: Modifiers, b: Modifiers) -> Result<(), FailureReason> {
        if !self.phase.is_full() {
            return Ok(());
        }
        check_modifier(
            Modifier::Abstract,
            a.contains(Modifiers::ABSTRACT),
            b.contains(Modifiers::ABSTRACT),
        )
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    fn compare_classes(
        &mut self,
        path: &str,
        a: &ClassDecl,
        b: &ClassDecl,
        out: &mut Vec<Finding>,
    ) {
        let mut clause = |cmp: &mut Self, clause: ClassClause, result: Result<(), FailureReason>| {
            if let Err(cause) = result {
                cmp.report(
                    out,
                    path,
                    FailureReason::ClassMismatch {
                        clause,
                        cause: Box::new(cause),
                    },
                );
            }
        };

        let abstract_flags = check_modifier(Modifier::Abstract, a.is_abstract(), b.is_abstract());
        clause(self, ClassClause::Modifiers, abstract_flags);

        let type_params = self.check_type_params(&a.type_params, &b.type_params);
        clause(self, ClassClause::TypeParameters, type_params);

        let superclass = self.compare_superclasses(a, b);
        clause(self, ClassClause::Superclass, superclass);

        let (mixins_a, mixins_b) = (self.supertypes(&a.mixins), self.supertypes(&b.mixins));
        let mixins = self.compare_type_lists(&mixins_a, &mixins_b);
        clause(self, ClassClause::Mixins, mixins);

        let (interfaces_a, interfaces_b) =
            (self.supertypes(&a.interfaces), self.supertypes(&b.interfaces));
        let interfaces = self.compare_type_sets(&interfaces_a, &interfaces_b);
        clause(self, ClassClause::Interfaces, interfaces);

        let constructors_a = public_constructors(a);
        let constructors_b = public_constructors(b);
        self.compare_member_maps(path, &constructors_a, &constructors_b, out);

        let instance_a = flatten_instance_members(self.program, a);
        let instance_b = flatten_instance_members(self.program, b);
        self.compare_member_maps(path, &instance_a, &instance_b, out);

        let static_a = public_members(&a.static_members);
        let static_b = public_members(&b.static_members);
        self.compare_member_maps(path, &static_a, &static_b, out);
    }

    fn compare_superclasses(&mut self, a: &ClassDecl, b: &ClassDecl) -> Result<(), FailureReason> {
        let sa = a.superclass.as_ref().filter(|ty| self.compares_supertype(ty));
        let sb = b.superclass.as_ref().filter(|ty| self.compares_supertype(ty));
        match (sa, sb) {
            (None, None) => Ok(()),
            (Some(ta), Some(tb)) => self.check_types(ta, tb),
            (ta, tb) => Err(FailureReason::type_incompatible(
                render_optional(ta),
                render_optional(tb),
            )),
        }
    }

    /// Supertypes taking part in header comparison.
    fn supertypes<'t>(&self, types: &'t [Type]) -> Vec<&'t Type> {
        types
            .iter()
            .filter(|ty| self.compares_supertype(ty))
            .collect()
    }

    fn compares_supertype(&self, ty: &Type) -> bool {
        !(self.options.exclude_private_supertypes
            && ty.decl().is_some_and(|decl| decl.is_private()))
    }

    /// Pairwise, in declared order.
    fn compare_type_lists(&mut self, a: &[&Type], b: &[&Type]) -> Result<(), FailureReason> {
        if a.len() != b.len() {
            return Err(FailureReason::type_incompatible(render_list(a), render_list(b)));
        }
        for (ta, tb) in a.iter().zip(b) {
            self.check_types(ta, tb)?;
        }
        Ok(())
    }

    /// Order-independent: every type on each side has a compatible partner.
    fn compare_type_sets(&mut self, a: &[&Type], b: &[&Type]) -> Result<(), FailureReason> {
        let covered = |cmp: &mut Self, from: &[&Type], to: &[&Type], flipped: bool| {
            from.iter().all(|x| {
                to.iter().any(|y| {
                    if flipped {
                        cmp.check_types(y, x).is_ok()
                    } else {
                        cmp.check_types(x, y).is_ok()
                    }
                })
            })
        };
        if a.len() == b.len() && covered(self, a, b, false) && covered(self, b, a, true) {
            Ok(())
        } else {
            Err(FailureReason::type_incompatible(render_list(a), render_list(b)))
        }
    }

    /// Compare two member maps of class `class`, reporting at `class.key`.
    fn compare_member_maps(
        &mut self,
        class: &str,
        a: &IndexMap<String, Member>,
        b: &IndexMap<String, Member>,
        out: &mut Vec<Finding>,
    ) {
        for (key, ma) in a {
            let path = member_path(class, key);
            match b.get(key) {
                Some(mb) => self.compare_members(&path, ma, mb, out),
                None => self.report(
                    out,
                    &path,
                    FailureReason::MissingMember {
                        missing_from: Side::Candidate,
                        kind: ma.kind(),
                    },
                ),
            }
        }
        for (key, mb) in b.iter().filter(|(key, _)| !a.contains_key(*key)) {
            self.report(
                out,
                &member_path(class, key),
                FailureReason::MissingMember {
                    missing_from: Side::Interface,
                    kind: mb.kind(),
                },
            );
        }
    }
}

fn check_modifier(modifier: Modifier, a: bool, b: bool) -> Result<(), FailureReason> {
    if a == b {
        Ok(())
    } else {
        Err(FailureReason::ModifierMismatch {
            modifier,
            interface: a,
            candidate: b,
        })
    }
}

fn public_constructors(class: &ClassDecl) -> IndexMap<String, Member> {
    class
        .constructors
        .iter()
        .filter(|(name, _)| !is_private_name(name))
        .map(|(name, ctor)| (name.clone(), Member::Constructor(ctor.clone())))
        .collect()
}

fn public_members(members: &IndexMap<String, Member>) -> IndexMap<String, Member> {
    members
        .iter()
        .filter(|(_, member)| !is_private_name(member.name()))
        .map(|(key, member)| (key.clone(), member.clone()))
        .collect()
}

/// `C` for the unnamed constructor, `C.name` otherwise.
fn member_path(class: &str, key: &str) -> String {
    if key.is_empty() {
        class.to_string()
    } else {
        format!("{class}.{key}")
    }
}

fn render_optional(ty: Option<&Type>) -> String {
    ty.map_or_else(|| "none".to_string(), ToString::to_string)
}

fn render_list(types: &[&Type]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
