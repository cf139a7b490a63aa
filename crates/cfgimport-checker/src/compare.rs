//! Structural equivalence of types, parameter lists and type-parameter
//! lists.
//!
//! All rules return `Result<(), FailureReason>`; the first failing clause
//! wins. Named types whose declarations differ are equivalent when both are
//! visible under the same name in their libraries and those two declarations
//! are themselves compatible, which re-enters member comparison.
//!
//! ## Cycle safety
//!
//! Declaration pairs in progress live in a [`RecursionGuard`]. Re-entering an
//! in-progress pair assumes it compatible and records the guard depth of the
//! assumption. A finished pair is cached when it failed, or when it passed
//! without relying on an assumption older than itself. A pass that relied on
//! an older assumption is kept provisionally until that assumption is
//! discharged, then promoted or dropped. Each pair is therefore compared at
//! most once per check unless an enclosing assumption is refuted.
//!
//! Only same-name pairs are ever entered, so the guard's depth bound is the
//! number of names the two namespaces share and is never reached. Hitting it
//! anyway defers the pair: it is assumed compatible and nothing that relied
//! on it is cached.

use crate::diagnostics::{
    CheckStats, FailureReason, Finding, ParameterMismatch, Side, TypeParameterMismatch,
};
use crate::policy::{CheckOptions, Phase};
use crate::recursion::{RecursionGuard, RecursionResult};
use cfgimport_model::{DeclRef, Namespace, ParamList, Program, Type, TypeParam};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::trace;

pub(crate) type DeclPair = (DeclRef, DeclRef);

/// Outcome of comparing one declaration pair under the guard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PairVisit {
    Cached(bool),
    /// Re-entered while in progress, provisionally proven, or deferred.
    Assumed,
    Compared(bool),
}

impl PairVisit {
    pub(crate) fn is_compatible(self) -> bool {
        match self {
            Self::Cached(ok) | Self::Compared(ok) => ok,
            Self::Assumed => true,
        }
    }
}

/// Per-check comparison state. Never shared between checks.
pub(crate) struct Comparator<'a> {
    pub(crate) program: &'a Program,
    pub(crate) interface: &'a Namespace,
    pub(crate) candidate: &'a Namespace,
    pub(crate) phase: Phase,
    pub(crate) options: CheckOptions,
    guard: RecursionGuard<DeclPair>,
    results: FxHashMap<DeclPair, bool>,
    /// Passed pairs that rely on an in-progress assumption, with the guard
    /// depth of the oldest such assumption.
    provisional: IndexMap<DeclPair, u32>,
    /// Oldest assumption relied on by the pair currently being compared.
    assumption: Option<u32>,
    pub(crate) stats: CheckStats,
}

impl<'a> Comparator<'a> {
    pub(crate) fn new(
        program: &'a Program,
        interface: &'a Namespace,
        candidate: &'a Namespace,
        phase: Phase,
        options: CheckOptions,
    ) -> Self {
        let shared = interface.names().filter(|name| candidate.contains(name)).count();
        let max_depth = u32::try_from(shared).unwrap_or(u32::MAX).saturating_add(1);
        Self {
            program,
            interface,
            candidate,
            phase,
            options,
            guard: RecursionGuard::new(max_depth),
            results: FxHashMap::default(),
            provisional: IndexMap::new(),
            assumption: None,
            stats: CheckStats::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    pub(crate) fn check_types(&mut self, a: &Type, b: &Type) -> Result<(), FailureReason> {
        match (a, b) {
            (Type::Void, Type::Void) => Ok(()),
            (
                Type::Named {
                    decl: decl_a,
                    args: args_a,
                },
                Type::Named {
                    decl: decl_b,
                    args: args_b,
                },
            ) => {
                if args_a.len() != args_b.len() {
                    return Err(FailureReason::type_incompatible(a, b));
                }
                for (arg_a, arg_b) in args_a.iter().zip(args_b) {
                    if self.check_types(arg_a, arg_b).is_err() {
                        return Err(FailureReason::type_incompatible(a, b));
                    }
                }
                if decl_a == decl_b || self.same_visible_declaration(decl_a, decl_b) {
                    Ok(())
                } else {
                    Err(FailureReason::type_incompatible(a, b))
                }
            }
            (Type::Function(fa), Type::Function(fb)) => {
                self.check_types(&fa.return_type, &fb.return_type)?;
                self.check_params(&fa.params, &fb.params)
            }
            (Type::Parameter(i), Type::Parameter(j)) if i == j => Ok(()),
            _ => Err(FailureReason::type_incompatible(a, b)),
        }
    }

    /// The same-name branch of the named-type rule.
    fn same_visible_declaration(&mut self, a: &DeclRef, b: &DeclRef) -> bool {
        if !self.phase.is_full() {
            return false;
        }
        let (interface, candidate) = (self.interface, self.candidate);
        let (Some(name_a), Some(name_b)) = (interface.name_of(a), candidate.name_of(b)) else {
            return false;
        };
        if name_a != name_b {
            return false;
        }
        let (Some(member_a), Some(member_b)) = (interface.get(name_a), candidate.get(name_b)) else {
            return false;
        };
        let pair = (a.clone(), b.clone());
        self.visit_pair(pair, |cmp| {
            let mut scratch = Vec::new();
            cmp.compare_members(name_a, member_a, member_b, &mut scratch);
            scratch.is_empty()
        })
        .is_compatible()
    }

    // -------------------------------------------------------------------------
    // Parameter lists
    // -------------------------------------------------------------------------

    pub(crate) fn check_params(
        &mut self,
        a: &ParamList,
        b: &ParamList,
    ) -> Result<(), FailureReason> {
        self.param_mismatch(a, b)
            .map_or(Ok(()), |detail| Err(FailureReason::ParameterListIncompatible { detail }))
    }

    fn param_mismatch(&mut self, a: &ParamList, b: &ParamList) -> Option<ParameterMismatch> {
        if a.required.len() != b.required.len() {
            return Some(ParameterMismatch::RequiredCount {
                interface: a.required.len(),
                candidate: b.required.len(),
            });
        }
        for (index, (ta, tb)) in a.required.iter().zip(&b.required).enumerate() {
            if let Err(cause) = self.check_types(ta, tb) {
                return Some(ParameterMismatch::Required {
                    index,
                    cause: Box::new(cause),
                });
            }
        }

        if a.optional.len() != b.optional.len() {
            return Some(ParameterMismatch::OptionalCount {
                interface: a.optional.len(),
                candidate: b.optional.len(),
            });
        }
        for (index, (ta, tb)) in a.optional.iter().zip(&b.optional).enumerate() {
            if let Err(cause) = self.check_types(ta, tb) {
                return Some(ParameterMismatch::Optional {
                    index,
                    cause: Box::new(cause),
                });
            }
        }

        if let Some(name) = a.named.keys().find(|name| !b.named.contains_key(*name)) {
            return Some(ParameterMismatch::NamedMissing {
                name: name.clone(),
                missing_from: Side::Candidate,
            });
        }
        if let Some(name) = b.named.keys().find(|name| !a.named.contains_key(*name)) {
            return Some(ParameterMismatch::NamedMissing {
                name: name.clone(),
                missing_from: Side::Interface,
            });
        }
        for (name, pa) in &a.named {
            let Some(pb) = b.named.get(name) else {
                continue;
            };
            if let Err(cause) = self.check_types(&pa.ty, &pb.ty) {
                return Some(ParameterMismatch::Named {
                    name: name.clone(),
                    cause: Box::new(cause),
                });
            }
            let same_default = match (&pa.default, &pb.default) {
                (None, None) => true,
                (Some(da), Some(db)) => da.is_identical(db),
                _ => false,
            };
            if !same_default {
                return Some(ParameterMismatch::NamedDefault {
                    name: name.clone(),
                    interface: pa.default.as_ref().map(ToString::to_string),
                    candidate: pb.default.as_ref().map(ToString::to_string),
                });
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Type-parameter lists
    // -------------------------------------------------------------------------

    pub(crate) fn check_type_params(
        &mut self,
        a: &[TypeParam],
        b: &[TypeParam],
    ) -> Result<(), FailureReason> {
        let detail = if a.len() != b.len() {
            Some(TypeParameterMismatch::Count {
                interface: a.len(),
                candidate: b.len(),
            })
        } else {
            a.iter()
                .zip(b)
                .enumerate()
                .find_map(|(index, (pa, pb))| match (&pa.bound, &pb.bound) {
                    (None, None) => None,
                    (Some(ba), Some(bb)) => self.check_types(ba, bb).err().map(|cause| {
                        TypeParameterMismatch::Bound {
                            index,
                            cause: Box::new(cause),
                        }
                    }),
                    (ba, bb) => Some(TypeParameterMismatch::BoundPresence {
                        index,
                        interface: ba.is_some(),
                        candidate: bb.is_some(),
                    }),
                })
        };
        detail.map_or(Ok(()), |detail| {
            Err(FailureReason::TypeParameterListIncompatible { detail })
        })
    }

    // -------------------------------------------------------------------------
    // Declaration pairs
    // -------------------------------------------------------------------------

    /// Finished result for `pair`, if one is cached.
    pub(crate) fn cached(&self, pair: &DeclPair) -> Option<bool> {
        self.results.get(pair).copied()
    }

    /// Compare a declaration pair under the guard. `body` reports whether the
    /// pair's members are compatible.
    pub(crate) fn visit_pair(
        &mut self,
        pair: DeclPair,
        body: impl FnOnce(&mut Self) -> bool,
    ) -> PairVisit {
        if let Some(ok) = self.cached(&pair) {
            self.stats.cache_hits += 1;
            return PairVisit::Cached(ok);
        }
        if let Some(&floor) = self.provisional.get(&pair) {
            self.stats.cache_hits += 1;
            self.assume(floor);
            return PairVisit::Assumed;
        }
        self.visit_pair_uncached(pair, body)
    }

    /// [`visit_pair`](Self::visit_pair) without consulting finished or
    /// provisional results. A finished result for `pair` is discarded, so
    /// references back to it inside `body` resolve as cycles.
    pub(crate) fn visit_pair_uncached(
        &mut self,
        pair: DeclPair,
        body: impl FnOnce(&mut Self) -> bool,
    ) -> PairVisit {
        self.results.remove(&pair);
        match self.guard.enter(pair.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                self.stats.cycles_assumed += 1;
                if let Some(depth) = self.guard.entry_depth(&pair) {
                    self.assume(depth);
                }
                trace!(interface = %pair.0, candidate = %pair.1, "cycle, assuming compatible");
                return PairVisit::Assumed;
            }
            RecursionResult::DepthExceeded => {
                self.stats.limit_hits += 1;
                self.assume(0);
                trace!(interface = %pair.0, candidate = %pair.1, "depth limit, deferring");
                return PairVisit::Assumed;
            }
        }

        self.stats.pairs_entered += 1;
        let depth = self.guard.depth();
        let mark = self.provisional.len();
        let outer = self.assumption.take();

        let ok = body(self);

        self.guard.leave(&pair);
        let relied_on = self.assumption.take().filter(|&floor| floor < depth);
        self.assumption = outer;

        if !ok {
            // Anything proven under this pair's assumption is void.
            self.provisional.truncate(mark);
            self.results.insert(pair, false);
        } else if let Some(floor) = relied_on {
            for older in self.provisional.values_mut().skip(mark) {
                if *older >= depth {
                    *older = floor;
                }
            }
            self.provisional.insert(pair, floor);
            self.assume(floor);
        } else {
            for (proven, _) in self.provisional.drain(mark..) {
                self.results.insert(proven, true);
            }
            self.results.insert(pair, true);
        }
        trace!(depth, ok, "declaration pair compared");
        PairVisit::Compared(ok)
    }

    fn assume(&mut self, depth: u32) {
        self.assumption = Some(self.assumption.map_or(depth, |current| current.min(depth)));
    }

    /// Push a finding, logging it.
    pub(crate) fn report(&self, out: &mut Vec<Finding>, path: &str, reason: FailureReason) {
        trace!(path, code = %reason.code(), "finding");
        out.push(Finding::new(path, reason));
    }
}

#[cfg(test)]
#[path = "../tests/compare_tests.rs"]
mod tests;
