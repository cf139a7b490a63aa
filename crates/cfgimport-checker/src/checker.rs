//! Top-level compatibility check between two namespaces.

use crate::compare::Comparator;
use crate::diagnostics::{CompatibilityReport, FailureReason, Finding, Side};
use crate::policy::{CheckOptions, Phase};
use cfgimport_model::{Member, Namespace, NamespaceError, Program};
use tracing::{debug, debug_span};

/// Configurable compatibility checker.
///
/// Holds no state between checks; every [`check`](Self::check) starts with a
/// fresh comparison table, so one checker can serve many pairs concurrently.
#[derive(Clone, Copy, Debug)]
pub struct CompatibilityChecker<'p> {
    program: &'p Program,
    phase: Phase,
    options: CheckOptions,
}

impl<'p> CompatibilityChecker<'p> {
    pub fn new(program: &'p Program, phase: Phase) -> Self {
        Self {
            program,
            phase,
            options: CheckOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> CheckOptions {
        self.options
    }

    /// Build both export namespaces from the program and check them.
    pub fn check_uris(
        &self,
        interface: &str,
        candidate: &str,
    ) -> Result<CompatibilityReport, NamespaceError> {
        let interface = self.program.namespace(interface)?;
        let candidate = self.program.namespace(candidate)?;
        Ok(self.check(&interface, &candidate))
    }

    /// Compare `candidate` against `interface`, collecting every finding.
    ///
    /// Names are visited in interface order, then names only the candidate
    /// declares.
    pub fn check(&self, interface: &Namespace, candidate: &Namespace) -> CompatibilityReport {
        let _span = debug_span!(
            "check_compatible",
            interface = interface.uri(),
            candidate = candidate.uri(),
            phase = %self.phase,
        )
        .entered();

        let mut cmp =
            Comparator::new(self.program, interface, candidate, self.phase, self.options);
        let mut findings = Vec::new();

        let names = interface
            .names()
            .chain(candidate.names().filter(|name| !interface.contains(name)));
        for name in names {
            let a = interface.get(name);
            let b = candidate.get(name);

            if self.phase == Phase::FunctionsOnly
                && let Some(reason) = type_declaration_violation(a, b)
            {
                cmp.report(&mut findings, name, reason);
                continue;
            }

            match (a, b) {
                (Some(a), Some(b)) => check_shared(&mut cmp, name, a, b, &mut findings),
                (Some(a), None) => cmp.report(
                    &mut findings,
                    name,
                    FailureReason::MissingMember {
                        missing_from: Side::Candidate,
                        kind: a.kind(),
                    },
                ),
                (None, Some(b)) => cmp.report(
                    &mut findings,
                    name,
                    FailureReason::MissingMember {
                        missing_from: Side::Interface,
                        kind: b.kind(),
                    },
                ),
                (None, None) => {}
            }
        }

        let stats = cmp.stats;
        debug!(
            findings = findings.len(),
            pairs = stats.pairs_entered,
            cache_hits = stats.cache_hits,
            cycles = stats.cycles_assumed,
            "compatibility check finished"
        );
        CompatibilityReport {
            interface: interface.uri().to_string(),
            candidate: candidate.uri().to_string(),
            phase: self.phase,
            findings,
            stats,
        }
    }
}

/// Check `candidate` against `interface` with default options.
pub fn check_compatible(
    program: &Program,
    interface: &Namespace,
    candidate: &Namespace,
    phase: Phase,
) -> CompatibilityReport {
    CompatibilityChecker::new(program, phase).check(interface, candidate)
}

fn type_declaration_violation(a: Option<&Member>, b: Option<&Member>) -> Option<FailureReason> {
    [(a, Side::Interface), (b, Side::Candidate)]
        .into_iter()
        .find_map(|(member, side)| {
            let kind = member?.kind();
            kind.is_type_declaration()
                .then_some(FailureReason::TypeDeclarationNotAllowed { kind, side })
        })
}

/// Compare one shared name. Type declarations of the same kind are
/// compared under the guard so references back to them terminate.
fn check_shared(
    cmp: &mut Comparator<'_>,
    name: &str,
    a: &Member,
    b: &Member,
    out: &mut Vec<Finding>,
) {
    let (Some(decl_a), Some(decl_b)) = (a.decl(), b.decl()) else {
        cmp.compare_members(name, a, b, out);
        return;
    };
    if a.kind() != b.kind() {
        cmp.compare_members(name, a, b, out);
        return;
    }

    let pair = (decl_a.clone(), decl_b.clone());
    if cmp.cached(&pair) == Some(true) {
        return;
    }
    // A cached failure carries no detail; compare again under the guard.
    cmp.visit_pair_uncached(pair, |cmp| {
        let before = out.len();
        cmp.compare_members(name, a, b, out);
        out.len() == before
    });
}
