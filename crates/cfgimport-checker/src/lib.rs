//! Compatibility Checker
//!
//! Decides whether a candidate library can stand in for an interface
//! library: every public name must exist on both sides and the paired
//! members must be structurally equivalent, recursively through types,
//! superclasses, mixins and interfaces.
//!
//! - **Comparator** (`compare`): equivalence of types, parameter lists and
//!   type-parameter lists, cycle-safe through a per-check [`RecursionGuard`].
//! - **Members** (`members`): per-kind rules and class comparison, with
//!   inherited members flattened in (`inheritance`).
//! - **Checker** ([`CompatibilityChecker`]): walks both namespaces under a
//!   [`Phase`] and returns a [`CompatibilityReport`].
//!
//! Checks are pure: one call builds its own state and returns a complete
//! report, so independent pairs can run on separate threads.

mod checker;
mod compare;
pub mod diagnostics;
pub mod inheritance;
mod members;
pub mod policy;
pub mod recursion;

pub use checker::{CompatibilityChecker, check_compatible};
pub use diagnostics::{
    CheckStats, ClassClause, CompatibilityReport, FailureReason, Finding, Modifier,
    ParameterMismatch, ReasonCode, Side, TypeParameterMismatch,
};
pub use inheritance::flatten_instance_members;
pub use policy::{CheckOptions, Phase};
pub use recursion::{RecursionGuard, RecursionResult};

#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod checker_tests;
#[cfg(test)]
#[path = "../tests/class_tests.rs"]
mod class_tests;
#[cfg(test)]
#[path = "../tests/report_tests.rs"]
mod report_tests;
// compare_tests: loaded from compare.rs
