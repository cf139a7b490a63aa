//! Findings and the compatibility report.
//!
//! Every incompatibility is a [`Finding`]: the member path it concerns and a
//! structured [`FailureReason`]. Reasons nest, so a getter whose return type
//! differs reads as `GetterMismatch` caused by `TypeIncompatible`. Strings are
//! only produced when a report is rendered (`Display`, [`to_diagnostics`]).
//!
//! [`to_diagnostics`]: CompatibilityReport::to_diagnostics

use crate::policy::Phase;
use cfgimport_common::Diagnostic;
use cfgimport_model::MemberKind;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Reason codes
// =============================================================================

/// Stable identifier of a failure reason, used as the diagnostic code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ReasonCode {
    TypeDeclarationNotAllowed,
    MissingMember,
    KindMismatch,
    TypedefMismatch,
    EnumMismatch,
    ConstructorMismatch,
    MethodMismatch,
    GetterMismatch,
    SetterMismatch,
    ClassMismatch,
    TypeIncompatible,
    ParameterListIncompatible,
    TypeParameterListIncompatible,
    ModifierMismatch,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 14] = [
        Self::TypeDeclarationNotAllowed,
        Self::MissingMember,
        Self::KindMismatch,
        Self::TypedefMismatch,
        Self::EnumMismatch,
        Self::ConstructorMismatch,
        Self::MethodMismatch,
        Self::GetterMismatch,
        Self::SetterMismatch,
        Self::ClassMismatch,
        Self::TypeIncompatible,
        Self::ParameterListIncompatible,
        Self::TypeParameterListIncompatible,
        Self::ModifierMismatch,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeDeclarationNotAllowed => "TypeDeclarationNotAllowed",
            Self::MissingMember => "MissingMember",
            Self::KindMismatch => "KindMismatch",
            Self::TypedefMismatch => "TypedefMismatch",
            Self::EnumMismatch => "EnumMismatch",
            Self::ConstructorMismatch => "ConstructorMismatch",
            Self::MethodMismatch => "MethodMismatch",
            Self::GetterMismatch => "GetterMismatch",
            Self::SetterMismatch => "SetterMismatch",
            Self::ClassMismatch => "ClassMismatch",
            Self::TypeIncompatible => "TypeIncompatible",
            Self::ParameterListIncompatible => "ParameterListIncompatible",
            Self::TypeParameterListIncompatible => "TypeParameterListIncompatible",
            Self::ModifierMismatch => "ModifierMismatch",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Supporting enums
// =============================================================================

/// Which of the two libraries a finding refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Interface,
    Candidate,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class header clause that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClassClause {
    Modifiers,
    TypeParameters,
    Superclass,
    Mixins,
    Interfaces,
}

impl fmt::Display for ClassClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Modifiers => "modifiers",
            Self::TypeParameters => "type parameters",
            Self::Superclass => "superclass",
            Self::Mixins => "mixins",
            Self::Interfaces => "interfaces",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Abstract,
    Const,
    Factory,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abstract => "abstract",
            Self::Const => "const",
            Self::Factory => "factory",
        })
    }
}

// =============================================================================
// FailureReason
// =============================================================================

/// Why two members are not compatible.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FailureReason {
    /// A typedef, class or enum in a functions-only check.
    TypeDeclarationNotAllowed { kind: MemberKind, side: Side },
    MissingMember { missing_from: Side, kind: MemberKind },
    KindMismatch {
        interface: MemberKind,
        candidate: MemberKind,
    },
    TypedefMismatch { cause: Box<FailureReason> },
    EnumMismatch {
        interface: Vec<String>,
        candidate: Vec<String>,
    },
    ConstructorMismatch { cause: Box<FailureReason> },
    MethodMismatch { cause: Box<FailureReason> },
    GetterMismatch { cause: Box<FailureReason> },
    SetterMismatch { cause: Box<FailureReason> },
    ClassMismatch {
        clause: ClassClause,
        cause: Box<FailureReason>,
    },
    /// Two types that are not structurally equivalent, as rendered.
    TypeIncompatible { interface: String, candidate: String },
    ParameterListIncompatible { detail: ParameterMismatch },
    TypeParameterListIncompatible { detail: TypeParameterMismatch },
    ModifierMismatch {
        modifier: Modifier,
        interface: bool,
        candidate: bool,
    },
}

impl FailureReason {
    pub const fn code(&self) -> ReasonCode {
        match self {
            Self::TypeDeclarationNotAllowed { .. } => ReasonCode::TypeDeclarationNotAllowed,
            Self::MissingMember { .. } => ReasonCode::MissingMember,
            Self::KindMismatch { .. } => ReasonCode::KindMismatch,
            Self::TypedefMismatch { .. } => ReasonCode::TypedefMismatch,
            Self::EnumMismatch { .. } => ReasonCode::EnumMismatch,
            Self::ConstructorMismatch { .. } => ReasonCode::ConstructorMismatch,
            Self::MethodMismatch { .. } => ReasonCode::MethodMismatch,
            Self::GetterMismatch { .. } => ReasonCode::GetterMismatch,
            Self::SetterMismatch { .. } => ReasonCode::SetterMismatch,
            Self::ClassMismatch { .. } => ReasonCode::ClassMismatch,
            Self::TypeIncompatible { .. } => ReasonCode::TypeIncompatible,
            Self::ParameterListIncompatible { .. } => ReasonCode::ParameterListIncompatible,
            Self::TypeParameterListIncompatible { .. } => {
                ReasonCode::TypeParameterListIncompatible
            }
            Self::ModifierMismatch { .. } => ReasonCode::ModifierMismatch,
        }
    }

    /// The directly nested reason, if any.
    pub fn cause(&self) -> Option<&FailureReason> {
        match self {
            Self::TypedefMismatch { cause }
            | Self::ConstructorMismatch { cause }
            | Self::MethodMismatch { cause }
            | Self::GetterMismatch { cause }
            | Self::SetterMismatch { cause }
            | Self::ClassMismatch { cause, .. } => Some(cause),
            Self::ParameterListIncompatible { detail } => detail.cause(),
            Self::TypeParameterListIncompatible { detail } => detail.cause(),
            _ => None,
        }
    }

    /// This reason followed by its chain of causes.
    pub fn chain(&self) -> impl Iterator<Item = &FailureReason> {
        std::iter::successors(Some(self), |reason| reason.cause())
    }

    /// Whether `code` appears anywhere in the cause chain.
    pub fn mentions(&self, code: ReasonCode) -> bool {
        self.chain().any(|reason| reason.code() == code)
    }

    pub(crate) fn type_incompatible(
        interface: impl fmt::Display,
        candidate: impl fmt::Display,
    ) -> Self {
        Self::TypeIncompatible {
            interface: interface.to_string(),
            candidate: candidate.to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeDeclarationNotAllowed { kind, side } => write!(
                f,
                "{kind} declarations are not allowed in a functions-only check ({side} library)"
            ),
            Self::MissingMember { missing_from, kind } => {
                write!(f, "{kind} is missing from the {missing_from} library")
            }
            Self::KindMismatch {
                interface,
                candidate,
            } => write!(
                f,
                "declared as a {interface} in the interface but as a {candidate} in the candidate"
            ),
            Self::TypedefMismatch { cause } => write!(f, "typedef differs: {cause}"),
            Self::EnumMismatch {
                interface,
                candidate,
            } => write!(
                f,
                "enum values differ: [{}] vs [{}]",
                interface.join(", "),
                candidate.join(", ")
            ),
            Self::ConstructorMismatch { cause } => write!(f, "constructor differs: {cause}"),
            Self::MethodMismatch { cause } => write!(f, "method differs: {cause}"),
            Self::GetterMismatch { cause } => write!(f, "getter differs: {cause}"),
            Self::SetterMismatch { cause } => write!(f, "setter differs: {cause}"),
            Self::ClassMismatch { clause, cause } => write!(f, "class {clause} differ: {cause}"),
            Self::TypeIncompatible {
                interface,
                candidate,
            } => write!(f, "type '{interface}' is not compatible with '{candidate}'"),
            Self::ParameterListIncompatible { detail } => {
                write!(f, "parameter lists differ: {detail}")
            }
            Self::TypeParameterListIncompatible { detail } => {
                write!(f, "type parameter lists differ: {detail}")
            }
            Self::ModifierMismatch {
                modifier,
                interface,
                candidate,
            } => write!(
                f,
                "'{modifier}' is {} in the interface but {} in the candidate",
                present(*interface),
                present(*candidate)
            ),
        }
    }
}

fn present(flag: bool) -> &'static str {
    if flag { "present" } else { "absent" }
}

// =============================================================================
// Parameter details
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ParameterMismatch {
    RequiredCount {
        interface: usize,
        candidate: usize,
    },
    OptionalCount {
        interface: usize,
        candidate: usize,
    },
    Required {
        index: usize,
        cause: Box<FailureReason>,
    },
    Optional {
        index: usize,
        cause: Box<FailureReason>,
    },
    NamedMissing {
        name: String,
        missing_from: Side,
    },
    Named {
        name: String,
        cause: Box<FailureReason>,
    },
    /// Default values of a named parameter are not the same constant.
    NamedDefault {
        name: String,
        interface: Option<String>,
        candidate: Option<String>,
    },
}

impl ParameterMismatch {
    pub fn cause(&self) -> Option<&FailureReason> {
        match self {
            Self::Required { cause, .. }
            | Self::Optional { cause, .. }
            | Self::Named { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredCount {
                interface,
                candidate,
            } => write!(
                f,
                "{interface} required positional parameter(s) vs {candidate}"
            ),
            Self::OptionalCount {
                interface,
                candidate,
            } => write!(
                f,
                "{interface} optional positional parameter(s) vs {candidate}"
            ),
            Self::Required { index, cause } => {
                write!(f, "required parameter #{index}: {cause}")
            }
            Self::Optional { index, cause } => {
                write!(f, "optional parameter #{index}: {cause}")
            }
            Self::NamedMissing { name, missing_from } => {
                write!(f, "named parameter '{name}' is missing from the {missing_from}")
            }
            Self::Named { name, cause } => write!(f, "named parameter '{name}': {cause}"),
            Self::NamedDefault {
                name,
                interface,
                candidate,
            } => write!(
                f,
                "named parameter '{name}' defaults to {} vs {}",
                interface.as_deref().unwrap_or("nothing"),
                candidate.as_deref().unwrap_or("nothing")
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeParameterMismatch {
    Count {
        interface: usize,
        candidate: usize,
    },
    /// One side declares an upper bound and the other does not.
    BoundPresence {
        index: usize,
        interface: bool,
        candidate: bool,
    },
    Bound {
        index: usize,
        cause: Box<FailureReason>,
    },
}

impl TypeParameterMismatch {
    pub fn cause(&self) -> Option<&FailureReason> {
        match self {
            Self::Bound { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl fmt::Display for TypeParameterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count {
                interface,
                candidate,
            } => write!(f, "{interface} type parameter(s) vs {candidate}"),
            Self::BoundPresence {
                index,
                interface,
                candidate,
            } => write!(
                f,
                "bound of type parameter #{index} is {} in the interface but {} in the candidate",
                present(*interface),
                present(*candidate)
            ),
            Self::Bound { index, cause } => {
                write!(f, "bound of type parameter #{index}: {cause}")
            }
        }
    }
}

// =============================================================================
// Findings and report
// =============================================================================

/// One incompatibility at a member path such as `f`, `C` or `C.value`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub path: String,
    pub code: ReasonCode,
    pub reason: FailureReason,
}

impl Finding {
    pub fn new(path: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            path: path.into(),
            code: reason.code(),
            reason,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.path, self.code, self.reason)
    }
}

/// Counters collected during one check.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStats {
    /// Declaration pairs whose members were actually compared.
    pub pairs_entered: u32,
    pub cache_hits: u32,
    /// Re-entries of an in-progress pair, assumed compatible.
    pub cycles_assumed: u32,
    pub limit_hits: u32,
}

/// Result of comparing a candidate library against an interface library.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub interface: String,
    pub candidate: String,
    pub phase: Phase,
    pub findings: Vec<Finding>,
    pub stats: CheckStats,
}

impl CompatibilityReport {
    pub fn is_compatible(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Top-level codes, in report order.
    pub fn codes(&self) -> Vec<ReasonCode> {
        self.findings.iter().map(|finding| finding.code).collect()
    }

    /// Whether any finding mentions `code`, including nested causes.
    pub fn contains(&self, code: ReasonCode) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.reason.mentions(code))
    }

    pub fn findings_at<'r>(&'r self, path: &'r str) -> impl Iterator<Item = &'r Finding> + 'r {
        self.findings
            .iter()
            .filter(move |finding| finding.path == path)
    }

    /// One warning per finding.
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        let subject = format!("{} -> {}", self.interface, self.candidate);
        self.findings
            .iter()
            .map(|finding| {
                Diagnostic::warning(
                    subject.clone(),
                    finding.path.clone(),
                    finding.reason.to_string(),
                    finding.code.as_str(),
                )
            })
            .collect()
    }
}

impl fmt::Display for CompatibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.findings.is_empty() {
            return write!(
                f,
                "{} -> {}: compatible ({})",
                self.interface, self.candidate, self.phase
            );
        }
        write!(
            f,
            "{} -> {}: {} finding(s) ({})",
            self.interface,
            self.candidate,
            self.findings.len(),
            self.phase
        )?;
        for finding in &self.findings {
            write!(f, "\n  {finding}")?;
        }
        Ok(())
    }
}
