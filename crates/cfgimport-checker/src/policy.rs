//! Check strictness.

use serde::Serialize;
use std::fmt;

/// Strictness tier of a compatibility check.
///
/// `FunctionsOnly` accepts libraries made of top-level functions, getters
/// and setters only; any typedef, class or enum is reported instead of
/// compared. `Full` compares every member kind, recursing through classes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    FunctionsOnly,
    #[default]
    Full,
}

impl Phase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FunctionsOnly => "functions-only",
            Self::Full => "full",
        }
    }

    #[inline]
    pub const fn is_full(self) -> bool {
        matches!(self, Self::Full)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options that are not part of the phase model.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOptions {
    /// Skip library-private superclasses, mixins and interfaces when
    /// comparing class headers. Their public members are still compared
    /// through the flattened instance-member map.
    pub exclude_private_supertypes: bool,
}

impl CheckOptions {
    pub fn exclude_private_supertypes(mut self, exclude: bool) -> Self {
        self.exclude_private_supertypes = exclude;
        self
    }
}
