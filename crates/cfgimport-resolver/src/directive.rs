//! Configured directives and their tests.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// =============================================================================
// DottedName
// =============================================================================

/// A dotted environment key such as `dart.library.io`.
///
/// Whitespace around segments is insignificant: `dart . library . io` and
/// `dart.library.io` are the same name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DottedName {
    segments: SmallVec<[String; 4]>,
}

impl DottedName {
    pub fn parse(text: &str) -> Self {
        let segments: SmallVec<[String; 4]> = text
            .split('.')
            .map(|s| s.trim().to_string())
            .collect();
        if segments.iter().all(String::is_empty) {
            return Self::default();
        }
        Self { segments }
    }

    pub fn from_segments<S: AsRef<str>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

// =============================================================================
// Test
// =============================================================================

/// `if (name == "value")`, or `if (name)` which expects `"true"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Test {
    pub name: DottedName,
    pub expected: Option<String>,
}

impl Test {
    pub fn new(name: &str, expected: Option<&str>) -> Self {
        Self {
            name: DottedName::parse(name),
            expected: expected.map(str::to_string),
        }
    }

    /// The value the key must have for the test to hold.
    pub fn expected_value(&self) -> &str {
        self.expected.as_deref().unwrap_or("true")
    }

    /// True iff the key is present and its value equals the expected value
    /// exactly.
    pub fn evaluate(&self, env: &Environment) -> bool {
        env.lookup(&self.name)
            .is_some_and(|value| value == self.expected_value())
    }
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Some(expected) => write!(f, "{} == \"{expected}\"", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// =============================================================================
// ConfiguredDirective
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub test: Test,
    pub uri: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    #[default]
    Import,
    Export,
}

/// An import or export with a default URI and ordered alternatives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfiguredDirective {
    pub kind: DirectiveKind,
    pub default_uri: String,
    pub configurations: Vec<Configuration>,
}

impl ConfiguredDirective {
    pub fn new(kind: DirectiveKind, default_uri: impl Into<String>) -> Self {
        Self {
            kind,
            default_uri: default_uri.into(),
            configurations: Vec::new(),
        }
    }

    pub fn import(default_uri: impl Into<String>) -> Self {
        Self::new(DirectiveKind::Import, default_uri)
    }

    pub fn export(default_uri: impl Into<String>) -> Self {
        Self::new(DirectiveKind::Export, default_uri)
    }

    /// Append `if (name == expected) uri`.
    pub fn when(mut self, name: &str, expected: Option<&str>, uri: impl Into<String>) -> Self {
        self.configurations.push(Configuration {
            test: Test::new(name, expected),
            uri: uri.into(),
        });
        self
    }

    /// Distinct `(interface, candidate)` URI pairs to check for
    /// compatibility: the default against every configured URI that differs
    /// from it, in declaration order.
    pub fn candidate_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        for config in &self.configurations {
            let candidate = config.uri.as_str();
            if candidate == self.default_uri || pairs.iter().any(|(_, c)| *c == candidate) {
                continue;
            }
            pairs.push((self.default_uri.as_str(), candidate));
        }
        pairs
    }
}

impl fmt::Display for ConfiguredDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            DirectiveKind::Import => "import",
            DirectiveKind::Export => "export",
        };
        write!(f, "{keyword} '{}'", self.default_uri)?;
        for config in &self.configurations {
            write!(f, " if ({}) '{}'", config.test, config.uri)?;
        }
        Ok(())
    }
}
