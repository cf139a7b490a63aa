use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// A rendered finding, ready for an external diagnostics printer.
///
/// `subject` names what the diagnostic is about (for compatibility findings,
/// the `interface -> candidate` pair), `path` the member inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: &'static str,
    pub subject: String,
    pub path: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn warning(
        subject: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            subject: subject.into(),
            path: path.into(),
            message_text: message.into(),
        }
    }

    pub fn error(
        subject: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            ..Self::warning(subject, path, message, code)
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}
