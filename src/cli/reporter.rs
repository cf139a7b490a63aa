use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use cfgimport_checker::CompatibilityReport;
use cfgimport_common::{Diagnostic, DiagnosticCategory};

use super::driver::Resolution;

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// One `directive -> uri` line per resolution.
    pub fn render_resolutions(&self, resolutions: &[Resolution]) -> String {
        let mut out = String::new();
        for resolution in resolutions {
            out.push_str(&resolution.directive);
            out.push_str(" -> ");
            out.push_str(&resolution.uri);
            out.push('\n');
        }
        out
    }

    /// Every report with its findings, followed by a summary line.
    pub fn render_reports(&self, reports: &[CompatibilityReport]) -> String {
        let mut out = String::new();
        for report in reports {
            out.push_str(&self.format_report(report));
        }
        let incompatible = reports.iter().filter(|r| !r.is_compatible()).count();
        let summary = format!(
            "Checked {} pair(s): {} incompatible.",
            reports.len(),
            incompatible
        );
        if self.color && incompatible > 0 {
            out.push_str(&summary.bold().to_string());
        } else {
            out.push_str(&summary);
        }
        out.push('\n');
        out
    }

    pub fn format_report(&self, report: &CompatibilityReport) -> String {
        let subject = format!("{} -> {}", report.interface, report.candidate);
        let subject = if self.color {
            subject.bold().to_string()
        } else {
            subject
        };

        let mut output = if report.is_compatible() {
            let status = if self.color {
                "compatible".green().to_string()
            } else {
                "compatible".to_string()
            };
            format!("{subject}: {status} ({})\n", report.phase)
        } else {
            format!("{subject}: {} finding(s) ({})\n", report.len(), report.phase)
        };

        for diagnostic in report.to_diagnostics() {
            output.push_str("  ");
            output.push_str(&self.format_diagnostic(&diagnostic));
            output.push('\n');
        }
        output
    }

    /// `path - warning Code: message`
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let path = if self.color {
            diagnostic.path.cyan().to_string()
        } else {
            diagnostic.path.clone()
        };
        format!(
            "{path} - {} {}: {}",
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        )
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: &str) -> String {
        if self.color {
            code.bright_blue().to_string()
        } else {
            code.to_string()
        }
    }
}

/// Pretty-printed JSON, newline-terminated.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    json.push('\n');
    Ok(json)
}
