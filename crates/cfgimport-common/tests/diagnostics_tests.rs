use super::limits::is_private_name;
use super::*;

#[test]
fn warning_is_not_error() {
    let diag = Diagnostic::warning("a -> b", "f", "missing", "MissingMember");
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert!(!diag.is_error());
    assert_eq!(diag.path, "f");
}

#[test]
fn error_keeps_fields() {
    let diag = Diagnostic::error("a -> b", "C.x", "bad", "ClassMismatch");
    assert!(diag.is_error());
    assert_eq!(diag.subject, "a -> b");
    assert_eq!(diag.message_text, "bad");
    assert_eq!(diag.code, "ClassMismatch");
}

#[test]
fn diagnostic_serializes_category_lowercase() {
    let diag = Diagnostic::warning("s", "p", "m", "KindMismatch");
    let json = serde_json::to_value(&diag).expect("serializes");
    assert_eq!(json["category"], "warning");
    assert_eq!(json["code"], "KindMismatch");
}

#[test]
fn private_names_use_underscore_prefix() {
    assert!(is_private_name("_Base"));
    assert!(!is_private_name("Base"));
    assert!(!is_private_name(""));
}
