//! Common types and utilities for the cfgimport toolchain.
//!
//! This crate provides foundational types used across all cfgimport crates:
//! - Diagnostic records handed to external printers (`Diagnostic`, `DiagnosticCategory`)
//! - Centralized limits for namespace construction and class traversal

// Diagnostic records
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
