//! Tracing configuration for the `cfgimport` binary.
//!
//! Three output formats, selected by `CFGIMPORT_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: hierarchical indented output via `tracing-tree`, one block per
//!   checked pair
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Which URI did each directive pick, and why?
//! CFGIMPORT_LOG=cfgimport_resolver=trace cfgimport resolve -m manifest.json
//!
//! # Follow the comparator through a class graph
//! CFGIMPORT_LOG=cfgimport_checker=trace CFGIMPORT_LOG_FORMAT=tree cfgimport check -m manifest.json
//!
//! # Machine-readable
//! CFGIMPORT_LOG=debug CFGIMPORT_LOG_FORMAT=json cfgimport check -m manifest.json
//! ```
//!
//! The subscriber is only installed when `CFGIMPORT_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "CFGIMPORT_LOG";
const FORMAT_VAR: &str = "CFGIMPORT_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `CFGIMPORT_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// `CFGIMPORT_LOG` wins over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_VAR) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, if logging was requested.
///
/// All output goes to stderr; stdout carries resolutions and reports only.
pub fn init_tracing() {
    let requested = std::env::var(LOG_VAR).is_ok() || std::env::var("RUST_LOG").is_ok();
    if !requested {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(LogFormat::parse("TREE"), LogFormat::Tree);
        assert_eq!(LogFormat::parse(" json "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
    }
}
