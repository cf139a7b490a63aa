//! Runs the `resolve` and `check` subcommands.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info_span};

use cfgimport_checker::{CheckOptions, CompatibilityChecker, CompatibilityReport, Phase};
use cfgimport_model::Program;
use cfgimport_resolver::{ConfiguredDirective, Environment, resolve};

use super::args::{CheckArgs, Command, OutputFormat, ResolveArgs};
use super::config::{Manifest, load_manifest};
use super::reporter::{Reporter, render_json};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INCOMPATIBLE: i32 = 1;

/// What a subcommand prints to stdout, and the status to exit with.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub exit_code: i32,
}

/// One resolved directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub directive: String,
    pub uri: String,
}

/// Run a subcommand. `color` is used for text output unless the arguments
/// say otherwise.
pub fn run(command: &Command, color: bool) -> Result<Outcome> {
    match command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args, color),
    }
}

fn run_resolve(args: &ResolveArgs) -> Result<Outcome> {
    let manifest = load_manifest(&args.manifest)?;
    let env = manifest
        .environment(&args.host_libraries, &args.defines)
        .context("invalid environment")?;
    let resolutions = resolve_directives(&manifest.directives(), &env);
    let output = match args.format {
        OutputFormat::Text => Reporter::new(false).render_resolutions(&resolutions),
        OutputFormat::Json => render_json(&resolutions)?,
    };
    Ok(Outcome {
        output,
        exit_code: EXIT_SUCCESS,
    })
}

fn run_check(args: &CheckArgs, color: bool) -> Result<Outcome> {
    let manifest = load_manifest(&args.manifest)?;
    let reports = check_manifest(&manifest, args.phase.into(), args.check_options())?;
    let output = match args.format {
        OutputFormat::Text => {
            Reporter::new(args.color().unwrap_or(color)).render_reports(&reports)
        }
        OutputFormat::Json => render_json(&reports)?,
    };
    Ok(Outcome {
        output,
        exit_code: exit_status(&reports, args.error_on_incompatible),
    })
}

pub fn resolve_directives(
    directives: &[ConfiguredDirective],
    env: &Environment,
) -> Vec<Resolution> {
    directives
        .iter()
        .map(|directive| Resolution {
            directive: directive.to_string(),
            uri: resolve(directive, env).to_string(),
        })
        .collect()
}

/// Distinct `(interface, candidate)` pairs over all directives, in
/// directive order.
pub fn candidate_pairs(directives: &[ConfiguredDirective]) -> Vec<(&str, &str)> {
    let mut seen = FxHashSet::default();
    directives
        .iter()
        .flat_map(ConfiguredDirective::candidate_pairs)
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Check every candidate pair of every directive in the manifest.
pub fn check_manifest(
    manifest: &Manifest,
    phase: Phase,
    options: CheckOptions,
) -> Result<Vec<CompatibilityReport>> {
    let program = manifest.program()?;
    let directives = manifest.directives();
    check_pairs(&program, &candidate_pairs(&directives), phase, options)
}

/// Pairs are independent, so they are checked in parallel. Reports come
/// back in pair order.
pub fn check_pairs(
    program: &Program,
    pairs: &[(&str, &str)],
    phase: Phase,
    options: CheckOptions,
) -> Result<Vec<CompatibilityReport>> {
    let _span = info_span!("check_pairs", pairs = pairs.len(), %phase).entered();
    let checker = CompatibilityChecker::new(program, phase).with_options(options);
    let reports: Vec<CompatibilityReport> = pairs
        .par_iter()
        .map(|&(interface, candidate)| {
            checker
                .check_uris(interface, candidate)
                .with_context(|| format!("cannot check {interface} -> {candidate}"))
        })
        .collect::<Result<_>>()?;
    debug!(
        incompatible = reports.iter().filter(|r| !r.is_compatible()).count(),
        "checked pairs"
    );
    Ok(reports)
}

pub fn exit_status(reports: &[CompatibilityReport], error_on_incompatible: bool) -> i32 {
    if error_on_incompatible && reports.iter().any(|r| !r.is_compatible()) {
        EXIT_INCOMPATIBLE
    } else {
        EXIT_SUCCESS
    }
}
