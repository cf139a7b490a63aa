use super::args::{CliArgs, Command, OutputFormat, PhaseArg};
use cfgimport_checker::Phase;
use clap::Parser;
use std::path::Path;

fn parse(argv: &[&str]) -> Command {
    CliArgs::try_parse_from(argv)
        .expect("should parse")
        .command
}

#[test]
fn resolve_collects_repeated_defines_and_hosts() {
    let Command::Resolve(args) = parse(&[
        "cfgimport",
        "resolve",
        "-m",
        "manifest.json",
        "-D",
        "app.flavor=prod",
        "--define",
        "dart.library.html",
        "--host-library",
        "dart:io",
    ]) else {
        panic!("expected resolve");
    };
    assert_eq!(args.manifest, Path::new("manifest.json"));
    assert_eq!(args.defines, ["app.flavor=prod", "dart.library.html"]);
    assert_eq!(args.host_libraries, ["dart:io"]);
    assert_eq!(args.format, OutputFormat::Text);
}

#[test]
fn check_defaults() {
    let Command::Check(args) = parse(&["cfgimport", "check", "--manifest", "m.json"]) else {
        panic!("expected check");
    };
    assert_eq!(args.phase, PhaseArg::Full);
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.exclude_private_supertypes);
    assert!(!args.error_on_incompatible);
    assert_eq!(args.color(), None);
    assert!(!args.check_options().exclude_private_supertypes);
}

#[test]
fn check_flags() {
    let Command::Check(args) = parse(&[
        "cfgimport",
        "check",
        "-m",
        "m.json",
        "--phase",
        "functions-only",
        "--format",
        "json",
        "--exclude-private-supertypes",
        "--no-color",
        "--error-on-incompatible",
    ]) else {
        panic!("expected check");
    };
    assert_eq!(Phase::from(args.phase), Phase::FunctionsOnly);
    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.check_options().exclude_private_supertypes);
    assert!(args.error_on_incompatible);
    assert_eq!(args.color(), Some(false));
}

#[test]
fn pretty_takes_a_value() {
    let Command::Check(args) = parse(&["cfgimport", "check", "-m", "m.json", "--pretty", "true"])
    else {
        panic!("expected check");
    };
    assert_eq!(args.color(), Some(true));
}

#[test]
fn pretty_and_no_color_conflict() {
    let result = CliArgs::try_parse_from([
        "cfgimport",
        "check",
        "-m",
        "m.json",
        "--pretty",
        "true",
        "--no-color",
    ]);
    assert!(result.is_err());
}

#[test]
fn manifest_is_required() {
    assert!(CliArgs::try_parse_from(["cfgimport", "check"]).is_err());
    assert!(CliArgs::try_parse_from(["cfgimport", "resolve"]).is_err());
}

#[test]
fn unknown_phase_is_rejected() {
    let result = CliArgs::try_parse_from(["cfgimport", "check", "-m", "m.json", "--phase", "types"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(CliArgs::try_parse_from(["cfgimport"]).is_err());
}
