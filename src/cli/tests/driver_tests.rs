use super::args::CliArgs;
use super::config::parse_manifest;
use super::driver::{
    EXIT_INCOMPATIBLE, EXIT_SUCCESS, Resolution, candidate_pairs, check_manifest, exit_status,
    resolve_directives, run,
};
use cfgimport_checker::{CheckOptions, Phase, ReasonCode};
use cfgimport_resolver::{ConfiguredDirective, Environment};
use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `stub.dart` is the interface; `io.dart` changes a default, `web.dart`
/// matches, `html.dart` only differs by a private superclass.
const MANIFEST: &str = r#"{
  "hostLibraries": ["dart:io"],
  "libraries": [
    { "uri": "stub.dart", "declarations": [
        { "kind": "function", "name": "parse", "returns": "int",
          "params": { "required": ["String"],
                      "named": [{ "name": "radix", "type": "int", "default": 10 }] } },
        { "kind": "class", "name": "Client",
          "members": [{ "kind": "method", "name": "close" }] }
    ] },
    { "uri": "io.dart", "declarations": [
        { "kind": "function", "name": "parse", "returns": "int",
          "params": { "required": ["String"],
                      "named": [{ "name": "radix", "type": "int", "default": 16 }] } },
        { "kind": "class", "name": "Client",
          "members": [{ "kind": "method", "name": "close" }] }
    ] },
    { "uri": "web.dart", "declarations": [
        { "kind": "function", "name": "parse", "returns": "int",
          "params": { "required": ["String"],
                      "named": [{ "name": "radix", "type": "int", "default": 10 }] } },
        { "kind": "class", "name": "Client",
          "members": [{ "kind": "method", "name": "close" }] }
    ] },
    { "uri": "html.dart", "declarations": [
        { "kind": "function", "name": "parse", "returns": "int",
          "params": { "required": ["String"],
                      "named": [{ "name": "radix", "type": "int", "default": 10 }] } },
        { "kind": "class", "name": "_Base",
          "members": [{ "kind": "method", "name": "close" }] },
        { "kind": "class", "name": "Client", "extends": "_Base" }
    ] }
  ],
  "directives": [
    { "uri": "stub.dart", "configurations": [
        { "when": "dart.library.io", "uri": "io.dart" },
        { "when": "dart.library.js_interop", "uri": "web.dart" }
    ] },
    { "kind": "export", "uri": "stub.dart", "configurations": [
        { "when": "dart.library.io", "uri": "io.dart" },
        { "when": "dart.library.html", "uri": "html.dart" }
    ] }
  ]
}"#;

fn write_manifest(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("manifest.json");
    std::fs::write(&path, json).expect("write manifest");
    path
}

fn run_args(argv: &[&str]) -> super::driver::Outcome {
    let args = CliArgs::try_parse_from(argv).expect("should parse");
    run(&args.command, false).expect("should run")
}

#[test]
fn resolve_uses_manifest_environment() {
    let dir = TempDir::new().expect("temp dir");
    let manifest = write_manifest(dir.path(), MANIFEST);
    let outcome = run_args(&["cfgimport", "resolve", "-m", manifest.to_str().expect("utf-8")]);

    assert_eq!(outcome.exit_code, EXIT_SUCCESS);
    let lines: Vec<&str> = outcome.output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("import 'stub.dart'"), "{}", lines[0]);
    assert!(lines[0].ends_with(" -> io.dart"), "{}", lines[0]);
    assert!(lines[1].starts_with("export 'stub.dart'"), "{}", lines[1]);
    assert!(lines[1].ends_with(" -> io.dart"), "{}", lines[1]);
}

#[test]
fn resolve_flags_override_the_manifest() {
    let dir = TempDir::new().expect("temp dir");
    let manifest = write_manifest(dir.path(), MANIFEST);
    let path = manifest.to_str().expect("utf-8");

    let outcome = run_args(&[
        "cfgimport",
        "resolve",
        "-m",
        path,
        "-D",
        "dart.library.io=false",
        "--host-library",
        "dart:html",
        "--format",
        "json",
    ]);
    let resolutions: serde_json::Value =
        serde_json::from_str(&outcome.output).expect("valid JSON");
    assert_eq!(resolutions[0]["uri"], "stub.dart");
    assert_eq!(resolutions[1]["uri"], "html.dart");
}

#[test]
fn resolve_directives_picks_first_match() {
    let directives = [
        ConfiguredDirective::import("a.dart")
            .when("x", None, "x.dart")
            .when("y", None, "y.dart"),
        ConfiguredDirective::import("b.dart"),
    ];
    let env = Environment::from_pairs([("x", "true"), ("y", "true")]);
    assert_eq!(
        resolve_directives(&directives, &env),
        [
            Resolution {
                directive: directives[0].to_string(),
                uri: "x.dart".to_string(),
            },
            Resolution {
                directive: directives[1].to_string(),
                uri: "b.dart".to_string(),
            },
        ]
    );
}

#[test]
fn candidate_pairs_are_deduplicated_across_directives() {
    let directives = parse_manifest(MANIFEST).expect("manifest").directives();
    assert_eq!(
        candidate_pairs(&directives),
        [
            ("stub.dart", "io.dart"),
            ("stub.dart", "web.dart"),
            ("stub.dart", "html.dart"),
        ]
    );
}

#[test]
fn check_reports_every_pair_in_order() {
    let manifest = parse_manifest(MANIFEST).expect("manifest");
    let reports = check_manifest(&manifest, Phase::Full, CheckOptions::default()).expect("check");

    let candidates: Vec<&str> = reports.iter().map(|r| r.candidate.as_str()).collect();
    assert_eq!(candidates, ["io.dart", "web.dart", "html.dart"]);

    assert_eq!(reports[0].codes(), [ReasonCode::MethodMismatch]);
    assert!(reports[0].contains(ReasonCode::ParameterListIncompatible));
    assert!(reports[1].is_compatible());
    // `Client extends _Base` vs. no superclass.
    assert!(reports[2].contains(ReasonCode::ClassMismatch));

    let relaxed = CheckOptions::default().exclude_private_supertypes(true);
    let reports = check_manifest(&manifest, Phase::Full, relaxed).expect("check");
    assert!(reports[2].is_compatible(), "{}", reports[2]);
}

#[test]
fn check_is_deterministic() {
    let manifest = parse_manifest(MANIFEST).expect("manifest");
    let first = check_manifest(&manifest, Phase::Full, CheckOptions::default()).expect("check");
    for _ in 0..4 {
        let again = check_manifest(&manifest, Phase::Full, CheckOptions::default()).expect("check");
        assert_eq!(first, again);
    }
}

#[test]
fn functions_only_rejects_classes() {
    let manifest = parse_manifest(MANIFEST).expect("manifest");
    let reports =
        check_manifest(&manifest, Phase::FunctionsOnly, CheckOptions::default()).expect("check");
    assert!(
        reports
            .iter()
            .all(|r| r.contains(ReasonCode::TypeDeclarationNotAllowed))
    );
}

#[test]
fn exit_status_only_fails_when_asked() {
    let dir = TempDir::new().expect("temp dir");
    let manifest = write_manifest(dir.path(), MANIFEST);
    let path = manifest.to_str().expect("utf-8");

    let outcome = run_args(&["cfgimport", "check", "-m", path]);
    assert_eq!(outcome.exit_code, EXIT_SUCCESS);
    assert!(
        outcome
            .output
            .ends_with("Checked 3 pair(s): 2 incompatible.\n"),
        "{}",
        outcome.output
    );

    let outcome = run_args(&["cfgimport", "check", "-m", path, "--error-on-incompatible"]);
    assert_eq!(outcome.exit_code, EXIT_INCOMPATIBLE);

    let manifest = parse_manifest(MANIFEST).expect("manifest");
    let reports = check_manifest(&manifest, Phase::Full, CheckOptions::default()).expect("check");
    assert_eq!(exit_status(&reports[1..2], true), EXIT_SUCCESS);
    assert_eq!(exit_status(&[], true), EXIT_SUCCESS);
}

#[test]
fn check_json_output_is_a_report_array() {
    let dir = TempDir::new().expect("temp dir");
    let manifest = write_manifest(dir.path(), MANIFEST);
    let outcome = run_args(&[
        "cfgimport",
        "check",
        "-m",
        manifest.to_str().expect("utf-8"),
        "--format",
        "json",
    ]);
    let json: serde_json::Value = serde_json::from_str(&outcome.output).expect("valid JSON");
    let reports = json.as_array().expect("array");
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["candidate"], "io.dart");
    assert_eq!(reports[0]["findings"][0]["path"], "parse");
    assert_eq!(reports[0]["findings"][0]["code"], "MethodMismatch");
    assert_eq!(reports[1]["findings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn unknown_candidate_library_is_an_error() {
    let manifest = parse_manifest(
        r#"{ "libraries": [{ "uri": "stub.dart" }],
             "directives": [{ "uri": "stub.dart", "configurations": [
                 { "when": "dart.library.io", "uri": "missing.dart" }] }] }"#,
    )
    .expect("manifest");
    let err = check_manifest(&manifest, Phase::Full, CheckOptions::default())
        .expect_err("missing library");
    let message = format!("{err:#}");
    assert!(message.contains("stub.dart -> missing.dart"), "{message}");
    assert!(message.contains("missing.dart"), "{message}");
}

#[test]
fn missing_manifest_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nope.json");
    let args = CliArgs::try_parse_from(["cfgimport", "check", "-m", path.to_str().expect("utf-8")])
        .expect("should parse");
    let err = run(&args.command, false).expect_err("missing manifest");
    assert!(err.to_string().contains("nope.json"), "{err}");
}
