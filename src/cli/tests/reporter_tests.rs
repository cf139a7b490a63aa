use super::driver::Resolution;
use super::reporter::{Reporter, render_json};
use cfgimport_checker::{CompatibilityChecker, CompatibilityReport, Phase};
use cfgimport_common::Diagnostic;
use cfgimport_model::{ConstValue, LibraryBuilder, ParamList, Program, Type};

fn int() -> Type {
    Type::named("dart:core", "int")
}

fn reports() -> Vec<CompatibilityReport> {
    let parse = |default| ParamList::new().named("radix", int(), Some(ConstValue::Int(default)));
    let program = Program::new()
        .with_library(
            LibraryBuilder::new("stub.dart")
                .function("parse", int(), parse(10))
                .build(),
        )
        .with_library(
            LibraryBuilder::new("io.dart")
                .function("parse", int(), parse(16))
                .getter("extra", int())
                .build(),
        )
        .with_library(
            LibraryBuilder::new("web.dart")
                .function("parse", int(), parse(10))
                .build(),
        );
    let checker = CompatibilityChecker::new(&program, Phase::Full);
    vec![
        checker.check_uris("stub.dart", "io.dart").expect("namespaces"),
        checker.check_uris("stub.dart", "web.dart").expect("namespaces"),
    ]
}

#[test]
fn resolutions_render_one_per_line() {
    let output = Reporter::new(false).render_resolutions(&[
        Resolution {
            directive: "import 'a.dart' if (x) 'b.dart'".into(),
            uri: "b.dart".into(),
        },
        Resolution {
            directive: "export 'c.dart'".into(),
            uri: "c.dart".into(),
        },
    ]);
    assert_eq!(
        output,
        "import 'a.dart' if (x) 'b.dart' -> b.dart\nexport 'c.dart' -> c.dart\n"
    );
}

#[test]
fn plain_report_layout() {
    let output = Reporter::new(false).render_reports(&reports());
    let expected = "\
stub.dart -> io.dart: 2 finding(s) (full)
  parse - warning MethodMismatch: method differs: parameter lists differ: named parameter 'radix' defaults to 10 vs 16
  extra - warning MissingMember: getter is missing from the interface library
stub.dart -> web.dart: compatible (full)
Checked 2 pair(s): 1 incompatible.
";
    assert_eq!(output, expected);
}

#[test]
fn empty_run_still_prints_a_summary() {
    assert_eq!(
        Reporter::new(false).render_reports(&[]),
        "Checked 0 pair(s): 0 incompatible.\n"
    );
}

#[test]
fn diagnostic_line_names_path_and_code() {
    let diagnostic = Diagnostic::warning("a -> b", "C.value", "getter differs", "GetterMismatch");
    assert_eq!(
        Reporter::new(false).format_diagnostic(&diagnostic),
        "C.value - warning GetterMismatch: getter differs"
    );
    let error = Diagnostic::error("a -> b", "f", "boom", "TypeIncompatible");
    assert_eq!(
        Reporter::new(false).format_diagnostic(&error),
        "f - error TypeIncompatible: boom"
    );
}

#[test]
fn colored_output_keeps_the_text() {
    let output = Reporter::new(true).render_reports(&reports());
    assert!(output.contains("MethodMismatch"));
    assert!(output.contains("named parameter 'radix' defaults to 10 vs 16"));
    assert!(output.contains("Checked 2 pair(s): 1 incompatible."));
}

#[test]
fn json_is_pretty_and_newline_terminated() {
    let json = render_json(&reports()).expect("serialize");
    assert!(json.ends_with("]\n"));
    assert!(json.contains("\n  {"));
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value[0]["interface"], "stub.dart");
    assert_eq!(value[0]["findings"][1]["reason"]["missingFrom"], "interface");
    assert_eq!(value[1]["stats"]["pairsEntered"], 0);
}
