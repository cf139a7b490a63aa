use super::*;
use rayon::prelude::*;

fn io_html_directive() -> ConfiguredDirective {
    ConfiguredDirective::import("iface")
        .when("ns.library.io", None, "io")
        .when("ns.library.html", None, "html")
}

#[test]
fn first_matching_configuration_wins() {
    let env = Environment::from_pairs([("ns.library.io", "true")]);
    assert_eq!(resolve(&io_html_directive(), &env), "io");
}

#[test]
fn empty_environment_selects_default() {
    assert_eq!(resolve(&io_html_directive(), &Environment::empty()), "iface");
}

#[test]
fn declared_order_decides_when_several_tests_pass() {
    let env = Environment::builder()
        .host_library("ns", "io")
        .host_library("ns", "html")
        .build();
    assert_eq!(resolve(&io_html_directive(), &env), "io");

    let reversed = ConfiguredDirective::import("iface")
        .when("ns.library.html", None, "html")
        .when("ns.library.io", None, "io");
    assert_eq!(resolve(&reversed, &env), "html");
}

#[test]
fn later_configuration_matches_when_earlier_fails() {
    let env = Environment::from_pairs([("ns.library.html", "true")]);
    assert_eq!(resolve(&io_html_directive(), &env), "html");
}

#[test]
fn expected_value_is_compared_exactly() {
    let directive = ConfiguredDirective::import("default.dart")
        .when("app.mode", Some("debug"), "debug.dart")
        .when("app.mode", Some("release"), "release.dart");

    let release = Environment::from_pairs([("app.mode", "release")]);
    assert_eq!(resolve(&directive, &release), "release.dart");

    let upper = Environment::from_pairs([("app.mode", "DEBUG")]);
    assert_eq!(resolve(&directive, &upper), "default.dart");
}

#[test]
fn bare_test_expects_true_literally() {
    let directive = ConfiguredDirective::import("a").when("flag", None, "b");
    assert_eq!(resolve(&directive, &Environment::from_pairs([("flag", "yes")])), "a");
    assert_eq!(resolve(&directive, &Environment::from_pairs([("flag", "true")])), "b");
}

#[test]
fn whitespace_in_dotted_names_is_insignificant() {
    let directive = ConfiguredDirective::import("iface").when("ns . library .io", None, "io");
    let env = Environment::from_pairs([("ns.library.io", "true")]);
    assert_eq!(resolve(&directive, &env), "io");

    let test = Test::new(" ns.library . io", None);
    assert_eq!(test.evaluate(&env), Test::new("ns.library.io", None).evaluate(&env));
}

#[test]
fn directive_without_configurations_is_its_default() {
    let directive = ConfiguredDirective::export("only.dart");
    let env = Environment::from_pairs([("anything", "true")]);
    assert_eq!(resolve(&directive, &env), "only.dart");
}

#[test]
fn resolve_all_preserves_order() {
    let directives = vec![
        io_html_directive(),
        ConfiguredDirective::import("x").when("ns.library.html", None, "y"),
    ];
    let env = Environment::from_pairs([("ns.library.html", "true")]);
    assert_eq!(resolve_all(&directives, &env), vec!["html", "y"]);
}

#[test]
fn resolution_is_independent_across_threads() {
    let env = Environment::from_pairs([("ns.library.io", "true")]);
    let directives: Vec<ConfiguredDirective> = (0..64).map(|_| io_html_directive()).collect();
    let resolved: Vec<&str> = directives.par_iter().map(|d| resolve(d, &env)).collect();
    assert!(resolved.iter().all(|uri| *uri == "io"));
}

#[test]
fn candidate_pairs_skip_default_and_duplicates() {
    let directive = ConfiguredDirective::import("iface")
        .when("a", None, "io")
        .when("b", None, "iface")
        .when("c", None, "io")
        .when("d", None, "html");
    assert_eq!(
        directive.candidate_pairs(),
        vec![("iface", "io"), ("iface", "html")]
    );
}

#[test]
fn directives_render_like_source() {
    let directive = ConfiguredDirective::import("iface")
        .when("ns.library.io", None, "io")
        .when("app.mode", Some("debug"), "debug");
    assert_eq!(
        directive.to_string(),
        "import 'iface' if (ns.library.io) 'io' if (app.mode == \"debug\") 'debug'"
    );
}
