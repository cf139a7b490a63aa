use super::*;

#[test]
fn host_libraries_map_to_true() {
    let env = Environment::builder()
        .host_library("dart", "io")
        .host_library("dart", "html")
        .build();

    assert_eq!(env.get("dart.library.io"), Some("true"));
    assert_eq!(env.get("dart.library.html"), Some("true"));
    assert_eq!(env.len(), 2);
}

#[test]
fn user_defines_override_host_values() {
    let env = Environment::builder()
        .define("dart.library.io", "false")
        .host_library("dart", "io")
        .build();

    assert_eq!(env.get("dart.library.io"), Some("false"));
}

#[test]
fn keys_are_normalized_on_insert() {
    let env = Environment::builder().define(" app . mode ", "debug").build();
    assert_eq!(env.get("app.mode"), Some("debug"));
    assert_eq!(env.lookup(&DottedName::parse("app .mode")), Some("debug"));
}

#[test]
fn parse_define_accepts_key_value_and_bare_key() {
    let env = Environment::builder()
        .parse_define("app.mode=release")
        .and_then(|b| b.parse_define("app.verbose"))
        .and_then(|b| b.parse_define("app.empty="))
        .expect("defines parse")
        .build();

    assert_eq!(env.get("app.mode"), Some("release"));
    assert_eq!(env.get("app.verbose"), Some("true"));
    assert_eq!(env.get("app.empty"), Some(""));
}

#[test]
fn parse_define_rejects_empty_key() {
    let err = Environment::builder()
        .parse_define("=value")
        .expect_err("empty key");
    assert_eq!(err.input, "=value");
    assert!(err.to_string().contains("=value"));
}

#[test]
fn library_key_joins_segments() {
    assert_eq!(library_key("dart", "io"), "dart.library.io");
    assert_eq!(library_key(" dart ", " ui"), "dart.library.ui");
}

#[test]
fn sorted_entries_are_ordered_by_key() {
    let env = Environment::from_pairs([("b.x", "1"), ("a.x", "2")]);
    assert_eq!(env.sorted_entries(), vec![("a.x", "2"), ("b.x", "1")]);
}

#[test]
fn dotted_name_parsing() {
    let name = DottedName::parse("  dart .library.  io ");
    assert_eq!(name.segments(), ["dart", "library", "io"]);
    assert_eq!(name.to_string(), "dart.library.io");
    assert!(DottedName::parse("   ").is_empty());
    assert_eq!(
        DottedName::from_segments(["a", " b "]),
        DottedName::parse("a.b")
    );
}
