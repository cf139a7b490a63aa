use super::*;
use cfgimport_model::{ClassBuilder, ConstValue, LibraryBuilder};

const CORE: &str = "dart:core";

fn int() -> Type {
    Type::named(CORE, "int")
}

fn double() -> Type {
    Type::named(CORE, "double")
}

fn list(arg: Type) -> Type {
    Type::generic(DeclRef::new(CORE, "List"), vec![arg])
}

/// Two libraries declaring `Point` and `Size` with the given `Point.x` types.
fn program(point_x_a: Type, point_x_b: Type) -> Program {
    let a = LibraryBuilder::new("a.dart")
        .class(ClassBuilder::new("Point").field("x", point_x_a, true))
        .class(ClassBuilder::new("Size"))
        .build();
    let b = LibraryBuilder::new("b.dart")
        .class(ClassBuilder::new("Point").field("x", point_x_b, true))
        .class(ClassBuilder::new("Extent"))
        .build();
    Program::new().with_library(a).with_library(b)
}

fn namespaces(program: &Program) -> (Namespace, Namespace) {
    (
        program.namespace("a.dart").expect("a.dart"),
        program.namespace("b.dart").expect("b.dart"),
    )
}

fn comparator<'a>(
    program: &'a Program,
    a: &'a Namespace,
    b: &'a Namespace,
    phase: Phase,
) -> Comparator<'a> {
    Comparator::new(program, a, b, phase, CheckOptions::default())
}

#[test]
fn void_matches_only_void() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    assert_eq!(cmp.check_types(&Type::Void, &Type::Void), Ok(()));
    assert_eq!(
        cmp.check_types(&Type::Void, &int()),
        Err(FailureReason::TypeIncompatible {
            interface: "void".into(),
            candidate: "int".into(),
        })
    );
}

#[test]
fn type_arguments_are_compared_pairwise() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    assert!(cmp.check_types(&list(int()), &list(int())).is_ok());
    assert_eq!(
        cmp.check_types(&list(int()), &list(double())),
        Err(FailureReason::TypeIncompatible {
            interface: "List<int>".into(),
            candidate: "List<double>".into(),
        })
    );
    let raw = Type::named(CORE, "List");
    assert!(cmp.check_types(&list(int()), &raw).is_err());
}

#[test]
fn type_parameters_compare_by_position() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    // Names are for display; position decides.
    assert!(cmp.check_types(&Type::param(0, "T"), &Type::param(0, "E")).is_ok());
    assert!(cmp.check_types(&Type::param(0, "T"), &Type::param(1, "T")).is_err());
    assert!(cmp.check_types(&Type::param(0, "T"), &int()).is_err());
}

#[test]
fn function_types_compare_return_then_parameters() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let f = Type::function(int(), ParamList::new().required(int()));
    let g = Type::function(double(), ParamList::new().required(int()));
    let h = Type::function(int(), ParamList::new().required(double()));

    assert!(cmp.check_types(&f, &f.clone()).is_ok());
    assert!(matches!(
        cmp.check_types(&f, &g),
        Err(FailureReason::TypeIncompatible { .. })
    ));
    assert!(matches!(
        cmp.check_types(&f, &h),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::Required { index: 0, .. }
        })
    ));
}

#[test]
fn parameter_counts_must_match() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let one = ParamList::new().required(int());
    let two = ParamList::new().required(int()).required(int());
    assert_eq!(
        cmp.check_params(&one, &two),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::RequiredCount {
                interface: 1,
                candidate: 2,
            }
        })
    );

    let optional = ParamList::new().required(int()).optional(int());
    assert_eq!(
        cmp.check_params(&optional, &one),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::OptionalCount {
                interface: 1,
                candidate: 0,
            }
        })
    );

    // A required parameter is not interchangeable with an optional one.
    let required = ParamList::new().required(int());
    let optional_only = ParamList::new().optional(int());
    assert!(cmp.check_params(&required, &optional_only).is_err());
}

#[test]
fn named_parameters_must_match_by_name() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let radix = ParamList::new().named("radix", int(), None);
    let base = ParamList::new().named("base", int(), None);

    assert_eq!(
        cmp.check_params(&radix, &ParamList::new()),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::NamedMissing {
                name: "radix".into(),
                missing_from: Side::Candidate,
            }
        })
    );
    assert_eq!(
        cmp.check_params(&ParamList::new(), &radix),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::NamedMissing {
                name: "radix".into(),
                missing_from: Side::Interface,
            }
        })
    );
    assert!(cmp.check_params(&radix, &base).is_err());

    // Declaration order of named parameters is irrelevant.
    let xy = ParamList::new().named("x", int(), None).named("y", double(), None);
    let yx = ParamList::new().named("y", double(), None).named("x", int(), None);
    assert!(cmp.check_params(&xy, &yx).is_ok());
}

#[test]
fn named_parameter_defaults_must_be_identical() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let ten = ParamList::new().named("radix", int(), Some(ConstValue::Int(10)));
    let sixteen = ParamList::new().named("radix", int(), Some(ConstValue::Int(16)));
    let none = ParamList::new().named("radix", int(), None);

    assert!(cmp.check_params(&ten, &ten.clone()).is_ok());
    assert_eq!(
        cmp.check_params(&ten, &sixteen),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::NamedDefault {
                name: "radix".into(),
                interface: Some("10".into()),
                candidate: Some("16".into()),
            }
        })
    );
    assert!(matches!(
        cmp.check_params(&ten, &none),
        Err(FailureReason::ParameterListIncompatible {
            detail: ParameterMismatch::NamedDefault { candidate: None, .. }
        })
    ));

    // Same type and same value, but not the same constant.
    let int_zero = ParamList::new().named("x", double(), Some(ConstValue::Int(0)));
    let double_zero = ParamList::new().named("x", double(), Some(ConstValue::Double(0.0)));
    assert!(cmp.check_params(&int_zero, &double_zero).is_err());

    let nan = ParamList::new().named("x", double(), Some(ConstValue::Double(f64::NAN)));
    assert!(cmp.check_params(&nan, &nan.clone()).is_ok());
}

#[test]
fn type_parameter_lists_compare_in_lockstep() {
    let program = Program::new();
    let (a, b) = (Namespace::from_members("a", []), Namespace::from_members("b", []));
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let t = [TypeParam::new("T")];
    let u = [TypeParam::new("U")];
    let t_num = [TypeParam::bounded("T", Type::named(CORE, "num"))];
    let t_int = [TypeParam::bounded("T", int())];

    // Names do not matter, only positions and bounds.
    assert!(cmp.check_type_params(&t, &u).is_ok());
    assert_eq!(
        cmp.check_type_params(&t, &[]),
        Err(FailureReason::TypeParameterListIncompatible {
            detail: TypeParameterMismatch::Count {
                interface: 1,
                candidate: 0,
            }
        })
    );
    assert_eq!(
        cmp.check_type_params(&t, &t_num),
        Err(FailureReason::TypeParameterListIncompatible {
            detail: TypeParameterMismatch::BoundPresence {
                index: 0,
                interface: false,
                candidate: true,
            }
        })
    );
    assert!(matches!(
        cmp.check_type_params(&t_num, &t_int),
        Err(FailureReason::TypeParameterListIncompatible {
            detail: TypeParameterMismatch::Bound { index: 0, .. }
        })
    ));
}

#[test]
fn same_name_declarations_are_compared_structurally() {
    let program = program(int(), int());
    let (a, b) = namespaces(&program);
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let point_a = Type::named("a.dart", "Point");
    let point_b = Type::named("b.dart", "Point");
    assert!(cmp.check_types(&point_a, &point_b).is_ok());

    let pair = (DeclRef::new("a.dart", "Point"), DeclRef::new("b.dart", "Point"));
    assert_eq!(cmp.cached(&pair), Some(true));
    assert_eq!(cmp.stats.pairs_entered, 1);

    // Second query is answered from the table.
    assert!(cmp.check_types(&point_a, &point_b).is_ok());
    assert_eq!(cmp.stats.pairs_entered, 1);
    assert_eq!(cmp.stats.cache_hits, 1);
}

#[test]
fn same_name_declarations_with_different_shapes_fail() {
    let program = program(int(), double());
    let (a, b) = namespaces(&program);
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let result = cmp.check_types(&Type::named("a.dart", "Point"), &Type::named("b.dart", "Point"));
    assert_eq!(
        result,
        Err(FailureReason::TypeIncompatible {
            interface: "Point".into(),
            candidate: "Point".into(),
        })
    );
    let pair = (DeclRef::new("a.dart", "Point"), DeclRef::new("b.dart", "Point"));
    assert_eq!(cmp.cached(&pair), Some(false));
}

#[test]
fn differently_named_declarations_never_match() {
    let program = program(int(), int());
    let (a, b) = namespaces(&program);
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    let size = Type::named("a.dart", "Size");
    let extent = Type::named("b.dart", "Extent");
    assert!(cmp.check_types(&size, &extent).is_err());
    assert_eq!(cmp.stats.pairs_entered, 0);
}

#[test]
fn functions_only_requires_identical_declarations() {
    let program = program(int(), int());
    let (a, b) = namespaces(&program);
    let mut cmp = comparator(&program, &a, &b, Phase::FunctionsOnly);

    assert!(cmp
        .check_types(&Type::named("a.dart", "Point"), &Type::named("b.dart", "Point"))
        .is_err());
    assert!(cmp
        .check_types(&Type::named("a.dart", "Point"), &Type::named("a.dart", "Point"))
        .is_ok());
    assert_eq!(cmp.stats.pairs_entered, 0);
}

#[test]
fn declarations_outside_either_namespace_must_be_identical() {
    let program = program(int(), int());
    let (a, b) = namespaces(&program);
    let mut cmp = comparator(&program, &a, &b, Phase::Full);

    // `Point` from c.dart is not visible in a.dart's namespace.
    let hidden = Type::named("c.dart", "Point");
    assert!(cmp.check_types(&hidden, &Type::named("b.dart", "Point")).is_err());
}
