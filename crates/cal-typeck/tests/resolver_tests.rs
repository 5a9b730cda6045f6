//! End-to-end resolver tests: source text through the parser into
//! semantic types.

use cal_parser::ast::VariableDecl;
use cal_typeck::{
    are_types_equal, is_assignment_compatible, resolve_type, resolve_variable_type, type_to_string,
    ResolveOptions, SemanticType, TypeDisplayOptions,
};

/// Parse a codeunit whose CODE section declares the given variables and
/// return them.
fn parse_variables(var_block: &str) -> Vec<VariableDecl> {
    let source = format!("OBJECT Codeunit 50000 T {{ CODE {{ VAR {var_block} BEGIN END. }} }}");
    let result = cal_parser::parse(&source);
    assert!(
        result.ok(),
        "variable block should parse clean, got {:?}",
        result.errors
    );
    let object = result.document.object.expect("object");
    object.code.expect("code section").variables
}

fn resolve_one(var_block: &str) -> SemanticType {
    let vars = parse_variables(var_block);
    assert_eq!(vars.len(), 1, "expected a single declaration");
    resolve_variable_type(&vars[0], &ResolveOptions::default())
}

#[test]
fn compound_lexemes_through_the_parser() {
    assert_eq!(resolve_one("A@1 : Text50;"), SemanticType::text(Some(50)));
    assert_eq!(resolve_one("A@1 : Code20;"), SemanticType::code(Some(20)));
    assert_eq!(
        resolve_one("A@1 : Text[100];"),
        SemanticType::text(Some(100))
    );
    assert_eq!(resolve_one("A@1 : Code[10];"), SemanticType::code(Some(10)));
    assert_eq!(resolve_one("A@1 : Decimal5;"), SemanticType::decimal());
}

#[test]
fn resolution_is_case_insensitive() {
    assert_eq!(resolve_one("A@1 : tExT50;"), SemanticType::text(Some(50)));
    assert_eq!(resolve_one("A@1 : INTEGER;"), SemanticType::integer());
    assert_eq!(
        resolve_one("A@1 : record 18;"),
        SemanticType::record(Some(18), false)
    );
    assert_eq!(
        resolve_one("A@1 : CODEUNIT 80;"),
        SemanticType::codeunit(Some(80))
    );
}

#[test]
fn record_and_codeunit_ids_flow_through() {
    assert_eq!(
        resolve_one("Customer@1 : Record 18;"),
        SemanticType::record(Some(18), false)
    );
    assert_eq!(
        resolve_one("Mgt@1 : Codeunit 80;"),
        SemanticType::codeunit(Some(80))
    );
}

#[test]
fn temporary_marker_flows_from_declaration() {
    let vars = parse_variables("Buffer@1 : TEMPORARY Record 18;");
    assert!(vars[0].is_temporary);
    assert_eq!(
        resolve_variable_type(&vars[0], &ResolveOptions::default()),
        SemanticType::record(Some(18), true)
    );
    // An explicit option overrides the declaration.
    let opts = ResolveOptions {
        is_temporary: Some(false),
        default_temporary: false,
    };
    assert_eq!(
        resolve_variable_type(&vars[0], &opts),
        SemanticType::record(Some(18), false)
    );
}

#[test]
fn temporary_is_ignored_for_non_records() {
    let opts = ResolveOptions {
        is_temporary: Some(true),
        default_temporary: false,
    };
    let vars = parse_variables("A@1 : Integer;");
    assert_eq!(
        resolve_variable_type(&vars[0], &opts),
        SemanticType::integer()
    );
}

#[test]
fn option_values_are_trimmed_and_filtered() {
    let ty = resolve_one("Status@1 : Option Open, Released ,,Closed;");
    assert_eq!(
        ty,
        SemanticType::option(vec![
            "Open".into(),
            "Released".into(),
            "Closed".into()
        ])
    );
}

#[test]
fn bare_option_has_no_values() {
    assert_eq!(resolve_one("Status@1 : Option;"), SemanticType::option(vec![]));
}

#[test]
fn arrays_resolve_to_placeholder_element() {
    let ty = resolve_one("Buckets@1 : ARRAY [10] OF Integer;");
    match ty {
        SemanticType::Array {
            element_type,
            dimensions,
        } => {
            assert!(matches!(*element_type, SemanticType::Unknown { .. }));
            assert!(dimensions.is_empty());
        }
        other => panic!("expected Array, got {other:?}"),
    }
}

#[test]
fn array_dimensions_stay_on_the_data_type() {
    let vars = parse_variables("Grid@1 : ARRAY [3,4] OF Decimal;");
    assert_eq!(vars[0].dimensions, Some(vec![3, 4]));
    assert_eq!(vars[0].data_type.type_name, "ARRAY [3,4] OF Decimal");
}

#[test]
fn unknown_reason_names_the_type() {
    let ty = resolve_one("H@1 : TextConst;");
    assert_eq!(
        ty,
        SemanticType::unknown("Unrecognized type: TextConst")
    );
}

#[test]
fn every_primitive_resolves() {
    for (decl, name) in [
        ("A@1 : Integer;", "Integer"),
        ("A@1 : Decimal;", "Decimal"),
        ("A@1 : Boolean;", "Boolean"),
        ("A@1 : Date;", "Date"),
        ("A@1 : Time;", "Time"),
        ("A@1 : DateTime;", "DateTime"),
        ("A@1 : Char;", "Char"),
        ("A@1 : Byte;", "Byte"),
        ("A@1 : GUID;", "GUID"),
        ("A@1 : Duration;", "Duration"),
        ("A@1 : BigInteger;", "BigInteger"),
    ] {
        assert_eq!(resolve_one(decl), SemanticType::primitive(name), "{decl}");
    }
}

#[test]
fn resolve_type_accepts_hand_built_data_types() {
    let vars = parse_variables("A@1 : Text;");
    let ty = resolve_type(&vars[0].data_type, &ResolveOptions::default());
    assert_eq!(ty, SemanticType::text(None));
}

// ── Display formatting ─────────────────────────────────────────────────

#[test]
fn display_strings_for_hovers() {
    let opts = TypeDisplayOptions::default();
    insta::assert_snapshot!(
        type_to_string(&resolve_one("A@1 : Text50;"), &opts),
        @"Text[50]"
    );
    insta::assert_snapshot!(
        type_to_string(&resolve_one("A@1 : Record 18;"), &opts),
        @"Record 18"
    );
    insta::assert_snapshot!(
        type_to_string(&resolve_one("A@1 : Codeunit 80;"), &opts),
        @"Codeunit 80"
    );
    insta::assert_snapshot!(
        type_to_string(&resolve_one("A@1 : TextConst;"), &opts),
        @"Unknown"
    );
}

#[test]
fn verbose_display_includes_reasons() {
    let opts = TypeDisplayOptions {
        verbose: true,
        max_option_values: 3,
    };
    insta::assert_snapshot!(
        type_to_string(&resolve_one("A@1 : TextConst;"), &opts),
        @"Unknown (Unrecognized type: TextConst)"
    );
}

// ── Equality and compatibility over resolved types ─────────────────────

#[test]
fn resolved_types_compare_structurally() {
    let a = resolve_one("A@1 : Text50;");
    let b = resolve_one("B@2 : Text[50];");
    assert!(are_types_equal(&a, &b));
    let c = resolve_one("C@3 : Code50;");
    assert!(!are_types_equal(&a, &c));
}

#[test]
fn widening_assignment_through_resolution() {
    let int = resolve_one("A@1 : Integer;");
    let dec = resolve_one("B@2 : Decimal;");
    assert!(is_assignment_compatible(&int, &dec));
    assert!(!is_assignment_compatible(&dec, &int));
}
