//! Object header, section dispatch, and table-section tests.

use cal_parser::ast::{ObjectKind, StatementKind};
use cal_parser::parse;

#[test]
fn minimal_object_header() {
    let result = parse("OBJECT Codeunit 50000 T { }");
    assert!(result.ok(), "{:?}", result.errors);
    let object = result.document.object.expect("object");
    assert_eq!(object.kind, ObjectKind::Codeunit);
    assert_eq!(object.id, 50000);
    assert_eq!(object.name, "T");
}

#[test]
fn object_kind_is_case_insensitive() {
    for (source, kind) in [
        ("OBJECT table 18 T { }", ObjectKind::Table),
        ("OBJECT PAGE 21 T { }", ObjectKind::Page),
        ("OBJECT Report 111 T { }", ObjectKind::Report),
        ("OBJECT xmlport 50000 T { }", ObjectKind::XmlPort),
        ("OBJECT QUERY 50000 T { }", ObjectKind::Query),
    ] {
        let result = parse(source);
        assert_eq!(result.document.object.expect("object").kind, kind, "{source}");
    }
}

#[test]
fn multi_word_object_name_is_rejoined() {
    let result = parse("OBJECT Table 36 Sales Header { }");
    let object = result.document.object.expect("object");
    assert_eq!(object.name, "Sales Header");
}

#[test]
fn quoted_object_name_keeps_inner_text() {
    let result = parse("OBJECT Table 36 \"Sales Header\" { }");
    let object = result.document.object.expect("object");
    assert_eq!(object.name, "Sales Header");
}

#[test]
fn missing_object_id_synthesizes_zero() {
    let result = parse("OBJECT Table Customer { }");
    let object = result.document.object.expect("object");
    assert_eq!(object.id, 0);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message.contains("Expected object ID")),
        "{:?}",
        result.errors
    );
}

#[test]
fn empty_input_has_no_object() {
    let result = parse("");
    assert!(result.document.object.is_none());
    assert!(result.ok());
}

// ── FIELDS ─────────────────────────────────────────────────────────────

#[test]
fn fields_section_parses_rows() {
    let source = "OBJECT Table 18 Customer {
  FIELDS
  {
    { 1 ; ;No. ;Code20 }
    { 2 ; ;Name ;Text50 }
    { 3 ; ;Balance ;Decimal }
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let object = result.document.object.expect("object");
    let fields = object.fields.expect("fields");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].id, 1);
    assert_eq!(fields[0].name, "No.");
    assert_eq!(fields[0].data_type.type_name, "Code20");
    assert_eq!(fields[1].name, "Name");
    assert_eq!(fields[2].data_type.type_name, "Decimal");
}

#[test]
fn field_with_properties_and_trigger() {
    let source = "OBJECT Table 18 Customer {
  FIELDS
  {
    { 1 ; ;Name ;Text50 ;CaptionML=[ENU=Name;ESP=Nombre];
                         OnValidate=BEGIN
                                      UpdateSearchName;
                                    END;
                          }
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let object = result.document.object.expect("object");
    let fields = object.fields.expect("fields");
    let props = fields[0].properties.as_ref().expect("properties");
    assert_eq!(props.get("CaptionML"), Some("[ENU=Name;ESP=Nombre]"));
    assert_eq!(fields[0].triggers().len(), 1);
    assert_eq!(fields[0].triggers()[0].name, "OnValidate");
    assert_eq!(fields[0].triggers()[0].body.len(), 1);
}

#[test]
fn unclosed_fields_section_at_eof() {
    // Scenario: truncated export. The document still carries the object
    // and the parsed fields, with the pinned close diagnostic.
    let source = "OBJECT Table 18 Customer { FIELDS { {1; ;No.;Code20} {2; ;Name;Text50}";
    let result = parse(source);
    let object = result.document.object.expect("object");
    assert_eq!(object.kind, ObjectKind::Table);
    assert_eq!(object.id, 18);
    let fields = object.fields.expect("fields");
    assert!(!fields.is_empty());
    assert_eq!(fields[0].name, "No.");
    let close_errors = result
        .errors
        .iter()
        .filter(|e| e.message == "Expected } to close FIELDS section")
        .count();
    assert_eq!(close_errors, 1, "{:?}", result.errors);
}

#[test]
fn field_number_mismatch_is_sanitized() {
    let source = "OBJECT Table 18 T { FIELDS { {NotANumber; ;X;Integer} { 2 ; ;Y ;Integer } } }";
    let result = parse(source);
    let error = result
        .errors
        .iter()
        .find(|e| e.message.contains("Expected field number"))
        .expect("field number diagnostic");
    assert!(
        !error.message.contains("NotANumber"),
        "raw token leaked: {}",
        error.message
    );
    // The malformed entry is dropped; the next one survives recovery.
    let fields = result.document.object.unwrap().fields.unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "Y");
}

#[test]
fn empty_field_name_is_an_error() {
    let source = "OBJECT Table 18 T { FIELDS { {1; ;;Integer} } }";
    let result = parse(source);
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message == "Field name cannot be empty (in FIELDS section)"),
        "{:?}",
        result.errors
    );
}

// ── KEYS / FIELDGROUPS ─────────────────────────────────────────────────

#[test]
fn keys_section_field_lists() {
    let source = "OBJECT Table 18 Customer {
  KEYS
  {
    {    ;No.                      ;Clustered=Yes }
    {    ;Name,City                 }
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let keys = result.document.object.unwrap().keys.expect("keys");
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].fields, vec!["No."]);
    assert_eq!(
        keys[0].properties.as_ref().unwrap().get("Clustered"),
        Some("Yes")
    );
    assert_eq!(keys[1].fields, vec!["Name", "City"]);
}

#[test]
fn field_groups_section() {
    let source = "OBJECT Table 18 Customer {
  FIELDGROUPS
  {
    { 1 ;DropDown ;No.,Name,City }
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let groups = result.document.object.unwrap().field_groups.expect("groups");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, 1);
    assert_eq!(groups[0].name, "DropDown");
    assert_eq!(groups[0].fields, vec!["No.", "Name", "City"]);
}

// ── PROPERTIES ─────────────────────────────────────────────────────────

#[test]
fn object_properties_section() {
    let source = "OBJECT Codeunit 50000 T {
  OBJECT-PROPERTIES
  {
    Date=09-09-14;
    Time=12:00:00;
    Version List=NAVW18.00;
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let props = result
        .document
        .object
        .unwrap()
        .object_properties
        .expect("object properties");
    assert_eq!(props.get("Date"), Some("09-09-14"));
    assert_eq!(props.get("Time"), Some("12:00:00"));
    assert_eq!(props.get("Version List"), Some("NAVW18.00"));
}

#[test]
fn property_trigger_in_properties_section() {
    let source = "OBJECT Table 18 T {
  PROPERTIES
  {
    CaptionML=ENU=Customer;
    OnInsert=BEGIN
               InitRecord;
             END;
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let props = result.document.object.unwrap().properties.expect("properties");
    assert_eq!(props.get("CaptionML"), Some("ENU=Customer"));
    assert_eq!(props.triggers.len(), 1);
    assert_eq!(props.triggers[0].name, "OnInsert");
    assert!(matches!(
        props.triggers[0].body[0].kind,
        StatementKind::Expr { .. }
    ));
}

#[test]
fn property_trigger_with_local_vars() {
    let source = "OBJECT Table 18 T {
  PROPERTIES
  {
    OnDelete=VAR
               Entry@1 : Record 21;
             BEGIN
               Entry.DELETEALL;
             END;
  }
}";
    let result = parse(source);
    assert!(result.ok(), "{:?}", result.errors);
    let props = result.document.object.unwrap().properties.expect("properties");
    assert_eq!(props.triggers[0].variables.len(), 1);
    assert_eq!(props.triggers[0].variables[0].name, "Entry");
    assert_eq!(
        props.triggers[0].variables[0].data_type.type_name,
        "Record 21"
    );
}

// ── Section/kind compatibility ─────────────────────────────────────────

#[test]
fn fields_in_codeunit_is_reported_and_skipped() {
    let source = "OBJECT Codeunit 50000 T { FIELDS { {1; ;X;Integer} } CODE { BEGIN END. } }";
    let result = parse(source);
    let object = result.document.object.expect("object");
    assert!(object.fields.is_none(), "FIELDS must not populate a Codeunit");
    assert!(object.code.is_some(), "CODE after the bad section still parses");
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message.contains("FIELDS section is not valid")),
        "{:?}",
        result.errors
    );
}

#[test]
fn query_elements_are_never_populated() {
    let source = "OBJECT Query 50000 Q { ELEMENTS { {  ;0;Top;DataItem;Customer} } }";
    let result = parse(source);
    let object = result.document.object.expect("object");
    assert!(object.elements.is_none());
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message.contains("ELEMENTS section is not valid")),
        "{:?}",
        result.errors
    );
}

#[test]
fn unknown_section_is_reported_and_skipped() {
    let source = "OBJECT Report 111 T { DATASET { junk here } CODE { BEGIN END. } }";
    let result = parse(source);
    let object = result.document.object.expect("object");
    assert!(object.code.is_some());
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.message.contains("Unknown section")),
        "{:?}",
        result.errors
    );
}

// ── Well-formedness invariants ─────────────────────────────────────────

#[test]
fn node_ranges_are_ordered_even_on_garbage() {
    for source in [
        "OBJECT Table 18 Customer { FIELDS { {1; ;No.;Code20}",
        "OBJECT Page 1 P { CONTROLS { {1;0;Container} }",
        "OBJECT Codeunit 1 C { CODE { VAR IF@1 : Integer; BEGIN END. } }",
        "}{;;",
        "OBJECT",
    ] {
        let result = parse(source);
        let doc = &result.document;
        assert!(doc.start.span.start <= doc.end.span.start, "{source}");
        if let Some(object) = &doc.object {
            assert!(object.start.span.start <= object.end.span.start, "{source}");
        }
    }
}
