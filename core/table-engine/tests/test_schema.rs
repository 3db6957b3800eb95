//! FILENAME: core/table-engine/tests/test_schema.rs
//! PURPOSE: Tests for schema inference and column behaviors on loaded data.

mod common;

use common::{people, TestHarness};
use table_engine::{
    ColumnRegistry, Dataset, EngineConfig, FilterKind, Record, SchemaInferencer, SemanticType, Shape, Value,
};

// ============================================================================
// INFERENCE
// ============================================================================

#[test]
fn test_basic_record_types() {
    let sample = Record::new()
        .with("id", 1i64)
        .with("name", "Ann")
        .with("age", 30i64)
        .with("active", true)
        .with("joined", "2024-01-01");

    let columns = SchemaInferencer::new().infer(&sample);
    let summary: Vec<(&str, SemanticType)> = columns.iter().map(|c| (c.field.as_str(), c.semantic_type)).collect();

    assert_eq!(
        summary,
        vec![
            ("id", SemanticType::Number),
            ("name", SemanticType::Text),
            ("age", SemanticType::Number),
            ("active", SemanticType::Boolean),
            ("joined", SemanticType::Date),
        ]
    );
}

#[test]
fn test_fixture_columns() {
    let harness = TestHarness::with_sample_data();
    let columns = harness.engine.columns();

    let names: Vec<&str> = columns.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["Id", "Name", "Age", "IsActive", "Joined", "Balance", "Email", "Score"]);

    let email = harness.engine.column("email").unwrap();
    assert_eq!(email.semantic_type, SemanticType::Text);
    assert_eq!(email.filter, FilterKind::Text);

    let active = harness.engine.column("isActive").unwrap();
    assert_eq!(active.filter, FilterKind::None);
    assert_eq!(active.size_hint, 6);

    assert!(!harness.engine.column("id").unwrap().editable);
}

#[test]
fn test_same_shape_same_columns() {
    let dataset = people();
    let first = SchemaInferencer::new().infer(&dataset.records()[0]);
    let second = SchemaInferencer::new().infer(&dataset.records()[1]);

    assert_eq!(Shape::of(&dataset.records()[0]), Shape::of(&dataset.records()[1]));
    assert_eq!(first, second);
}

#[test]
fn test_empty_dataset_has_no_columns() {
    let mut harness = TestHarness::new();
    harness.engine.load(Dataset::from_json_str("[]").unwrap()).unwrap();
    assert!(harness.engine.columns().is_empty());
    assert!(harness.engine.view().groups.is_empty());
}

#[test]
fn test_unrecognized_shapes_pass_through() {
    let json = r#"[{"id": "a1", "tags": ["x", "y"], "meta": {"k": 1}, "note": null}]"#;
    let mut harness = TestHarness::new();
    harness.engine.load(Dataset::from_json_str(json).unwrap()).unwrap();
    harness.engine.expand_all();

    let types: Vec<SemanticType> = harness.engine.columns().iter().map(|c| c.semantic_type).collect();
    assert_eq!(
        types,
        vec![SemanticType::Text, SemanticType::Unknown, SemanticType::Unknown, SemanticType::Unknown]
    );

    let view = harness.engine.view();
    assert_eq!(view.groups[0].rows[0].cells, vec!["a1", r#"["x","y"]"#, r#"{"k":1}"#, ""]);
}

#[test]
fn test_key_field_falls_back_to_first_field() {
    let json = r#"[{"code": "A", "qty": 1}, {"code": "B", "qty": 2}]"#;
    let mut harness = TestHarness::new();
    harness.engine.load(Dataset::from_json_str(json).unwrap()).unwrap();

    assert_eq!(harness.engine.key_field(), "code");
    assert!(!harness.engine.column("code").unwrap().editable);
}

#[test]
fn test_configured_key_field() {
    let config = EngineConfig::from_json_str(r#"{"keyField": "email"}"#).unwrap();
    let mut harness = TestHarness::with_config(config);
    harness.engine.load(people()).unwrap();

    assert_eq!(harness.engine.key_field(), "email");
    assert!(harness.engine.column("id").unwrap().editable);
    assert!(!harness.engine.column("email").unwrap().editable);
}

// ============================================================================
// BEHAVIORS
// ============================================================================

#[test]
fn test_number_grouping() {
    let registry = ColumnRegistry::default();
    let number = registry.resolve(SemanticType::Number);
    assert_eq!(number.format(&Value::number(1234567.891)), "1,234,567.891");
    assert_eq!(number.format(&Value::number(42.0)), "42");
}

#[test]
fn test_formatted_fixture_row() {
    let mut harness = TestHarness::with_formatted_columns();
    harness.engine.expand_all();
    let view = harness.engine.view();

    let today = view.group("Today").unwrap();
    assert_eq!(
        today.rows[0].cells,
        vec!["1", "Alice", "30", "\u{2714}", "5/15/2024", "$1,234.50", "alice@example.com", "0.88"]
    );

    let bob = &view.group("This Week").unwrap().rows[0];
    assert_eq!(bob.cells[5], "($20.00)");
}

#[test]
fn test_custom_glyphs_and_locale() {
    let json = r#"{
        "checkedGlyph": "yes",
        "uncheckedGlyph": "no",
        "locale": {"thousandsSeparator": ".", "decimalSeparator": ","}
    }"#;
    let config = EngineConfig::from_json_str(json).unwrap();
    let registry = ColumnRegistry::new(&config);

    assert_eq!(registry.resolve(SemanticType::Boolean).format(&Value::Bool(false)), "no");
    assert_eq!(registry.resolve(SemanticType::Number).format(&Value::number(1234.5)), "1.234,5");
}
