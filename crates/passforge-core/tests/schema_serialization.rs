use chrono::NaiveDate;
use passforge_core::{FieldSchema, FieldsSchema};
use serde_json::json;

#[test]
fn parses_camel_case_field_format() {
    let raw = json!([
        {"name": "age", "schema": {"type": "number", "min": 18, "max": 65, "exclude_values": [30, 40]}},
        {"name": "role", "schema": {"type": "enum", "enum": ["admin", "manager", "user"], "exclude_values": ["user"]}},
        {"name": "joinDate", "schema": {
            "type": "date",
            "startDate": "2023-01-01T00:00:00",
            "endDate": "2023-01-10T00:00:00",
            "exclude_values": ["2023-01-05T00:00:00"]
        }},
        {"name": "interests", "schema": {"type": "array", "itemSchema": {"type": "string"}}},
        {"name": "userType", "schema": {"type": "oneOf", "oneOf": [
            {"type": "string", "exclude_values": ["guest"]},
            {"type": "enum", "enum": ["user", "admin"]}
        ]}}
    ]);

    let schema: FieldsSchema = serde_json::from_value(raw).expect("parse fields schema");

    assert_eq!(schema.len(), 5);
    assert_eq!(
        schema.get("age"),
        Some(&FieldSchema::Number {
            min: Some(18),
            max: Some(65),
            exclude_values: vec![30, 40],
        })
    );

    let excluded = NaiveDate::from_ymd_opt(2023, 1, 5)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date");
    match schema.get("joinDate") {
        Some(FieldSchema::Date { exclude_values, .. }) => {
            assert_eq!(exclude_values, &vec![excluded]);
        }
        other => panic!("unexpected joinDate schema: {other:?}"),
    }
    assert!(matches!(
        schema.get("userType"),
        Some(FieldSchema::OneOf { schemas, .. }) if schemas.len() == 2
    ));
}

#[test]
fn serializes_schema_deterministically() {
    let schema = FieldsSchema::new()
        .with_field("passwordLength", FieldSchema::number(6, 8))
        .with_field("symbols", FieldSchema::fixed_boolean(true));

    let json = serde_json::to_string_pretty(&schema).expect("serialize schema");
    let expected = r#"[
  {
    "name": "passwordLength",
    "schema": {
      "type": "number",
      "min": 6,
      "max": 8
    }
  },
  {
    "name": "symbols",
    "schema": {
      "type": "boolean",
      "exclude_values": [
        false
      ]
    }
  }
]"#;
    assert_eq!(json, expected);
}

#[test]
fn with_field_replaces_existing_name() {
    let schema = FieldsSchema::new()
        .with_field("flag", FieldSchema::boolean())
        .with_field("flag", FieldSchema::fixed_boolean(false));

    assert_eq!(schema.len(), 1);
    assert_eq!(schema.get("flag"), Some(&FieldSchema::fixed_boolean(false)));
}
