use passforge_core::FieldsSchema;
use schemars::schema_for;

#[test]
fn json_schema_lists_every_variant_tag() {
    let generated = schema_for!(FieldsSchema);
    let json = serde_json::to_string(&generated).expect("serialize generated schema");

    for tag in [
        "string", "number", "boolean", "enum", "date", "custom", "object", "array", "oneOf",
        "allOf", "anyOf",
    ] {
        assert!(
            json.contains(&format!("\"{tag}\"")),
            "json schema is missing variant tag {tag}"
        );
    }
}
