use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{FieldSchema, FieldsSchema};

/// Validate structural consistency of a field schema tree.
///
/// This checks:
/// - field names are non-empty
/// - field names are unique within each level
/// - `oneOf`/`allOf`/`anyOf` list at least one schema
///
/// Nested `object`, `array` and composite variants are checked recursively.
pub fn validate_fields_schema(schema: &FieldsSchema) -> Result<()> {
    validate_level(schema, "")
}

fn validate_level(schema: &FieldsSchema, prefix: &str) -> Result<()> {
    let mut seen = BTreeSet::new();

    for field in schema.fields() {
        if field.name.trim().is_empty() {
            return Err(Error::InvalidSchema(format!(
                "empty field name under '{}'",
                display_prefix(prefix)
            )));
        }

        let path = join_path(prefix, &field.name);
        if !seen.insert(field.name.as_str()) {
            return Err(Error::InvalidSchema(format!("duplicate field name: {path}")));
        }

        validate_field(&field.schema, &path)?;
    }

    Ok(())
}

fn validate_field(schema: &FieldSchema, path: &str) -> Result<()> {
    match schema {
        FieldSchema::Object { properties, .. } => validate_level(properties, path),
        FieldSchema::Array { item, .. } => validate_field(item, &join_path(path, "item")),
        FieldSchema::OneOf { schemas, .. }
        | FieldSchema::AllOf { schemas, .. }
        | FieldSchema::AnyOf { schemas, .. } => {
            if schemas.is_empty() {
                return Err(Error::InvalidSchema(format!(
                    "empty {} list at {path}",
                    schema.variant_name()
                )));
            }
            for sub in schemas {
                validate_field(sub, path)?;
            }
            Ok(())
        }
        FieldSchema::String { .. }
        | FieldSchema::Number { .. }
        | FieldSchema::Boolean { .. }
        | FieldSchema::Enum { .. }
        | FieldSchema::Date { .. }
        | FieldSchema::Custom { .. } => Ok(()),
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() { "<root>" } else { prefix }
}
