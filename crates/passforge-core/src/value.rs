use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Concrete value a field may take after expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDateTime),
    /// Enum/custom entries that are not a bool, integer or string.
    Json(Value),
    /// Resolved nested object (Object/Array fields).
    Object(GeneratedObject),
}

impl FieldValue {
    /// Map a JSON value onto the narrowest matching variant.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(value) => FieldValue::Bool(value),
            Value::String(value) => FieldValue::Text(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => FieldValue::Int(value),
                None => FieldValue::Json(Value::Number(number)),
            },
            other => FieldValue::Json(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(value) => Value::Bool(*value),
            FieldValue::Int(value) => Value::from(*value),
            FieldValue::Text(value) => Value::String(value.clone()),
            FieldValue::Date(value) => Value::String(format_date(value)),
            FieldValue::Json(value) => value.clone(),
            FieldValue::Object(object) => object.to_json(),
        }
    }

    /// Compact JSON form; equal values always share it.
    pub fn canonical(&self) -> String {
        self.to_json().to_string()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&GeneratedObject> {
        match self {
            FieldValue::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Date(value) => f.write_str(&format_date(value)),
            FieldValue::Json(value) => write!(f, "{value}"),
            FieldValue::Object(object) => write!(f, "{}", object.to_json()),
        }
    }
}

fn format_date(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// One concrete assignment of values to field names, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedObject {
    entries: Vec<(String, FieldValue)>,
}

impl GeneratedObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json());
        }
        Value::Object(map)
    }

    /// Canonical identity of the assignment: the ordered value tuple as JSON.
    pub fn canonical_key(&self) -> String {
        Value::Array(self.entries.iter().map(|(_, value)| value.to_json()).collect()).to_string()
    }
}

impl FromIterator<(String, FieldValue)> for GeneratedObject {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut object = GeneratedObject::new();
        for (name, value) in iter {
            object.insert(name, value);
        }
        object
    }
}

impl Serialize for GeneratedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_picks_narrowest_variant() {
        assert_eq!(FieldValue::from_json(json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from_json(json!(100)), FieldValue::Int(100));
        assert_eq!(
            FieldValue::from_json(json!("admin")),
            FieldValue::Text("admin".to_string())
        );
        assert_eq!(
            FieldValue::from_json(json!(1.5)),
            FieldValue::Json(json!(1.5))
        );
    }

    #[test]
    fn canonical_key_ignores_names_but_keeps_order() {
        let a = GeneratedObject::new()
            .with("a", FieldValue::Int(1))
            .with("b", FieldValue::Text("x".to_string()));
        let b = GeneratedObject::new()
            .with("a", FieldValue::Int(1))
            .with("b", FieldValue::Text("x".to_string()));
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(a.canonical_key(), r#"[1,"x"]"#);
    }

    #[test]
    fn serializes_in_field_order() {
        let object = GeneratedObject::new()
            .with("zeta", FieldValue::Bool(false))
            .with("alpha", FieldValue::Int(7));
        let json = serde_json::to_string(&object).expect("serialize object");
        assert_eq!(json, r#"{"zeta":false,"alpha":7}"#);
    }
}
