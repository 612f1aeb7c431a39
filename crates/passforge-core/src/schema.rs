use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declarative description of the values a single field may take.
///
/// Every variant except `Custom` carries an exclusion list that is applied
/// after the default values are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldSchema {
    /// Free text. Populated with the empty string only.
    String {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<String>,
    },
    /// Inclusive integer range. Omitted bounds default to the safe-integer range.
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<i64>,
    },
    /// `true` then `false`.
    Boolean {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<bool>,
    },
    /// Declared values in order.
    Enum {
        #[serde(rename = "enum")]
        values: Vec<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
    /// Daily-stepped instants between `startDate` and `endDate`, inclusive.
    Date {
        #[serde(rename = "startDate")]
        start: NaiveDateTime,
        #[serde(rename = "endDate")]
        end: NaiveDateTime,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<NaiveDateTime>,
    },
    /// Values taken verbatim. Exclusions do not apply here.
    Custom { values: Vec<serde_json::Value> },
    /// Nested fields; the candidates stay nested until resolved.
    Object {
        properties: FieldsSchema,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
    /// Single item schema, expanded as the nested field `item`.
    Array {
        #[serde(rename = "itemSchema")]
        item: Box<FieldSchema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
    /// Concatenation of the flattened sub-expansions, then exclusions.
    OneOf {
        #[serde(rename = "oneOf")]
        schemas: Vec<FieldSchema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
    /// Same concatenation as `OneOf`; the two only differ by tag.
    AllOf {
        #[serde(rename = "allOf")]
        schemas: Vec<FieldSchema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
    /// Accepted by the format but rejected by the schema engine.
    AnyOf {
        #[serde(rename = "anyOf")]
        schemas: Vec<FieldSchema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclude_values: Vec<serde_json::Value>,
    },
}

impl FieldSchema {
    pub fn string() -> Self {
        FieldSchema::String {
            exclude_values: Vec::new(),
        }
    }

    pub fn number(min: i64, max: i64) -> Self {
        FieldSchema::Number {
            min: Some(min),
            max: Some(max),
            exclude_values: Vec::new(),
        }
    }

    pub fn boolean() -> Self {
        FieldSchema::Boolean {
            exclude_values: Vec::new(),
        }
    }

    /// Boolean field pinned to a single value by excluding the other one.
    pub fn fixed_boolean(value: bool) -> Self {
        FieldSchema::Boolean {
            exclude_values: vec![!value],
        }
    }

    pub fn enumeration(values: Vec<serde_json::Value>) -> Self {
        FieldSchema::Enum {
            values,
            exclude_values: Vec::new(),
        }
    }

    pub fn custom(values: Vec<serde_json::Value>) -> Self {
        FieldSchema::Custom { values }
    }

    pub fn object(properties: FieldsSchema) -> Self {
        FieldSchema::Object {
            properties,
            exclude_values: Vec::new(),
        }
    }

    pub fn array(item: FieldSchema) -> Self {
        FieldSchema::Array {
            item: Box::new(item),
            exclude_values: Vec::new(),
        }
    }

    pub fn one_of(schemas: Vec<FieldSchema>) -> Self {
        FieldSchema::OneOf {
            schemas,
            exclude_values: Vec::new(),
        }
    }

    pub fn all_of(schemas: Vec<FieldSchema>) -> Self {
        FieldSchema::AllOf {
            schemas,
            exclude_values: Vec::new(),
        }
    }

    pub fn any_of(schemas: Vec<FieldSchema>) -> Self {
        FieldSchema::AnyOf {
            schemas,
            exclude_values: Vec::new(),
        }
    }

    /// Tag used in serialized documents and error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            FieldSchema::String { .. } => "string",
            FieldSchema::Number { .. } => "number",
            FieldSchema::Boolean { .. } => "boolean",
            FieldSchema::Enum { .. } => "enum",
            FieldSchema::Date { .. } => "date",
            FieldSchema::Custom { .. } => "custom",
            FieldSchema::Object { .. } => "object",
            FieldSchema::Array { .. } => "array",
            FieldSchema::OneOf { .. } => "oneOf",
            FieldSchema::AllOf { .. } => "allOf",
            FieldSchema::AnyOf { .. } => "anyOf",
        }
    }
}

/// A named field inside a `FieldsSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaField {
    pub name: String,
    pub schema: FieldSchema,
}

/// Ordered mapping from unique field name to field schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldsSchema {
    fields: Vec<SchemaField>,
}

impl FieldsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any field with the same name in place.
    pub fn with_field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.insert(name, schema);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: FieldSchema) {
        let name = name.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.schema = schema,
            None => self.fields.push(SchemaField { name, schema }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.schema)
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldSchema)> for FieldsSchema {
    fn from_iter<I: IntoIterator<Item = (String, FieldSchema)>>(iter: I) -> Self {
        let mut schema = FieldsSchema::new();
        for (name, field) in iter {
            schema.insert(name, field);
        }
        schema
    }
}
