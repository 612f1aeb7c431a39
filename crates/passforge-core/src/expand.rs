//! Schema engine: expands a `FieldsSchema` into per-field candidate lists.
//!
//! Leaf variants expand into flat value lists. `object` and `array` fields
//! stay nested until [`CandidateSet::resolve`] turns them into flat lists of
//! object values by taking the cartesian product of their children.
//!
//! `oneOf` and `allOf` share the same behavior: each sub-schema is expanded on
//! its own and the resulting lists are concatenated. `anyOf` is rejected.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{FieldSchema, FieldsSchema};
use crate::validation::{join_path, validate_fields_schema};
use crate::value::{FieldValue, GeneratedObject};

/// Largest integer exactly representable in an IEEE-754 double.
pub const SAFE_INTEGER_MAX: i64 = 9_007_199_254_740_991;

/// Default bound on the size of any single enumerated list.
pub const DEFAULT_MAX_CANDIDATES: usize = 1_000_000;

/// Bounds applied while enumerating candidate lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandLimits {
    /// Maximum number of values a single list may hold.
    pub max_candidates: usize,
}

impl Default for ExpandLimits {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

/// Candidates for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidates {
    /// Flat ordered values after exclusion.
    List(Vec<FieldValue>),
    /// Nested mapping from an `object`/`array` field. The exclusions apply to
    /// the resolved objects.
    Nested {
        fields: CandidateSet,
        exclude_values: Vec<Value>,
    },
}

impl Candidates {
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Candidates::List(values) => Some(values),
            Candidates::Nested { .. } => None,
        }
    }

    pub fn as_nested(&self) -> Option<&CandidateSet> {
        match self {
            Candidates::List(_) => None,
            Candidates::Nested { fields, .. } => Some(fields),
        }
    }
}

/// Expanded schema: ordered mapping from field name to candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    entries: Vec<(String, Candidates)>,
}

impl CandidateSet {
    pub fn get(&self, name: &str) -> Option<&Candidates> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, candidates)| candidates)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Candidates)> {
        self.entries
            .iter()
            .map(|(key, candidates)| (key.as_str(), candidates))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten nested fields into lists of object values.
    pub fn resolve(&self, limits: ExpandLimits) -> Result<ResolvedCandidates> {
        self.resolve_at("", limits)
    }

    fn resolve_at(&self, prefix: &str, limits: ExpandLimits) -> Result<ResolvedCandidates> {
        let mut fields = Vec::with_capacity(self.entries.len());
        for (name, candidates) in &self.entries {
            let path = join_path(prefix, name);
            let values = flatten(candidates, &path, limits)?;
            fields.push((name.clone(), values));
        }
        Ok(ResolvedCandidates { fields })
    }
}

/// Flat candidate lists ready for combinatorics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedCandidates {
    fields: Vec<(String, Vec<FieldValue>)>,
}

impl ResolvedCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field list, replacing any list with the same name.
    pub fn with_field(mut self, name: impl Into<String>, values: Vec<FieldValue>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = values,
            None => self.fields.push((name, values)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&[FieldValue]> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn fields(&self) -> &[(String, Vec<FieldValue>)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Expands field schemas into candidate lists. Stateless apart from limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaEngine {
    limits: ExpandLimits,
}

/// Expand with default limits.
pub fn expand(schema: &FieldsSchema) -> Result<CandidateSet> {
    SchemaEngine::default().expand(schema)
}

impl SchemaEngine {
    pub fn new(limits: ExpandLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ExpandLimits {
        self.limits
    }

    pub fn expand(&self, schema: &FieldsSchema) -> Result<CandidateSet> {
        validate_fields_schema(schema)?;
        self.expand_fields(schema, "")
    }

    /// Expand and resolve nested fields in one step.
    pub fn expand_resolved(&self, schema: &FieldsSchema) -> Result<ResolvedCandidates> {
        self.expand(schema)?.resolve(self.limits)
    }

    fn expand_fields(&self, schema: &FieldsSchema, prefix: &str) -> Result<CandidateSet> {
        let mut entries = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            let path = join_path(prefix, &field.name);
            let candidates = self.expand_field(&field.schema, &path)?;
            entries.push((field.name.clone(), candidates));
        }
        Ok(CandidateSet { entries })
    }

    fn expand_field(&self, schema: &FieldSchema, path: &str) -> Result<Candidates> {
        let candidates = match schema {
            FieldSchema::String { exclude_values } => {
                let values = std::iter::once(String::new())
                    .filter(|value| !exclude_values.contains(value))
                    .map(FieldValue::Text)
                    .collect();
                Candidates::List(values)
            }
            FieldSchema::Number {
                min,
                max,
                exclude_values,
            } => {
                let min = min.unwrap_or(-SAFE_INTEGER_MAX);
                let max = max.unwrap_or(SAFE_INTEGER_MAX);
                Candidates::List(self.expand_range(min, max, exclude_values, path)?)
            }
            FieldSchema::Boolean { exclude_values } => {
                let values = [true, false]
                    .into_iter()
                    .filter(|value| !exclude_values.contains(value))
                    .map(FieldValue::Bool)
                    .collect();
                Candidates::List(values)
            }
            FieldSchema::Enum {
                values,
                exclude_values,
            } => {
                let values = values
                    .iter()
                    .filter(|value| !exclude_values.contains(value))
                    .cloned()
                    .map(FieldValue::from_json)
                    .collect();
                Candidates::List(values)
            }
            FieldSchema::Date {
                start,
                end,
                exclude_values,
            } => Candidates::List(self.expand_dates(*start, *end, exclude_values, path)?),
            FieldSchema::Custom { values } => {
                Candidates::List(values.iter().cloned().map(FieldValue::from_json).collect())
            }
            FieldSchema::Object {
                properties,
                exclude_values,
            } => Candidates::Nested {
                fields: self.expand_fields(properties, path)?,
                exclude_values: exclude_values.clone(),
            },
            FieldSchema::Array {
                item,
                exclude_values,
            } => {
                let wrapper = FieldsSchema::new().with_field("item", item.as_ref().clone());
                Candidates::Nested {
                    fields: self.expand_fields(&wrapper, path)?,
                    exclude_values: exclude_values.clone(),
                }
            }
            FieldSchema::OneOf {
                schemas,
                exclude_values,
            }
            | FieldSchema::AllOf {
                schemas,
                exclude_values,
            } => Candidates::List(self.concatenate(schemas, exclude_values, path)?),
            FieldSchema::AnyOf { .. } => {
                return Err(Error::UnsupportedVariant {
                    variant: schema.variant_name(),
                    path: path.to_string(),
                });
            }
        };
        Ok(candidates)
    }

    fn expand_range(
        &self,
        min: i64,
        max: i64,
        exclude_values: &[i64],
        path: &str,
    ) -> Result<Vec<FieldValue>> {
        if min > max {
            return Ok(Vec::new());
        }

        let size = (i128::from(max) - i128::from(min) + 1) as u128;
        self.check_size(size, path)?;

        Ok((min..=max)
            .filter(|value| !exclude_values.contains(value))
            .map(FieldValue::Int)
            .collect())
    }

    fn expand_dates(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_values: &[NaiveDateTime],
        path: &str,
    ) -> Result<Vec<FieldValue>> {
        if start > end {
            return Ok(Vec::new());
        }

        let days = (end - start).num_days();
        self.check_size(days as u128 + 1, path)?;

        let mut values = Vec::new();
        for offset in 0..=days {
            let Some(current) = start.checked_add_signed(TimeDelta::days(offset)) else {
                break;
            };
            if !exclude_values.contains(&current) {
                values.push(FieldValue::Date(current));
            }
        }
        Ok(values)
    }

    fn concatenate(
        &self,
        schemas: &[FieldSchema],
        exclude_values: &[Value],
        path: &str,
    ) -> Result<Vec<FieldValue>> {
        let mut values = Vec::new();
        for sub in schemas {
            let candidates = self.expand_field(sub, path)?;
            values.extend(flatten(&candidates, path, self.limits)?);
            self.check_size(values.len() as u128, path)?;
        }
        Ok(apply_json_exclusions(values, exclude_values))
    }

    fn check_size(&self, size: u128, path: &str) -> Result<()> {
        check_size(size, path, self.limits)
    }
}

fn flatten(candidates: &Candidates, path: &str, limits: ExpandLimits) -> Result<Vec<FieldValue>> {
    match candidates {
        Candidates::List(values) => Ok(values.clone()),
        Candidates::Nested {
            fields,
            exclude_values,
        } => {
            let resolved = fields.resolve_at(path, limits)?;
            let mut objects = vec![GeneratedObject::new()];
            for (name, values) in resolved.fields() {
                let size = objects.len() as u128 * values.len() as u128;
                check_size(size, path, limits)?;

                let mut next = Vec::with_capacity(size as usize);
                for object in &objects {
                    for value in values {
                        next.push(object.clone().with(name.clone(), value.clone()));
                    }
                }
                objects = next;
            }

            let values = objects.into_iter().map(FieldValue::Object).collect();
            Ok(apply_json_exclusions(values, exclude_values))
        }
    }
}

fn apply_json_exclusions(values: Vec<FieldValue>, exclude_values: &[Value]) -> Vec<FieldValue> {
    if exclude_values.is_empty() {
        return values;
    }
    values
        .into_iter()
        .filter(|value| !exclude_values.contains(&value.to_json()))
        .collect()
}

fn check_size(size: u128, path: &str, limits: ExpandLimits) -> Result<()> {
    if size > limits.max_candidates as u128 {
        return Err(Error::CandidateLimit {
            path: path.to_string(),
            size,
            limit: limits.max_candidates,
        });
    }
    Ok(())
}
