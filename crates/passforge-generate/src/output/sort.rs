use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::GenerationError;
use crate::model::PasswordRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Look up a dot-separated path such as `values.passwordLength`.
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        })
}

/// Stable sort by the value found at `path` in each row's serialized form.
///
/// Missing and null values order first when ascending.
pub fn sort_rows(
    rows: &mut [PasswordRow],
    path: &str,
    order: SortOrder,
) -> Result<(), GenerationError> {
    let keys = rows
        .iter()
        .map(|row| serde_json::to_value(row).map(|value| value_at_path(&value, path).cloned()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut indexed: Vec<(Option<Value>, PasswordRow)> =
        keys.into_iter().zip(rows.iter().cloned()).collect();
    indexed.sort_by(|(left, _), (right, _)| {
        let ordering = compare_keys(left.as_ref(), right.as_ref());
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    for (slot, (_, row)) in rows.iter_mut().zip(indexed) {
        *slot = row;
    }
    Ok(())
}

fn compare_keys(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left = left.filter(|value| !value.is_null());
    let right = right.filter(|value| !value.is_null());
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => compare_values(left, right),
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            let left = left.as_f64().unwrap_or_default();
            let right = right.as_f64().unwrap_or_default();
            left.partial_cmp(&right).unwrap_or(Ordering::Equal)
        }
        (Value::String(left), Value::String(right)) => left.cmp(right),
        (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
        (left, right) => left.to_string().cmp(&right.to_string()),
    }
}
