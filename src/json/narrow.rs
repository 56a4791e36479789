//! Response narrowing
//!
//! Reduces a decoded response to the object the rest of the pipeline works
//! on, using an optional top-level key and an optional name/value filter.

use super::JsonKind;
use crate::error::NarrowError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Select one element of a list by exact string match on one of its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    pub value: String,
}

impl FilterSpec {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Whether `element[name]` is a string equal to `value`
    fn matches(&self, element: &Map<String, Value>) -> bool {
        element.get(&self.name).and_then(Value::as_str) == Some(self.value.as_str())
    }
}

/// Represent a list as an object keyed by decimal index
pub fn array_as_object(items: Vec<Value>) -> Map<String, Value> {
    items
        .into_iter()
        .enumerate()
        .map(|(idx, value)| (idx.to_string(), value))
        .collect()
}

/// Narrow `response` to the object under `key`.
///
/// - no key (or an empty one): the whole response
/// - key points to an object: that object; the filter is ignored
/// - key points to a list with a filter: the first object element matching it
/// - key points to a list without a filter: the list keyed by index
pub fn narrow(
    mut response: Map<String, Value>,
    key: Option<&str>,
    filter: Option<&FilterSpec>,
) -> Result<Map<String, Value>, NarrowError> {
    let key = match key {
        Some(key) if !key.is_empty() => key,
        _ => {
            tracing::debug!("No key requested, using whole response");
            return Ok(response);
        }
    };

    let Some(value) = response.remove(key) else {
        return Err(NarrowError::KeyNotFound(key.to_string()));
    };

    match value {
        Value::Object(map) => {
            tracing::debug!("Key '{}' points to a map", key);
            if filter.is_some() {
                tracing::debug!("Filter ignored, it only applies to lists");
            }
            Ok(map)
        }
        Value::Array(items) => {
            tracing::debug!("Key '{}' points to a list of {} items", key, items.len());
            match filter {
                Some(filter) => select(items, filter),
                None => Ok(array_as_object(items)),
            }
        }
        other => Err(NarrowError::NotNarrowable {
            key: key.to_string(),
            kind: JsonKind::of(&other),
        }),
    }
}

/// First object element matching the filter; non-object elements never match
fn select(items: Vec<Value>, filter: &FilterSpec) -> Result<Map<String, Value>, NarrowError> {
    items
        .into_iter()
        .find_map(|item| match item {
            Value::Object(map) if filter.matches(&map) => Some(map),
            _ => None,
        })
        .inspect(|_| tracing::debug!("Found the item for {} = {}", filter.name, filter.value))
        .ok_or_else(|| NarrowError::FilterNoMatch {
            name: filter.name.clone(),
            value: filter.value.clone(),
        })
}
