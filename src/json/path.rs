//! Path navigation
//!
//! Digs through a decoded response and returns whatever sits at a
//! slash-delimited path. Given:
//!
//! ```text
//! { "attrs": { "id": 1234 }, "items": [ { "name": "abc" } ] }
//! ```
//!
//! `attrs/id` yields `1234` and `items/0/name` yields `"abc"`.

use super::JsonKind;
use crate::error::{CoercionError, NavigationError};
use serde_json::{Map, Number, Value};

/// Largest magnitude for which an integral float is still printed without a fraction
const MAX_EXACT_INTEGRAL: f64 = 1e15;

/// A container that can be descended into
#[derive(Clone, Copy)]
enum Node<'a> {
    Object(&'a Map<String, Value>),
    List(&'a [Value]),
}

impl<'a> Node<'a> {
    fn get(self, key: &str) -> Option<&'a Value> {
        match self {
            Node::Object(map) => map.get(key),
            Node::List(items) => list_index(key).and_then(|idx| items.get(idx)),
        }
    }

    fn keys(self) -> Vec<String> {
        match self {
            Node::Object(map) => map.keys().cloned().collect(),
            Node::List(items) => (0..items.len()).map(|idx| idx.to_string()).collect(),
        }
    }
}

/// Parse a list key, accepting only the canonical decimal spelling ("1", not "01" or "+1")
fn list_index(key: &str) -> Option<usize> {
    let idx: usize = key.parse().ok()?;
    (idx.to_string() == key).then_some(idx)
}

fn key_not_found(segment: &str, consumed: &str, node: Node<'_>) -> NavigationError {
    NavigationError::KeyNotFound {
        segment: segment.to_string(),
        consumed: consumed.to_string(),
        available: node.keys(),
    }
}

/// Walk `path` from `root` and return the raw value at its final segment.
///
/// Empty segments are skipped, so `a//b` and `/a/b/` both mean `a/b`.
/// Intermediate lists are addressed by decimal index.
pub fn navigate<'a>(root: &'a Map<String, Value>, path: &str) -> Result<&'a Value, NavigationError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(NavigationError::EmptyPath);
    };

    let mut node = Node::Object(root);
    let mut consumed = String::new();

    for segment in parents {
        let Some(value) = node.get(segment) else {
            tracing::debug!("path segment '{}' missing after '{}'", segment, consumed);
            return Err(key_not_found(segment, &consumed, node));
        };

        if !consumed.is_empty() {
            consumed.push('/');
        }
        consumed.push_str(segment);

        node = match value {
            Value::Object(map) => Node::Object(map),
            Value::Array(items) => Node::List(items),
            other => {
                return Err(NavigationError::NotATraversableNode {
                    consumed,
                    kind: JsonKind::of(other),
                })
            }
        };
    }

    node.get(last)
        .ok_or_else(|| key_not_found(last, &consumed, node))
}

/// Accept a string or number leaf and render it as a string
pub fn as_string_scalar(value: &Value) -> Result<String, CoercionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(format_number(n)),
        other => Err(CoercionError::NotAScalar(JsonKind::of(other))),
    }
}

// 1234.0 renders as "1234"; 1.5 stays "1.5".
fn format_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGRAL => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}
