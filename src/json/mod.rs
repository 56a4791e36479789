//! Schema-less JSON interpretation
//!
//! The response of an arbitrary REST endpoint is decoded into a
//! [`serde_json::Value`] tree and interpreted in three steps:
//!
//! - [`narrow`] - reduce the response to the object of interest via an
//!   optional top-level key and an optional name/value filter
//! - [`path`] - walk a slash-delimited path to a leaf and coerce it to a string
//! - [`identity`] - derive the resource id, falling back to a UTC timestamp
//!
//! Lists are addressed as objects keyed by their decimal indices, so
//! `items/0/id` reaches the same leaf whether `items` was a list or a map
//! with a `"0"` key.

pub mod identity;
pub mod narrow;
pub mod path;

use serde_json::Value;
use std::fmt;

pub use identity::{resolve, surrogate_id, Resolved};
pub use narrow::{array_as_object, narrow, FilterSpec};
pub use path::{as_string_scalar, navigate};

/// Kind of a JSON value, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Object,
    Array,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Object(_) => JsonKind::Object,
            Value::Array(_) => JsonKind::Array,
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "a bool",
            JsonKind::Number => "a number",
            JsonKind::String => "a string",
            JsonKind::Object => "an object",
            JsonKind::Array => "a list",
        };
        f.write_str(name)
    }
}
