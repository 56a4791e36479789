//! Identity resolution
//!
//! Derives the id a host keys the resource on. Resolution never fails: when
//! the id field is missing, is not a scalar, or is empty, a UTC timestamp
//! stands in for it.

use super::path::{as_string_scalar, navigate};
use chrono::Utc;
use serde_json::{Map, Value};

/// Textual layout of surrogate ids, second resolution
pub const SURROGATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S +0000 UTC";

/// Current UTC time rendered as a surrogate id
pub fn surrogate_id() -> String {
    Utc::now().format(SURROGATE_FORMAT).to_string()
}

/// Outcome of identity resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub id: String,
    /// Compact JSON of the narrowed object, or the raw body when it was not JSON
    pub body: String,
    /// True when `id` came from the clock rather than the response
    pub surrogate: bool,
}

/// Resolve the id at `id_field` inside `narrowed`, falling back to `now_utc()`.
pub fn resolve<F>(narrowed: Map<String, Value>, id_field: &str, now_utc: F) -> Resolved
where
    F: FnOnce() -> String,
{
    let found = navigate(&narrowed, id_field)
        .map_err(|e| e.to_string())
        .and_then(|value| as_string_scalar(value).map_err(|e| e.to_string()));

    let (id, surrogate) = match found {
        Ok(id) if !id.is_empty() => (id, false),
        Ok(_) => {
            tracing::warn!("Id field '{}' is empty, using a timestamp id", id_field);
            (now_utc(), true)
        }
        Err(reason) => {
            tracing::warn!("No usable id at '{}' ({}), using a timestamp id", id_field, reason);
            (now_utc(), true)
        }
    };

    Resolved {
        id,
        body: Value::Object(narrowed).to_string(),
        surrogate,
    }
}
