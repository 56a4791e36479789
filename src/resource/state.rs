//! Persisted resource state

use crate::http::Headers;
use serde::{Deserialize, Serialize};

/// What the host stores between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Stable identity; empty once deleted
    pub id: String,
    /// Narrowed object as JSON, or the raw body when it was not JSON
    pub response: String,
    #[serde(default)]
    pub response_headers: Headers,
    /// Inputs that force replacement when they change
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub force_new: Vec<String>,
}

impl ResourceState {
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }
}
