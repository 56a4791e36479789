//! Declarative REST resources
//!
//! Given a URL, method, headers, body and auth settings, perform an HTTP
//! request, narrow the JSON response and derive a stable id from it, so that
//! repeated runs with the same inputs converge on the same logical resource.

pub mod config;
pub mod error;
pub mod http;
pub mod json;
pub mod resource;
