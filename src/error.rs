//! Error types
//!
//! Every failure the engine can surface is one of these enums. Recovered
//! conditions (JSON decode failure, id resolution failure) never leave the
//! pipeline; they are logged and replaced with a surrogate id.

use crate::json::JsonKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure while walking a slash-delimited path through a JSON object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("empty path")]
    EmptyPath,
    #[error(
        "failed to find '{segment}' in returned data structure after finding '{consumed}'. Available: {}",
        .available.join(",")
    )]
    KeyNotFound {
        segment: String,
        consumed: String,
        available: Vec<String>,
    },
    #[error("object at '{consumed}' is not a map but {kind}. Is this the right path?")]
    NotATraversableNode { consumed: String, kind: JsonKind },
}

/// Failure while turning a leaf value into a string scalar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("value is not a JSON string or number but {0}")]
    NotAScalar(JsonKind),
}

/// Failure while narrowing a response to the object of interest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NarrowError {
    #[error("response does not contain key: {0}")]
    KeyNotFound(String),
    #[error("value at key '{key}' is {kind}, expected an object or a list")]
    NotNarrowable { key: String, kind: JsonKind },
    #[error("response no filter match for: {name} = {value}")]
    FilterNoMatch { name: String, value: String },
}

/// Failure while building or issuing the HTTP request
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("error building request: {0}")]
    Build(String),
    #[error("error making a request after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("no response headers within {timeout:?} after {attempts} attempt(s)")]
    ResponseHeaderTimeout { attempts: u32, timeout: Duration },
    #[error("HTTP request error. Response code: {0}")]
    UnexpectedStatus(u16),
    #[error("error while reading response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

impl RequestError {
    /// Status code carried by a non-200 response, if that is what failed
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors reported to the host by resource operations
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Narrow(#[from] NarrowError),
    #[error("item not found")]
    NotFound,
}

/// Errors loading declarative configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
