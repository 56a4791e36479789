//! Resource Fetcher
//!
//! Runs the configured request and interprets the response: decode the body,
//! narrow it, resolve the id.

use crate::config::{ProviderConfig, ResourceConfig};
use crate::error::{NarrowError, ResourceError};
use crate::http::{Headers, RequestExecutor};
use crate::json::{narrow, resolve, surrogate_id, FilterSpec, Resolved};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Source of surrogate ids
pub type Clock = fn() -> String;

/// Result of one request + interpretation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub id: String,
    pub response: String,
    pub response_headers: Headers,
}

/// Interpret a 200 response body.
///
/// A body that is not a JSON object is kept verbatim with a surrogate id.
pub fn interpret(
    body: &[u8],
    key: Option<&str>,
    filter: Option<&FilterSpec>,
    id_field: &str,
    clock: Clock,
) -> Result<Resolved, NarrowError> {
    let decoded = match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!("Non-fatal error parsing body as JSON: {}", err);
            return Ok(Resolved {
                id: clock(),
                body: String::from_utf8_lossy(body).into_owned(),
                surrogate: true,
            });
        }
    };

    let narrowed = narrow(decoded, key, filter)?;
    Ok(resolve(narrowed, id_field, clock))
}

/// Request + interpret pipeline shared by the resource and the data source
#[derive(Debug, Clone)]
pub struct Fetcher {
    provider: Arc<ProviderConfig>,
    executor: RequestExecutor,
    clock: Clock,
}

impl Fetcher {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            executor: RequestExecutor::new(),
            clock: surrogate_id,
        }
    }

    pub fn with_executor(mut self, executor: RequestExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the surrogate id source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn fetch(&self, cfg: &ResourceConfig) -> Result<Fetched, ResourceError> {
        let response = self
            .executor
            .execute(&self.provider.headers, &cfg.request())
            .await?;

        let resolved = interpret(
            &response.body,
            cfg.key.as_deref(),
            cfg.active_filter(),
            &cfg.id_field,
            self.clock,
        )?;

        if resolved.surrogate {
            tracing::info!("Stored {} under timestamp id '{}'", cfg.url, resolved.id);
        } else {
            tracing::debug!("Resolved id '{}' for {}", resolved.id, cfg.url);
        }

        Ok(Fetched {
            id: resolved.id,
            response: resolved.body,
            response_headers: response.headers,
        })
    }
}
