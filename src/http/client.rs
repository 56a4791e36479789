//! Request executor
//!
//! Builds one HTTP request from a [`RequestConfig`] and runs it. Transport
//! failures are retried up to `retries` extra times; any response other than
//! 200 is a hard failure.

use super::dump::{dump_request, dump_response, sanitize_for_log};
use crate::error::RequestError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use indexmap::IndexMap;
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// Header names to values, in the order they were written
pub type Headers = IndexMap<String, String>;

/// Bound on establishing the connection (TCP and TLS), independent of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on waiting for response headers once the request is sent
pub const RESPONSE_HEADER_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP keepalive interval for pooled connections
const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

/// Pause between transport-level retries
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// One outbound request, as configured by the caller
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub url: String,
    pub method: String,
    /// Per-call headers, applied after the base headers
    pub headers: Headers,
    pub body: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Bound on the whole call, connect to last body byte
    pub timeout: Duration,
    /// Additional attempts after a transport failure
    pub retries: u32,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Log request and response dumps
    pub debug: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: "GET".to_string(),
            headers: Headers::new(),
            body: None,
            insecure: false,
            timeout: Duration::from_secs(10),
            retries: 0,
            username: None,
            password: None,
            debug: false,
        }
    }
}

impl RequestConfig {
    /// Credentials for basic auth, present only when both halves are non-empty
    fn basic_auth(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// A successful (status 200) response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical header names; repeated headers joined with ", "
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Runs requests; holds no per-request state and may be shared freely
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    retry_backoff: Duration,
    response_header_timeout: Duration,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self {
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            response_header_timeout: RESPONSE_HEADER_TIMEOUT,
        }
    }

    /// Override the pause between retries
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Override how long an attempt may wait for response headers
    pub fn with_response_header_timeout(mut self, timeout: Duration) -> Self {
        self.response_header_timeout = timeout;
        self
    }

    /// Execute `cfg` with `base` headers applied first.
    pub async fn execute(
        &self,
        base: &Headers,
        cfg: &RequestConfig,
    ) -> Result<HttpResponse, RequestError> {
        let client = build_client(cfg)?;
        let request = build_request(&client, base, cfg)?;

        tracing::debug!("{} {}", request.method(), request.url());
        if cfg.debug {
            tracing::info!("Request:\n{}", dump_request(&request));
        }

        let mut attempts: u32 = 0;
        let response = loop {
            attempts += 1;
            let Some(attempt) = request.try_clone() else {
                return Err(RequestError::Build(
                    "request body cannot be replayed".to_string(),
                ));
            };

            // `execute` resolves once the headers are in; the body is read below
            let pending = client.execute(attempt);
            let err = match tokio::time::timeout(self.response_header_timeout, pending).await {
                Ok(Ok(response)) => break response,
                Ok(Err(err)) if err.is_builder() => {
                    return Err(RequestError::Build(err.to_string()));
                }
                Ok(Err(err)) => RequestError::Transport {
                    attempts,
                    source: err,
                },
                Err(_) => RequestError::ResponseHeaderTimeout {
                    attempts,
                    timeout: self.response_header_timeout,
                },
            };

            if attempts > cfg.retries {
                tracing::error!("Error making request: {}", err);
                return Err(err);
            }
            tracing::warn!(
                "Error making request (attempt {}/{}): {}",
                attempts,
                cfg.retries + 1,
                err
            );
            tokio::time::sleep(self.retry_backoff).await;
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        if status != 200 {
            // Only a truncated, sanitized excerpt of the body reaches the log
            let body = response.text().await.unwrap_or_default();
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(RequestError::UnexpectedStatus(status));
        }

        let body = response.bytes().await.map_err(RequestError::ReadBody)?.to_vec();

        if cfg.debug {
            tracing::info!("Response:\n{}", dump_response(status, &headers, &body));
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_client(cfg: &RequestConfig) -> Result<Client, RequestError> {
    if cfg.insecure {
        tracing::warn!("TLS certificate verification DISABLED for {}", cfg.url);
    }

    Client::builder()
        .user_agent(concat!("resty/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(cfg.insecure)
        .connect_timeout(CONNECT_TIMEOUT)
        .tcp_keepalive(TCP_KEEPALIVE)
        .timeout(cfg.timeout)
        .build()
        .map_err(|e| RequestError::Build(format!("failed to create HTTP client: {}", e)))
}

fn build_request(
    client: &Client,
    base: &Headers,
    cfg: &RequestConfig,
) -> Result<reqwest::Request, RequestError> {
    let method = Method::from_bytes(cfg.method.as_bytes())
        .map_err(|_| RequestError::Build(format!("invalid method '{}'", cfg.method)))?;
    let url = Url::parse(&cfg.url)
        .map_err(|e| RequestError::Build(format!("invalid url '{}': {}", cfg.url, e)))?;

    let mut builder = client.request(method, url);

    if let Some(body) = cfg.body.as_deref().filter(|b| !b.is_empty()) {
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
    }

    let mut headers = merge_headers(base, &cfg.headers)?;

    // Basic auth replaces any configured Authorization header
    if let Some((user, pass)) = cfg.basic_auth() {
        headers.remove(AUTHORIZATION);
        builder = builder.headers(headers).basic_auth(user, Some(pass));
    } else {
        builder = builder.headers(headers);
    }

    builder
        .build()
        .map_err(|e| RequestError::Build(e.to_string()))
}

/// Base headers first, then per-call headers; the later write wins
fn merge_headers(base: &Headers, headers: &Headers) -> Result<HeaderMap, RequestError> {
    let mut merged = HeaderMap::new();
    for (name, value) in base.iter().chain(headers.iter()) {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RequestError::Build(format!("invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RequestError::Build(format!("invalid value for header '{}'", name)))?;
        merged.insert(header_name, header_value);
    }
    Ok(merged)
}

/// Flatten response headers, joining repeated values in arrival order
pub fn collect_headers(headers: &HeaderMap) -> Headers {
    headers
        .keys()
        .map(|name| {
            let values: Vec<String> = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect();
            (canonical_header_name(name.as_str()), values.join(", "))
        })
        .collect()
}

/// `x-is-teapot` becomes `X-Is-Teapot`
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
