//! HTTP request execution
//!
//! - [`client`] - builds the outbound request and runs it with bounded retry
//! - [`dump`] - sanitized request/response dumps for debug logging

pub mod client;
pub mod dump;

pub use client::{collect_headers, Headers, HttpResponse, RequestConfig, RequestExecutor};
