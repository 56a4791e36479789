//! Debug dumps of requests and responses
//!
//! Dumps go to the log, so credential-bearing headers are masked and long
//! bodies truncated.

use super::client::Headers;
use reqwest::header::{HeaderName, AUTHORIZATION, PROXY_AUTHORIZATION};
use std::fmt::Write;

/// Maximum length of an error body excerpt
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Maximum length of a body in a debug dump
const MAX_DUMP_BODY_LENGTH: usize = 4096;

const MASK: &str = "********";

fn truncate(body: &str, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    }
}

/// Truncate a response body and strip control characters for logging
pub fn sanitize_for_log(body: &str) -> String {
    truncate(body, MAX_LOG_BODY_LENGTH).replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

fn is_sensitive(name: &str) -> bool {
    [AUTHORIZATION, PROXY_AUTHORIZATION]
        .iter()
        .any(|h: &HeaderName| h.as_str().eq_ignore_ascii_case(name))
}

fn write_headers<'a>(out: &mut String, headers: impl Iterator<Item = (&'a str, String)>) {
    for (name, value) in headers {
        let value = if is_sensitive(name) { MASK.to_string() } else { value };
        let _ = writeln!(out, "{}: {}", name, value);
    }
}

fn write_body(out: &mut String, body: &[u8]) {
    if !body.is_empty() {
        let _ = write!(
            out,
            "\n{}",
            truncate(&String::from_utf8_lossy(body), MAX_DUMP_BODY_LENGTH)
        );
    }
}

/// Render an outbound request
pub fn dump_request(request: &reqwest::Request) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", request.method(), request.url());
    write_headers(
        &mut out,
        request
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v.as_bytes()).into_owned())),
    );
    if let Some(body) = request.body().and_then(|b| b.as_bytes()) {
        write_body(&mut out, body);
    }
    out
}

/// Render a received response
pub fn dump_response(status: u16, headers: &Headers, body: &[u8]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "HTTP {}", status);
    write_headers(
        &mut out,
        headers.iter().map(|(k, v)| (k.as_str(), v.clone())),
    );
    write_body(&mut out, body);
    out
}
