//! The seam between request construction and network I/O.
//!
//! # Design
//! `Transport` takes a fully built `HttpRequest` and returns what came back
//! on the wire. `ReqwestTransport` is the blocking implementation shipped
//! with the crate. Tests substitute their own implementation to inspect
//! requests without a network.

use std::io::Read;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::trace;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, RawResponse};
use crate::multipart::{encode_body, EncodedBody};
use crate::types::AuthType;

/// Largest response body read by default.
pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Executes one request and returns the raw response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `reqwest::blocking`.
///
/// 4xx/5xx statuses come back as responses, not errors. Headers with an
/// empty value are not sent. Bodies larger than `max_body_bytes` fail with
/// `TransportError::BodyTooLarge`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    max_body_bytes: u64,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let timeout = (request.timeout > Duration::ZERO).then_some(request.timeout);
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;

        let headers = outgoing_headers(request)?;
        let body = encode_body(&request.body, request.multipart)?;
        trace!(method = request.method.as_str(), url = %request.url, headers = headers.len(), "sending request");

        let mut builder = client.request(method(request.method), &request.url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            Some(EncodedBody::Multipart(form)) => builder.multipart(form),
            Some(EncodedBody::Bytes { content_type, bytes }) => {
                let builder = match content_type.filter(|_| request.header("content-type").is_none()) {
                    Some(content_type) => builder.header(CONTENT_TYPE, content_type),
                    None => builder,
                };
                builder.body(bytes)
            }
            None => builder,
        };

        let response = builder.send()?;
        let status = response.status();
        let mut header_text = format!(
            "HTTP/1.1 {} {}\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        for (name, value) in response.headers() {
            header_text.push_str(&format!("{}: {}\r\n", name.as_str(), String::from_utf8_lossy(value.as_bytes())));
        }
        header_text.push_str("\r\n");
        let body = read_body(response, self.max_body_bytes)?;

        Ok(RawResponse {
            status: status.as_u16(),
            header_text,
            body,
        })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Read at most `limit` bytes; one more byte than that is an error.
fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        return Err(TransportError::BodyTooLarge(limit));
    }
    Ok(body)
}

/// Headers to put on the wire: caller headers minus empty ones, plus
/// `Cookie` and `Authorization` derived from the request.
///
/// A multipart body brings its own boundary-bearing `Content-Type`, so any
/// caller `Content-Type` is left out for those requests.
fn outgoing_headers(request: &HttpRequest) -> Result<Vec<(String, String)>, TransportError> {
    let multipart = request.sends_multipart();
    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter(|(name, _)| !(multipart && name.eq_ignore_ascii_case("content-type")))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    if let Some(cookies) = request.cookies.as_deref().filter(|c| !c.is_empty()) {
        headers.push(("Cookie".to_string(), cookies.to_string()));
    }

    if let Some(credentials) = &request.credentials {
        match request.auth_type.unwrap_or(AuthType::Basic) {
            AuthType::Basic | AuthType::Any => {
                headers.push((
                    "Authorization".to_string(),
                    format!("Basic {}", STANDARD.encode(credentials)),
                ));
            }
            other => return Err(TransportError::UnsupportedAuth(other)),
        }
    }
    Ok(headers)
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err.to_string())
        }
    }
}
