//! HTTP request and response values exchanged with a `Transport`.
//!
//! # Design
//! The dispatcher describes each request as plain data and hands it to a
//! transport; the transport hands back the raw status, header text and
//! body. Nothing here performs I/O, which keeps request construction
//! deterministic and lets tests inspect exactly what would be sent.

use std::time::Duration;

use indexmap::IndexMap;

use crate::types::{AuthType, FormField};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Sent as-is.
    Text(String),
    /// Encoded by the transport, urlencoded or multipart depending on
    /// `HttpRequest::multipart`.
    Fields(Vec<FormField>),
}

/// An HTTP request described as plain data.
///
/// Headers with an empty value ask the transport to suppress that header
/// rather than send it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub cookies: Option<String>,
    /// `user:password`.
    pub credentials: Option<String>,
    pub auth_type: Option<AuthType>,
    pub timeout: Duration,
    pub body: RequestBody,
    pub multipart: bool,
}

impl HttpRequest {
    pub fn new(url: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: IndexMap::new(),
            cookies: None,
            credentials: None,
            auth_type: None,
            timeout: Duration::ZERO,
            body: RequestBody::Empty,
            multipart: false,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// True when the body goes out as `multipart/form-data`.
    pub fn sends_multipart(&self) -> bool {
        self.multipart && matches!(self.body, RequestBody::Fields(_))
    }
}

/// What the transport saw on the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Status line plus `Name: value` lines, CRLF separated.
    pub header_text: String,
    /// Body bytes as received, not decoded.
    pub body: Vec<u8>,
}
