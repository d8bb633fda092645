//! Pure transformations from targets and parameters to transport-ready
//! strings and fields.

use std::path::PathBuf;

use indexmap::IndexMap;
use url::form_urlencoded;

use crate::types::{Endpoint, FormField, Params, PostFields, RequestTarget};

const DEFAULT_PROTOCOL: &str = "http";

/// Assemble the request URL for `target` and append `query`.
///
/// A raw query string is appended verbatim, so it must carry its own `?`.
/// A non-empty map is appended as `?name=value&...` with both sides
/// form-urlencoded. An empty map appends nothing.
pub fn build_url(target: &RequestTarget, query: &Params) -> String {
    let mut url = match target {
        RequestTarget::Url(url) => url.clone(),
        RequestTarget::Endpoint(endpoint) => endpoint_base(endpoint),
    };

    match query {
        Params::Raw(raw) => url.push_str(raw),
        Params::Map(fields) if fields.is_empty() => {}
        Params::Map(fields) => {
            url.push('?');
            let pairs: Vec<String> = fields
                .iter()
                .map(|(name, value)| encode_query_pair(name, &value.to_field_value()))
                .collect();
            url.push_str(&pairs.join("&"));
        }
    }
    url
}

fn endpoint_base(endpoint: &Endpoint) -> String {
    if let Some(url) = &endpoint.url {
        return url.clone();
    }
    let protocol = endpoint.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL);
    let mut url = format!("{protocol}://{}", endpoint.host);
    if let Some(port) = endpoint.port {
        url.push_str(&format!(":{port}"));
    }
    if let Some(path) = &endpoint.path {
        url.push_str(path);
    }
    url
}

/// Encode one `name=value` query pair.
pub fn encode_query_pair(name: &str, value: &str) -> String {
    let name: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
    format!("{name}={value}")
}

/// Turn POST parameters into body fields, one content field per entry.
pub fn create_post_fields(params: &Params) -> PostFields {
    match params {
        Params::Raw(raw) => PostFields::Raw(raw.clone()),
        Params::Map(fields) => PostFields::Fields(
            fields
                .iter()
                .map(|(name, value)| FormField::Content {
                    name: name.clone(),
                    value: value.to_field_value(),
                })
                .collect(),
        ),
    }
}

/// One file-upload field per `name => path` entry.
pub fn create_file_fields(files: &IndexMap<String, PathBuf>) -> Vec<FormField> {
    files
        .iter()
        .map(|(name, path)| FormField::File {
            name: name.clone(),
            path: path.clone(),
        })
        .collect()
}

/// Turn PUT parameters into a single body string.
///
/// Pairs are written as `k=v` without percent-encoding; callers that need
/// encoded values pass a raw string instead.
pub fn create_put_fields(params: &Params) -> String {
    match params {
        Params::Raw(raw) => raw.clone(),
        Params::Map(fields) => fields
            .iter()
            .map(|(name, value)| format!("{name}={}", value.to_field_value()))
            .collect::<Vec<_>>()
            .join("&"),
    }
}
