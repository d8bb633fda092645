//! Request targets and parameter values.
//!
//! # Design
//! A target is either a complete URL or an `Endpoint` assembled from parts.
//! Parameters are either a caller-encoded string or an ordered map of
//! fields. Both are tagged unions so the builder never has to guess what a
//! value is. Maps use `IndexMap` so serialization follows insertion order.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

/// HTTP authentication scheme requested for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    Basic,
    Digest,
    Ntlm,
    Negotiate,
    /// Let the transport pick whichever scheme it supports.
    Any,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthType::Basic => "basic",
            AuthType::Digest => "digest",
            AuthType::Ntlm => "ntlm",
            AuthType::Negotiate => "negotiate",
            AuthType::Any => "any",
        };
        f.write_str(name)
    }
}

/// Where a request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// A complete base URL, used verbatim.
    Url(String),
    Endpoint(Endpoint),
}

impl From<&str> for RequestTarget {
    fn from(url: &str) -> Self {
        RequestTarget::Url(url.to_string())
    }
}

impl From<String> for RequestTarget {
    fn from(url: String) -> Self {
        RequestTarget::Url(url)
    }
}

impl From<Endpoint> for RequestTarget {
    fn from(endpoint: Endpoint) -> Self {
        RequestTarget::Endpoint(endpoint)
    }
}

/// Structured description of a target.
///
/// When `url` is set it replaces the protocol/host/port/path parts, which
/// lets a caller attach credentials, cookies or headers to a plain URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub url: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub protocol: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_type: Option<AuthType>,
    pub cookies: Option<String>,
    pub headers: IndexMap<String, String>,
}

impl Endpoint {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            ..Self::default()
        }
    }

    pub fn with_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn protocol(mut self, protocol: &str) -> Self {
        self.protocol = Some(protocol.to_string());
        self
    }

    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn auth_type(mut self, auth_type: AuthType) -> Self {
        self.auth_type = Some(auth_type);
        self
    }

    pub fn cookies(mut self, cookies: &str) -> Self {
        self.cookies = Some(cookies.to_string());
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Auth scheme in effect: the explicit one, else Basic when a username
    /// is present.
    pub fn effective_auth_type(&self) -> Option<AuthType> {
        self.auth_type
            .or_else(|| self.username.as_ref().map(|_| AuthType::Basic))
    }
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
}

impl ParamValue {
    /// The value as it goes on the wire: lists are comma-joined.
    pub fn to_field_value(&self) -> String {
        match self {
            ParamValue::Text(text) => text.clone(),
            ParamValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(items: Vec<&str>) -> Self {
        ParamValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(items: [&str; N]) -> Self {
        ParamValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

macro_rules! param_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Text(value.to_string())
                }
            }
        )*
    };
}

param_value_from_display!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool, char);

/// Ordered name/value pairs for a query string or a request body.
pub type Fields = IndexMap<String, ParamValue>;

/// Query parameters or body parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// Already encoded by the caller and used as-is.
    Raw(String),
    Map(Fields),
}

impl Params {
    pub fn none() -> Self {
        Params::Map(Fields::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::Raw(raw) => raw.is_empty(),
            Params::Map(fields) => fields.is_empty(),
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::none()
    }
}

impl From<&str> for Params {
    fn from(raw: &str) -> Self {
        Params::Raw(raw.to_string())
    }
}

impl From<String> for Params {
    fn from(raw: String) -> Self {
        Params::Raw(raw)
    }
}

impl From<Fields> for Params {
    fn from(fields: Fields) -> Self {
        Params::Map(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// One named unit of a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Content { name: String, value: String },
    File { name: String, path: PathBuf },
}

impl FormField {
    pub fn content(name: &str, value: &str) -> Self {
        FormField::Content {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn file(name: &str, path: impl Into<PathBuf>) -> Self {
        FormField::File {
            name: name.to_string(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormField::Content { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// Encoded POST body: a caller-supplied string or a list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFields {
    Raw(String),
    Fields(Vec<FormField>),
}
