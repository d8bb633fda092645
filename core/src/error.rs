//! Error types for the request layer.
//!
//! # Design
//! Transport failures pass through untouched in `Error::Transport`. The one
//! exception is an invalid body field: the dispatcher knows which fields it
//! tried to send, so it wraps that failure in `InvalidPostFields` with a
//! short dump of every field name and value.

use thiserror::Error;

use crate::types::AuthType;

/// Failures raised by a `Transport` while sending a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A body field could not be encoded (empty name, unreadable file, ...).
    #[error("invalid post field: {0}")]
    InvalidField(String),

    #[error("authentication scheme `{0}` is not supported by this transport")]
    UnsupportedAuth(AuthType),

    #[error("request timed out")]
    Timeout,

    #[error("response body exceeds {0} bytes")]
    BodyTooLarge(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure reported by the HTTP engine.
    #[error("HTTP transport error: {0}")]
    Http(String),
}

/// Errors returned by `Client`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The transport rejected a body field. `fields` holds one
    /// `name => "preview"` line per attempted field.
    #[error("There was an attempt to post invalid fields.  The fields were:\n{}", .fields.join("\n"))]
    InvalidPostFields {
        fields: Vec<String>,
        #[source]
        source: TransportError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
