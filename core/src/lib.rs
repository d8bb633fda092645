//! Thin convenience layer over a blocking HTTP client.
//!
//! # Overview
//! Builds request URLs from structured targets and parameters, attaches
//! headers, cookies and credentials, and dispatches GET/PUT/POST/DELETE and
//! multipart uploads through a `Transport`. Every call returns a
//! `Response` classified by status code, or the transport's error.
//!
//! # Design
//! - `builder` holds the pure URL and body-field encoding functions.
//! - `Client` owns its configuration, including global headers, so there
//!   is no process-wide mutable state.
//! - `Transport` is the only place that touches the network. `ReqwestTransport`
//!   is the default; tests plug in recording transports.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod response;
pub mod transport;
pub mod types;

pub use builder::{build_url, create_file_fields, create_post_fields, create_put_fields};
pub use client::{Client, Customize};
pub use config::ClientConfig;
pub use error::{Error, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, RawResponse, RequestBody};
pub use response::{Response, ResponseKind};
pub use transport::{ReqwestTransport, Transport, MAX_BODY_BYTES};
pub use types::{AuthType, Endpoint, Fields, FormField, ParamValue, Params, PostFields, RequestTarget};
