//! Request dispatcher.
//!
//! # Design
//! `Client` owns a `Transport` and a `ClientConfig`. Each verb builds one
//! `HttpRequest` with `build`, fills in method and body, executes it and
//! wraps the result in a `Response`. Global headers live in the config and
//! are cloned into every request before per-request headers are merged on
//! top, so nothing a single call adds can survive into the next one.
//!
//! Every verb has a `*_with` twin that accepts a hook. The hook receives
//! the built request before method and body are filled in, for last-mile
//! tweaks such as an extra header.

use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::builder::{build_url, create_file_fields, create_post_fields, create_put_fields};
use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};
use crate::http::{HttpMethod, HttpRequest, RequestBody};
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Fields, Params, PostFields, RequestTarget};

/// Optional hook run on each built request before dispatch.
pub type Customize<'a> = Option<&'a dyn Fn(&mut HttpRequest)>;

/// Number of characters of each value shown in an invalid-field dump.
const FIELD_PREVIEW_CHARS: usize = 50;

/// Synchronous HTTP client over a pluggable transport.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
}

impl Default for Client<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ReqwestTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn global_headers(&self) -> &IndexMap<String, String> {
        &self.config.global_headers
    }

    /// Replace the headers sent with every subsequent request.
    pub fn set_global_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.config.global_headers = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.set_timeout(timeout);
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Build a GET request for `target` with `query` appended.
    ///
    /// Applies credentials, cookies (`cookies` wins over the endpoint's),
    /// merged headers with an empty `Expect` unless one is already set, and
    /// the configured timeout. `customize` runs last.
    pub fn build(
        &self,
        target: &RequestTarget,
        query: &Params,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(&build_url(target, query));
        let mut headers = self.config.global_headers.clone();
        let mut cookies = cookies.map(str::to_string);

        if let RequestTarget::Endpoint(endpoint) = target {
            if let Some(username) = &endpoint.username {
                request.credentials = Some(format!(
                    "{username}:{}",
                    endpoint.password.as_deref().unwrap_or("")
                ));
            }
            request.auth_type = endpoint.effective_auth_type();

            if cookies.is_none() {
                cookies = endpoint.cookies.clone();
            }

            for (name, value) in &endpoint.headers {
                headers.insert(name.clone(), value.clone());
            }
        }

        if !headers.keys().any(|name| name.eq_ignore_ascii_case("expect")) {
            headers.insert("Expect".to_string(), String::new());
        }

        request.cookies = cookies;
        request.headers = headers;
        request.timeout = self.config.timeout();

        if let Some(customize) = customize {
            customize(&mut request);
        }
        request
    }

    pub fn get(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
    ) -> Result<Response> {
        self.get_with(target, params, cookies, None)
    }

    pub fn get_with(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> Result<Response> {
        let request = self.build(&target.into(), &params.into(), cookies, customize);
        self.dispatch(request)
    }

    pub fn put(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
    ) -> Result<Response> {
        self.put_with(target, params, cookies, None)
    }

    /// PUT with the params encoded as one `k=v&...` body string.
    pub fn put_with(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> Result<Response> {
        let params = params.into();
        let mut request = self.build(&target.into(), &Params::none(), cookies, customize);
        request.method = HttpMethod::Put;
        request.body = RequestBody::Text(create_put_fields(&params));
        self.dispatch(request)
            .map_err(|err| enrich_invalid_fields(err, || field_dump(&params, None)))
    }

    pub fn post(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
    ) -> Result<Response> {
        self.post_with(target, params, cookies, None)
    }

    pub fn post_with(
        &self,
        target: impl Into<RequestTarget>,
        params: impl Into<Params>,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> Result<Response> {
        let params = params.into();
        let mut request = self.build(&target.into(), &Params::none(), cookies, customize);
        request.method = HttpMethod::Post;
        request.body = match create_post_fields(&params) {
            PostFields::Raw(raw) => RequestBody::Text(raw),
            PostFields::Fields(fields) => RequestBody::Fields(fields),
        };

        let response = self
            .dispatch(request)
            .map_err(|err| enrich_invalid_fields(err, || field_dump(&params, None)))?;
        if self.config.debug {
            info!(
                status = response.status(),
                headers = ?response.headers(),
                body = ?response.body(),
                "response from server"
            );
        }
        Ok(response)
    }

    pub fn post_file(
        &self,
        target: impl Into<RequestTarget>,
        params: &Fields,
        files: &IndexMap<String, PathBuf>,
        cookies: Option<&str>,
    ) -> Result<Response> {
        self.post_file_with(target, params, files, cookies, None)
    }

    /// Multipart POST of `params` as content fields followed by `files`.
    pub fn post_file_with(
        &self,
        target: impl Into<RequestTarget>,
        params: &Fields,
        files: &IndexMap<String, PathBuf>,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> Result<Response> {
        let params = Params::Map(params.clone());
        let mut fields = match create_post_fields(&params) {
            PostFields::Fields(fields) => fields,
            PostFields::Raw(_) => Vec::new(),
        };
        fields.extend(create_file_fields(files));

        let mut request = self.build(&target.into(), &Params::none(), cookies, customize);
        request.method = HttpMethod::Post;
        request.multipart = true;
        request.body = RequestBody::Fields(fields);

        self.dispatch(request)
            .map_err(|err| enrich_invalid_fields(err, || field_dump(&params, Some(files))))
    }

    pub fn delete(&self, target: impl Into<RequestTarget>, cookies: Option<&str>) -> Result<Response> {
        self.delete_with(target, cookies, None)
    }

    pub fn delete_with(
        &self,
        target: impl Into<RequestTarget>,
        cookies: Option<&str>,
        customize: Customize<'_>,
    ) -> Result<Response> {
        let mut request = self.build(&target.into(), &Params::none(), cookies, customize);
        request.method = HttpMethod::Delete;
        self.dispatch(request)
    }

    fn dispatch(&self, request: HttpRequest) -> Result<Response> {
        debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
        let raw = self.transport.execute(&request)?;
        debug!(status = raw.status, url = %request.url, "received response");
        Ok(Response::from_raw(raw))
    }
}

/// Turn a transport `InvalidField` failure into `Error::InvalidPostFields`
/// carrying a dump of the attempted fields. Other errors pass through.
fn enrich_invalid_fields(err: Error, dump: impl FnOnce() -> Vec<String>) -> Error {
    match err {
        Error::Transport(source @ TransportError::InvalidField(_)) => {
            let fields = dump();
            warn!(error = %source, fields = fields.len(), "transport rejected post fields");
            Error::InvalidPostFields { fields, source }
        }
        other => other,
    }
}

/// One `name => "preview"` line per field, with files overriding params of
/// the same name.
fn field_dump(params: &Params, files: Option<&IndexMap<String, PathBuf>>) -> Vec<String> {
    let mut merged: IndexMap<String, String> = match params {
        Params::Raw(raw) => return vec![format!("{:?}", preview(raw))],
        Params::Map(fields) => fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_field_value()))
            .collect(),
    };
    if let Some(files) = files {
        for (name, path) in files {
            merged.insert(name.clone(), path.display().to_string());
        }
    }
    merged
        .iter()
        .map(|(name, value)| format!("{name} => {:?}", preview(value)))
        .collect()
}

fn preview(value: &str) -> String {
    value.chars().take(FIELD_PREVIEW_CHARS).collect()
}
