//! Client configuration.
//!
//! A `ClientConfig` is owned by a `Client`. It can be built in code or
//! loaded from TOML:
//!
//! ```toml
//! timeout_ms = 30000
//! debug = true
//!
//! [global_headers]
//! User-Agent = "easyreq"
//! ```

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Headers sent with every request, underneath per-request headers.
    pub global_headers: IndexMap<String, String>,
    /// Milliseconds. Zero disables the timeout.
    pub timeout_ms: u64,
    /// Log response status, headers and body after each POST.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            global_headers: IndexMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_global_header(mut self, name: &str, value: &str) -> Self {
        self.global_headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Store `timeout` rounded up to whole milliseconds, so a non-zero
    /// duration never turns into "no timeout".
    pub fn set_timeout(&mut self, timeout: Duration) {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = u64::try_from(millis).unwrap_or(u64::MAX);
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
