//! Request option and response types.

use std::time::Duration;

use anyhow::Result;

use crate::config::{DEFAULT_REQUEST_RETRIES, DEFAULT_TIMEOUT};
use crate::error_handling::FetchError;

/// HTTP method accepted by the request primitive.
///
/// Only `GET` and `POST` are supported; anything else is a usage error, not
/// a transport failure, and is never retried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// HTTP GET; the serialized form is appended as a query string.
    #[default]
    Get,
    /// HTTP POST; the serialized form is sent as the request body.
    Post,
}

impl Method {
    /// Parses a method from free-form text, trimming whitespace and ignoring
    /// case, so `" post "` parses as [`Method::Post`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Usage`] for anything other than GET or POST.
    pub fn parse(value: &str) -> Result<Self, FetchError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" | "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(FetchError::Usage(format!("unsupported method: {other}"))),
        }
    }

    /// The canonical method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// Response descriptor returned by [`crate::request`].
///
/// Mirrors the narrow transport boundary the rest of the crate depends on:
/// the URL after redirects, the body text, and the status code. Parsing the
/// body into a document is the caller's concern.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The URL the response was ultimately served from, after redirects.
    pub final_url: String,
    /// The response body decoded as text.
    pub body: String,
    /// The HTTP status code.
    pub status: u16,
}

/// Progress callback: `(loaded, total)` in bytes.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Response validator: a failure counts against the retry budget.
pub type ValidateFn = Box<dyn Fn(&HttpResponse) -> Result<()> + Send + Sync>;

/// Options for a single [`crate::request`] call.
pub struct RequestOptions {
    /// HTTP method (GET or POST only).
    pub method: Method,
    /// Key-value form data. Serialized as `key=value&...` with
    /// percent-encoded values: appended to the query string for GET, sent as
    /// the body for POST.
    pub form: Vec<(String, String)>,
    /// Extra headers; these override the default header set.
    pub headers: Vec<(String, String)>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Total attempt budget; `0` normalizes to [`DEFAULT_REQUEST_RETRIES`].
    pub retry_attempts: usize,
    /// Invoked per received chunk with `(loaded, total)`, but only when the
    /// transport reports a computable total length.
    pub on_progress: Option<ProgressFn>,
    /// Runs against each successful response; a validation failure is
    /// retried exactly like a transport failure.
    pub validate: Option<ValidateFn>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            form: Vec::new(),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            retry_attempts: DEFAULT_REQUEST_RETRIES,
            on_progress: None,
            validate: None,
        }
    }
}

impl std::fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("form", &self.form)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "..."))
            .field("validate", &self.validate.as_ref().map(|_| "..."))
            .finish()
    }
}
