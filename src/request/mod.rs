//! Retrying HTTP request primitive.
//!
//! [`request`] is the single transport boundary of the crate: it normalizes
//! the method, serializes the form data (query string for GET, body for
//! POST), attaches default headers, issues the call through `reqwest`, and
//! wraps the whole attempt in the retry runner.
//!
//! A response with an error status code still resolves successfully; status
//! interpretation belongs to the caller, who can turn unwanted statuses into
//! retries via [`RequestOptions::validate`]. Only connection-level failures
//! (abort, network error, timeout) reject on their own.

mod body;
mod headers;
mod types;

pub use types::{HttpResponse, Method, ProgressFn, RequestOptions, ValidateFn};

use anyhow::Result;
use futures::StreamExt;

use crate::config::DEFAULT_REQUEST_RETRIES;
use crate::error_handling::FetchError;
use crate::retry::retry_inner;
use body::{append_query, serialize_form};
use headers::DefaultHeaders;

/// Issues an HTTP request with retry, returning the final URL, body text,
/// and status code.
///
/// The request is re-attempted up to `options.retry_attempts` times on
/// transport failure or validation failure, with no delay between attempts.
/// The form data is percent-encoded and either appended to the query string
/// (GET) or sent as an `application/x-www-form-urlencoded` body (POST).
///
/// # Errors
///
/// Returns [`FetchError::Usage`] immediately for an empty URL (unsupported
/// methods are unrepresentable in [`Method`]; parse text with
/// [`Method::parse`]), or the final attempt's transport/validation failure
/// once the budget is exhausted.
pub async fn request(
    client: &reqwest::Client,
    url: &str,
    options: &RequestOptions,
) -> Result<HttpResponse> {
    if url.trim().is_empty() {
        return Err(FetchError::Usage("request URL must not be empty".into()).into());
    }

    let form_body = serialize_form(&options.form);
    let target = match options.method {
        Method::Get => append_query(url, &form_body),
        Method::Post => url.to_string(),
    };
    let attempts = if options.retry_attempts == 0 {
        DEFAULT_REQUEST_RETRIES
    } else {
        options.retry_attempts
    };

    let validator = options.validate.as_deref();
    retry_inner(
        || send_once(client, &target, &form_body, options),
        attempts,
        validator.map(|validate| move |response: &HttpResponse| validate(response)),
    )
    .await
}

/// Fetches a URL with default options and returns the response body text.
///
/// Convenience wrapper for the common "GET this page's source" case; parsing
/// the text into a document is up to the caller.
///
/// # Errors
///
/// Propagates the failure from [`request`].
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = request(client, url, &RequestOptions::default()).await?;
    Ok(response.body)
}

/// One attempt: send the request and stream the body in.
async fn send_once(
    client: &reqwest::Client,
    url: &str,
    form_body: &str,
    options: &RequestOptions,
) -> Result<HttpResponse> {
    let started = std::time::Instant::now();

    let mut builder = match options.method {
        Method::Get => client.get(url),
        Method::Post => client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .body(form_body.to_string()),
    };
    builder = DefaultHeaders::apply(builder).timeout(options.timeout);
    for (name, value) in &options.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder.send().await.map_err(FetchError::Transport)?;
    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let total = response.content_length();

    let mut buffered: Vec<u8> = Vec::new();
    let mut loaded = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Transport)?;
        loaded += chunk.len() as u64;
        // Progress is only reported when the transport gave us a total to
        // report against.
        if let (Some(total), Some(on_progress)) = (total, options.on_progress.as_ref()) {
            on_progress(loaded, total);
        }
        buffered.extend_from_slice(&chunk);
    }

    log::debug!(
        "reqTime: {} ms ; {} {}",
        started.elapsed().as_millis(),
        options.method.as_str(),
        url
    );

    Ok(HttpResponse {
        final_url,
        body: String::from_utf8_lossy(&buffered).into_owned(),
        status,
    })
}
