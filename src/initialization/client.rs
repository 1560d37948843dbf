//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client with the crate's defaults.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header (defaults to [`DEFAULT_USER_AGENT`])
/// - Timeout (defaults to [`DEFAULT_TIMEOUT`]); per-request options can
///   shorten it further
/// - Redirect following enabled
///
/// The client is cheap to clone and should be shared across all requests of
/// a run; connection pooling only works through a shared client.
///
/// # Arguments
///
/// * `timeout` - Overall request timeout, or `None` for the default
/// * `user_agent` - User-Agent header value, or `None` for the default
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(
    timeout: Option<Duration>,
    user_agent: Option<&str>,
) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
        .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_defaults() {
        let client = init_client(None, None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_init_client_with_custom_settings() {
        let client = init_client(Some(Duration::from_secs(5)), Some("fetch_pool-test/0.1"));
        assert!(client.is_ok());
    }
}
