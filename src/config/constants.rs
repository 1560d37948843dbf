//! Configuration constants.
//!
//! This module defines the default operational parameters used throughout the
//! crate: attempt budgets, timeouts, and backoff tuning.

use std::time::Duration;

/// Default attempt budget for [`crate::with_retry`] when the caller passes `0`.
pub const DEFAULT_RETRY_ATTEMPTS: usize = 5;

/// Default attempt budget for [`crate::request`] when
/// [`crate::RequestOptions::retry_attempts`] is `0`.
///
/// Requests default to a smaller budget than bare retried operations: a
/// request that failed three times in a row is usually a dead endpoint, and
/// batch runs should move on to the next URL.
pub const DEFAULT_REQUEST_RETRIES: usize = 3;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default User-Agent string for HTTP requests.
///
/// Users can override this by building their own client or by setting a
/// `User-Agent` header in [`crate::RequestOptions::headers`].
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Backoff tuning for `retry::default_backoff()`
/// Initial delay before the first re-attempt in milliseconds
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Multiplier applied to the delay after each re-attempt
pub const RETRY_FACTOR: u64 = 2;
/// Ceiling on the delay between re-attempts in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Number of delays produced by `default_backoff()` (re-attempts, not
/// counting the initial attempt)
pub const RETRY_BACKOFF_STEPS: usize = 3;
