//! Retrying operation runner.
//!
//! Wraps a single fallible asynchronous operation with a bounded number of
//! re-attempts and an optional response validator. Attempts are strictly
//! sequential and, by default, immediate: no delay is inserted between them.
//! [`with_retry_delays`] is the hardening variant that sleeps between
//! attempts according to a caller-supplied schedule such as
//! [`default_backoff`].
//!
//! The runner assumes the operation is safe to re-invoke; it performs no
//! side-effect suppression. Intermediate failures are swallowed (logged at
//! debug level only) and the final failure carries the last-encountered
//! reason.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    DEFAULT_RETRY_ATTEMPTS, RETRY_BACKOFF_STEPS, RETRY_FACTOR, RETRY_INITIAL_DELAY_MS,
    RETRY_MAX_DELAY_SECS,
};
use crate::error_handling::FetchError;

/// Runs `operation` until it succeeds or the attempt budget is exhausted.
///
/// `max_attempts` is the total number of invocations, not the number of
/// re-attempts; `0` normalizes to [`DEFAULT_RETRY_ATTEMPTS`]. There is no
/// delay between attempts.
///
/// # Errors
///
/// Returns the failure from the final attempt once the budget is exhausted.
pub async fn with_retry<F, Fut, T>(operation: F, max_attempts: usize) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_inner(
        operation,
        max_attempts,
        None::<fn(&T) -> Result<()>>,
    )
    .await
}

/// Like [`with_retry`], but additionally runs `validator` against each
/// successful result.
///
/// A validator failure counts against the attempt budget exactly like an
/// operation failure, even though the underlying operation succeeded. Any
/// side effect the validator performed before failing is not undone. A
/// validator failure is surfaced as [`FetchError::Validation`] carrying the
/// validator's reason.
///
/// # Errors
///
/// Returns the failure from the final attempt (operation or validator) once
/// the budget is exhausted.
pub async fn with_retry_validated<F, Fut, T, V>(
    operation: F,
    max_attempts: usize,
    validator: V,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    V: FnMut(&T) -> Result<()>,
{
    retry_inner(operation, max_attempts, Some(validator)).await
}

/// Like [`with_retry`], but sleeps between attempts according to `delays`.
///
/// The attempt budget is `delays.len() + 1`: one initial attempt plus one
/// re-attempt per delay. Pass [`default_backoff`] for the standard
/// exponential schedule.
///
/// # Errors
///
/// Returns the failure from the final attempt once `delays` is exhausted.
pub async fn with_retry_delays<F, Fut, T, I>(operation: F, delays: I) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    I: IntoIterator<Item = Duration>,
{
    delays_inner(operation, delays, None::<fn(&T) -> Result<()>>).await
}

/// Like [`with_retry_delays`], but additionally runs `validator` against
/// each successful result.
///
/// Attempt accounting is identical to [`with_retry_validated`]: a validator
/// failure consumes the next delay exactly like an operation failure and is
/// surfaced as [`FetchError::Validation`].
///
/// # Errors
///
/// Returns the failure from the final attempt (operation or validator) once
/// `delays` is exhausted.
pub async fn with_retry_delays_validated<F, Fut, T, I, V>(
    operation: F,
    delays: I,
    validator: V,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    I: IntoIterator<Item = Duration>,
    V: FnMut(&T) -> Result<()>,
{
    delays_inner(operation, delays, Some(validator)).await
}

async fn delays_inner<F, Fut, T, I, V>(
    mut operation: F,
    delays: I,
    mut validator: Option<V>,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    I: IntoIterator<Item = Duration>,
    V: FnMut(&T) -> Result<()>,
{
    let mut delays = delays.into_iter();
    loop {
        match attempt(&mut operation, &mut validator).await {
            Ok(value) => return Ok(value),
            Err(failure) => match delays.next() {
                Some(delay) => {
                    log::debug!(
                        "attempt failed, retrying in {} ms: {failure:#}",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                None => return Err(failure),
            },
        }
    }
}

/// The standard exponential backoff schedule for [`with_retry_delays`].
///
/// Starts at [`RETRY_INITIAL_DELAY_MS`], multiplies by [`RETRY_FACTOR`] each
/// step, and is capped at [`RETRY_MAX_DELAY_SECS`] and
/// [`RETRY_BACKOFF_STEPS`] re-attempts.
pub fn default_backoff() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_INITIAL_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(RETRY_BACKOFF_STEPS)
}

pub(crate) async fn retry_inner<F, Fut, T, V>(
    mut operation: F,
    max_attempts: usize,
    mut validator: Option<V>,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    V: FnMut(&T) -> Result<()>,
{
    let mut remaining = if max_attempts == 0 {
        DEFAULT_RETRY_ATTEMPTS
    } else {
        max_attempts
    };
    loop {
        // Budget is consumed up front so a crashed attempt still counts.
        remaining -= 1;
        let failure = match attempt(&mut operation, &mut validator).await {
            Ok(value) => return Ok(value),
            Err(failure) => failure,
        };
        if remaining == 0 {
            return Err(failure);
        }
        log::debug!("attempt failed, {remaining} attempt(s) left: {failure:#}");
    }
}

/// One attempt: run the operation, then the validator if one is set. A
/// validator rejection is reported as [`FetchError::Validation`].
async fn attempt<F, Fut, T, V>(operation: &mut F, validator: &mut Option<V>) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    V: FnMut(&T) -> Result<()>,
{
    let value = operation().await?;
    if let Some(validate) = validator.as_mut() {
        if let Err(reason) = validate(&value) {
            return Err(FetchError::Validation(reason.to_string()).into());
        }
    }
    Ok(value)
}
