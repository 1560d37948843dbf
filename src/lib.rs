//! fetch_pool: bounded-concurrency task execution and retrying HTTP requests
//!
//! This library provides the two primitives needed to fetch many resources
//! politely: a concurrency-limited task pool that preserves input order, and
//! a retry runner that wraps a fallible asynchronous operation with a
//! bounded attempt budget and an optional result validator. On top of them
//! sits a small HTTP request primitive (GET/POST, form serialization,
//! progress reporting) built on `reqwest`.
//!
//! The two layers compose externally: a worker passed to the pool typically
//! performs a retried request, so N resources are fetched with at most
//! `limit` requests in flight and each request independently retried.
//!
//! # Example
//!
//! ```no_run
//! use fetch_pool::{init_client, run_pool, fetch_text};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = init_client(None, None)?;
//!
//! let urls = vec![
//!     "https://example.com/a".to_string(),
//!     "https://example.com/b".to_string(),
//!     "https://example.com/c".to_string(),
//! ];
//!
//! // At most 2 requests in flight; bodies come back in input order.
//! let bodies = run_pool(2, urls, |url| {
//!     let client = client.clone();
//!     async move { fetch_text(&client, &url).await }
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod initialization;
mod pool;
mod request;
mod retry;

// Re-export public API
pub use error_handling::{FetchError, InitializationError};
pub use initialization::{init_client, init_logger_with};
pub use pool::{run_pool, run_pool_settled};
pub use request::{fetch_text, request, HttpResponse, Method, ProgressFn, RequestOptions, ValidateFn};
pub use retry::{
    default_backoff, with_retry, with_retry_delays, with_retry_delays_validated,
    with_retry_validated,
};
