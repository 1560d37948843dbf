//! Error handling.
//!
//! Error types are categorized by how the retry layer treats them:
//! - **Usage**: caller mistakes, surfaced immediately
//! - **Transport / Validation**: transient, consume retry budget
//! - **TaskPanic**: recorded at the task's result slot inside the pool

mod types;

pub use types::{FetchError, InitializationError};
