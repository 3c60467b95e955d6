//! Centralized error handling for clipvote
//!
//! Errors fall into two groups:
//!
//! - **Request errors** ([`AppError`]): invalid submissions, unknown pairs and
//!   storage failures. These surface to whoever called the operation.
//! - **Provider errors** ([`ProviderError`]): the external metadata source was
//!   unreachable or had nothing usable. These are absorbed by the metadata
//!   cache and never reach callers of the listing operations.
//!
//! # Usage
//!
//! ```rust
//! use clipvote::errors::{AppError, AppResult};
//!
//! fn check_label(label: &str) -> AppResult<()> {
//!     if label.trim().is_empty() {
//!         return Err(AppError::invalid_input("submitter_label", "must not be empty"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for metadata provider Results
pub type ProviderResult<T> = Result<T, ProviderError>;
