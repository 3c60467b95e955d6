//! Error type definitions for clipvote

use std::time::Duration;
use thiserror::Error;

/// Top-level application error type
///
/// Every public operation of the core returns this error. None of the
/// variants are fatal to the process; they are scoped to a single request.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed submission or argument
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Referenced resource does not exist
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Database-related errors (SeaORM)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures reported by a metadata provider
///
/// The metadata cache converts all of these into a fallback value.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider did not answer within the configured bound
    #[error("Provider timed out after {timeout:?} fetching {external_id}")]
    Timeout {
        external_id: String,
        timeout: Duration,
    },

    /// The provider answered but knows nothing about the video
    #[error("No metadata available for {external_id}")]
    NotFound { external_id: String },

    /// Quota exhausted or explicitly throttled
    #[error("Rate limited by provider (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// Any other non-success HTTP status
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body could not be understood
    #[error("Failed to decode provider response: {message}")]
    Decode { message: String },

    /// No credentials were configured for the provider
    #[error("Metadata provider is not configured")]
    NotConfigured,
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create an invalid input error for a named field
    pub fn invalid_input<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for a resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::NotFound { .. })
    }
}

impl ProviderError {
    /// Short machine-friendly label, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::NotFound { .. } => "not_found",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Http { .. } => "http",
            ProviderError::Request(_) => "request",
            ProviderError::Decode { .. } => "decode",
            ProviderError::NotConfigured => "not_configured",
        }
    }
}
