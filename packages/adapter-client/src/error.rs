//! Error types for the adapter client.

use thiserror::Error;

use crate::types::AdapterResponse;

/// Result type for adapter client operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Message key shown when the service cannot be reached.
pub const KEY_SERVICE_OFFLINE: &str = "service-offline";
/// Message key shown for a non-200 answer. Takes the status code as `$1`.
pub const KEY_SERVICE_ERROR: &str = "service-error";
/// Message key shown when the body is not a valid adapter response.
pub const KEY_INVALID_RESPONSE: &str = "invalid-response";

/// Adapter client errors.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Configuration error (unusable base URL, client build failure)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection refused, DNS failure, timeout
    #[error("Adapter service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Service answered with a status other than 200
    #[error("Adapter service returned HTTP {status}")]
    Http { status: u16, body: String },

    /// Body could not be decoded
    #[error("Invalid adapter response: {0}")]
    InvalidJson(String),
}

impl AdapterError {
    pub fn message_key(&self) -> &'static str {
        match self {
            AdapterError::Config(_) | AdapterError::ServiceUnavailable(_) => KEY_SERVICE_OFFLINE,
            AdapterError::Http { .. } => KEY_SERVICE_ERROR,
            AdapterError::InvalidJson(_) => KEY_INVALID_RESPONSE,
        }
    }
}

/// Outcome of a single `POST /adapt` call.
///
/// Failures are values, not errors: every variant renders to something the
/// user can read.
#[derive(Debug, Clone, PartialEq)]
pub enum AdaptOutcome {
    Ok(AdapterResponse),
    ServiceUnavailable,
    HttpError(u16),
    InvalidJson,
}

impl AdaptOutcome {
    pub fn from_error(error: &AdapterError) -> Self {
        match error {
            AdapterError::Config(_) | AdapterError::ServiceUnavailable(_) => {
                AdaptOutcome::ServiceUnavailable
            }
            AdapterError::Http { status, .. } => AdaptOutcome::HttpError(*status),
            AdapterError::InvalidJson(_) => AdaptOutcome::InvalidJson,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, AdaptOutcome::Ok(_))
    }

    /// Message key for the failure variants, `None` on success.
    pub fn message_key(&self) -> Option<&'static str> {
        match self {
            AdaptOutcome::Ok(_) => None,
            AdaptOutcome::ServiceUnavailable => Some(KEY_SERVICE_OFFLINE),
            AdaptOutcome::HttpError(_) => Some(KEY_SERVICE_ERROR),
            AdaptOutcome::InvalidJson => Some(KEY_INVALID_RESPONSE),
        }
    }

    /// Positional parameters for the failure message.
    pub fn message_params(&self) -> Vec<String> {
        match self {
            AdaptOutcome::HttpError(code) => vec![code.to_string()],
            _ => Vec::new(),
        }
    }

    pub fn into_response(self) -> Option<AdapterResponse> {
        match self {
            AdaptOutcome::Ok(response) => Some(response),
            _ => None,
        }
    }
}

impl From<Result<AdapterResponse>> for AdaptOutcome {
    fn from(result: Result<AdapterResponse>) -> Self {
        match result {
            Ok(response) => AdaptOutcome::Ok(response),
            Err(e) => AdaptOutcome::from_error(&e),
        }
    }
}
