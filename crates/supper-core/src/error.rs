//! Shared error types for Supper.
//!
//! User-facing, localized text lives with the front-end; the `Display`
//! impls here are for logs and verbatim surfacing.

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure categories when acquiring the device position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location information is unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Unknown location error")]
    Unknown,
}

/// Errors raised while asking the provider for recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    #[error("Failed to get recommendations: {message}")]
    Provider { message: String },

    #[error("An unknown error occurred while fetching recommendations.")]
    Unknown,
}

impl RecommendationError {
    /// Wrap a provider failure message. Blank messages collapse to `Unknown`.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            RecommendationError::Unknown
        } else {
            RecommendationError::Provider { message }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
