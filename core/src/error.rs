//! Error types for the scheduling API client.
//!
//! # Design
//! Every failure of a round-trip collapses into `ApiError`. Non-2xx responses
//! keep the raw status and body text so pages can show the backend's own
//! message in their banners.

use thiserror::Error;

/// Errors returned by `SchedulingClient` parse methods and by transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299.
    #[error("HTTP {status} - {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (connection refused, I/O error).
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
