//! Unified error handling for backend API calls.
//!
//! Network failures surface as a tagged [`ApiError`] rather than an opaque
//! payload: callers match on the kind, and [`ApiError::user_message`] yields
//! the text a view would display. Backend-provided messages are shown
//! verbatim when present; transport failures fall back to a generic message.

use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend rejected the request with a non-success status.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Human-readable message extracted from the response body.
        message: String,
    },

    /// The session credential was rejected (HTTP 401).
    ///
    /// By the time this error is observed the HTTP layer has already forced
    /// the session to log out; call sites do not handle 401 themselves.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The message a view should display for this error.
    ///
    /// Backend messages pass through verbatim; everything else maps to a
    /// generic message so transport details never leak into the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } if !message.is_empty() => message.clone(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_owned(),
            Self::NotFound(_) => "The requested item could not be found.".to_owned(),
            _ => "Something went wrong. Please try again.".to_owned(),
        }
    }
}

/// Result type alias for [`ApiError`].
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_shown_verbatim() {
        let err = ApiError::Backend {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Email already registered".to_owned(),
        };
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_empty_backend_message_falls_back() {
        let err = ApiError::Backend {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_unauthorized_message() {
        let msg = ApiError::Unauthorized.user_message();
        assert!(msg.contains("sign in"));
    }
}
