//! Authentication against the backend auth endpoints.
//!
//! The client performs the network call, persists the returned token, and
//! only then marks the session authenticated - mirroring the split in
//! [`crate::session`]: the session itself never talks to the network.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::session::{AuthSession, TokenStore, TokenStoreError};

/// Login request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Successful auth response.
///
/// `expires_at` is informational only: the storefront never validates expiry
/// locally, the backend answers 401 when the token goes stale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Errors from login/register flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error("failed to persist credential: {0}")]
    TokenPersist(#[from] TokenStoreError),
}

impl AuthError {
    /// The message a view should display for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(api) => api.user_message(),
            Self::TokenPersist(_) => "Could not save your session. Please try again.".to_owned(),
        }
    }
}

/// Client for the backend auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    session: AuthSession,
    store: Arc<dyn TokenStore>,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// `store` must be the same store the session was initialized from, so
    /// that [`AuthSession::login`] observes the token this client persists.
    #[must_use]
    pub fn new(api: ApiClient, session: AuthSession, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            session,
            store,
        }
    }

    /// Log in with email and password.
    ///
    /// On success the token is persisted and the session marked
    /// authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] with the backend's message when the credentials
    /// are rejected, or a transport/persistence error otherwise. Form values
    /// at the call site are untouched either way.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let response: AuthResponse = self.api.post_json("/api/auth/login", request).await?;
        self.establish_session(&response)?;
        Ok(response)
    }

    /// Register a new account.
    ///
    /// The backend issues a token on successful registration, so this logs
    /// the new user straight in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] as for [`AuthClient::login`].
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let response: AuthResponse = self.api.post_json("/api/auth/register", request).await?;
        self.establish_session(&response)?;
        Ok(response)
    }

    /// Clear the session and its persisted credential.
    pub fn logout(&self) {
        self.session.logout();
    }

    fn establish_session(&self, response: &AuthResponse) -> Result<(), TokenStoreError> {
        // Persist first; the session only marks what the store holds.
        self.store
            .save(&SecretString::from(response.token.clone()))?;
        self.session.login();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StorefrontConfig;
    use crate::session::MemoryTokenStore;

    fn unreachable_auth() -> (AuthClient, AuthSession) {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_API_BASE_URL" => Some("http://127.0.0.1:9".to_owned()),
            "STOREFRONT_REQUEST_TIMEOUT_SECS" => Some("1".to_owned()),
            _ => None,
        })
        .expect("config");
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let session = AuthSession::new(Arc::clone(&store));
        let api = ApiClient::new(&config, session.clone()).expect("client");
        (
            AuthClient::new(api, session.clone(), store),
            session,
        )
    }

    #[tokio::test]
    async fn test_failed_login_leaves_session_unauthenticated() {
        let (auth, session) = unreachable_auth();

        let result = auth
            .login(&LoginRequest {
                email: "a@b.com".to_owned(),
                password: "secret1".to_owned(),
            })
            .await;

        assert!(result.is_err());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_establish_session_persists_then_marks() {
        let (auth, session) = unreachable_auth();
        let response = AuthResponse {
            token: "tok-99".to_owned(),
            expires_at: Utc::now(),
        };

        auth.establish_session(&response).expect("persist");

        assert!(session.is_authenticated());
    }

    #[test]
    fn test_request_serialization_matches_wire_format() {
        let request = RegisterRequest {
            email: "a@b.com".to_owned(),
            password: "Velora123".to_owned(),
            full_name: Some("Ada Lovelace".to_owned()),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["fullName"], "Ada Lovelace");

        let anonymous = RegisterRequest {
            email: "a@b.com".to_owned(),
            password: "Velora123".to_owned(),
            full_name: None,
        };
        let json = serde_json::to_value(&anonymous).expect("serialize");
        assert!(json.get("fullName").is_none());
    }

    #[test]
    fn test_auth_response_parses_backend_payload() {
        let json = r#"{"token":"abc.def.ghi","expiresAt":"2026-08-05T12:00:00Z"}"#;
        let response: AuthResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.token, "abc.def.ghi");
    }
}
