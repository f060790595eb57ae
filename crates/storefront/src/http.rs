//! HTTP plumbing for the backend API.
//!
//! [`ApiClient`] owns the `reqwest` client, attaches the bearer credential
//! to every request, and intercepts authorization failures in one place:
//! a 401 response clears the session before the error reaches the caller,
//! so individual call sites never implement their own 401 handling.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::AuthSession;

/// Client for the backend REST API.
///
/// Cheaply cloneable; all clones share the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: AuthSession,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &StorefrontConfig, session: AuthSession) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                session,
            }),
        })
    }

    /// The session this client reports authorization failures to.
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// Issue a GET request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] describing the failure.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path)?;
        let mut request = self.inner.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.execute(request).await
    }

    /// Issue a POST request with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] describing the failure.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path)?;
        let request = self.inner.http.post(url).json(body);
        self.execute(request).await
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Backend {
                status: StatusCode::BAD_REQUEST,
                message: format!("invalid request path {path:?}: {e}"),
            })
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        let request = match self.inner.session.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Cross-cutting interception: the credential is no longer valid,
            // so the session transitions to unauthenticated here and nowhere
            // else.
            tracing::warn!("authorization failure, clearing session");
            self.inner.session.logout();
            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(status.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Backend {
                status,
                message: extract_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The backend answers either a JSON object (`message`, or RFC 7807 `title`)
/// or plain text. An empty result means "no usable message" and callers fall
/// back to a generic one.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "title", "detail"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str)
                && !text.is_empty()
            {
                return text.to_owned();
            }
        }
        if let Some(text) = value.as_str() {
            return text.to_owned();
        }
        return String::new();
    }

    let trimmed = body.trim();
    if trimmed.len() <= 200 {
        trimmed.to_owned()
    } else {
        String::new()
    }
}
