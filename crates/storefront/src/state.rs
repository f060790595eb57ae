//! Application state shared across the storefront.
//!
//! The single construction point: configuration is read once, the token
//! store and session are built from it, and every store and client hangs off
//! this struct. Nothing here is a global - embedding code creates an
//! [`AppState`] at startup, hands clones to whatever needs them, and drops
//! it at shutdown (the cart and account stores are deliberately volatile,
//! so teardown has nothing to flush).

use std::sync::Arc;

use crate::account::{AddressBook, Favorites};
use crate::auth::AuthClient;
use crate::cart::CartStore;
use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::session::{AuthSession, FileTokenStore, MemoryTokenStore, TokenStore};

/// Application state shared across the storefront.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: AuthSession,
    catalog: CatalogClient,
    auth: AuthClient,
    cart: CartStore,
    addresses: AddressBook,
    favorites: Favorites,
}

impl AppState {
    /// Create the application state.
    ///
    /// The token store is file-backed when the configuration names a path,
    /// in-memory otherwise; the session is initialized from it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> ApiResult<Self> {
        let store: Arc<dyn TokenStore> = match &config.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };

        let session = AuthSession::new(Arc::clone(&store));
        let api = ApiClient::new(&config, session.clone())?;
        let catalog = CatalogClient::new(api.clone());
        let auth = AuthClient::new(api, session.clone(), store);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                catalog,
                auth,
                cart: CartStore::new(),
                addresses: AddressBook::new(),
                favorites: Favorites::new(),
            }),
        })
    }

    /// Create the application state from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the HTTP client
    /// cannot be constructed.
    pub fn from_env() -> Result<Self, AppStateError> {
        let config = StorefrontConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the auth session.
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.inner.session
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the auth client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the address book.
    #[must_use]
    pub fn addresses(&self) -> &AddressBook {
        &self.inner.addresses
    }

    /// Get a reference to the favorites list.
    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.inner.favorites
    }
}

/// Errors that can occur while building [`AppState`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Api(#[from] crate::error::ApiError),
}
