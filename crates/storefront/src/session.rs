//! Authenticated-session tracking backed by a persisted credential.
//!
//! The session is a thin presence check over an opaque bearer token: if a
//! token is persisted, the user counts as signed in. No expiry validation
//! happens locally; the backend answers 401 when the token goes stale, and
//! the HTTP layer reacts by forcing [`AuthSession::logout`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur when persisting the session credential.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the backing storage failed.
    #[error("token storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent storage for the opaque auth token.
///
/// This is the browser-storage collaborator of the original design: a single
/// token string under a well-known key. Implementations must tolerate
/// clearing a token that was never saved.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Option<SecretString>;

    /// Persist the token, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the backing storage cannot be written.
    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Remove the persisted token. Clearing an absent token is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the backing storage cannot be written.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token store backed by a single file on disk.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(SecretString::from(token.to_owned()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to read token file");
                None
            }
        }
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token.expose_secret())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store for tests and token-path-less deployments.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.slot().clone()
    }

    fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        *self.slot() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Tracks whether the current session is authenticated.
///
/// Cheaply cloneable; all clones share the same state. Constructed once at
/// application startup by reading the persisted credential, mutated in
/// memory afterwards.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn TokenStore>,
    token: RwLock<Option<SecretString>>,
}

impl AuthSession {
    /// Initialize the session from the persisted credential.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let token = store.load();
        Self {
            inner: Arc::new(SessionInner {
                store,
                token: RwLock::new(token),
            }),
        }
    }

    /// Whether a session credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_token().is_some()
    }

    /// The current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read_token()
    }

    /// Mark the session authenticated by re-reading the persisted credential.
    ///
    /// The token must already have been persisted to the store by the caller
    /// (the auth client does this after a successful login); this method does
    /// not perform any network call. A no-op when nothing is persisted.
    pub fn login(&self) {
        let token = self.inner.store.load();
        if token.is_none() {
            tracing::warn!("login requested but no credential is persisted");
        }
        *self.write_token() = token;
    }

    /// Clear the persisted credential and mark the session unauthenticated.
    ///
    /// Also invoked by the HTTP layer whenever a response reports the token
    /// is no longer valid.
    pub fn logout(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "failed to clear persisted token");
        }
        *self.write_token() = None;
    }

    fn read_token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_token(&self) -> std::sync::RwLockWriteGuard<'_, Option<SecretString>> {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_session() -> (Arc<MemoryTokenStore>, AuthSession) {
        let store = Arc::new(MemoryTokenStore::new());
        let session = AuthSession::new(Arc::clone(&store) as Arc<dyn TokenStore>);
        (store, session)
    }

    #[test]
    fn test_starts_unauthenticated_with_empty_store() {
        let (_, session) = memory_session();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_starts_authenticated_when_token_persisted() {
        let store = Arc::new(MemoryTokenStore::new());
        store
            .save(&SecretString::from("tok-1".to_owned()))
            .expect("save");

        let session = AuthSession::new(store as Arc<dyn TokenStore>);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_login_picks_up_persisted_token() {
        let (store, session) = memory_session();
        assert!(!session.is_authenticated());

        store
            .save(&SecretString::from("tok-2".to_owned()))
            .expect("save");
        session.login();

        assert!(session.is_authenticated());
        let token = session.token().expect("token present");
        assert_eq!(token.expose_secret(), "tok-2");
    }

    #[test]
    fn test_login_without_persisted_token_is_noop() {
        let (_, session) = memory_session();
        session.login();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout_clears_store_and_memory() {
        let (store, session) = memory_session();
        store
            .save(&SecretString::from("tok-3".to_owned()))
            .expect("save");
        session.login();

        session.logout();

        assert!(!session.is_authenticated());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path().join("token"));

        assert!(store.load().is_none());

        store
            .save(&SecretString::from("persisted".to_owned()))
            .expect("save");
        let loaded = store.load().expect("token saved");
        assert_eq!(loaded.expose_secret(), "persisted");

        store.clear().expect("clear");
        assert!(store.load().is_none());

        // Clearing again must stay silent.
        store.clear().expect("clear absent token");
    }

    #[test]
    fn test_file_store_ignores_surrounding_whitespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("token");
        std::fs::write(&path, "  tok-4\n").expect("write");

        let store = FileTokenStore::new(path);
        let loaded = store.load().expect("token present");
        assert_eq!(loaded.expose_secret(), "tok-4");
    }
}
