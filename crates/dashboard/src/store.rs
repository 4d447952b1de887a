//! Local persistent store.
//!
//! [`KeyValueStore`] abstracts the client's durable string store (one value
//! per well-known key). [`LocalCatalog`] layers the product-cache policy on
//! top: the whole list lives under a single key, is overwritten on every
//! refresh, and corruption or write failure is logged and absorbed rather
//! than surfaced. UI-visible state is never blocked by the cache.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use brewdesk_core::{Product, Session};

/// Key holding the serialized product array.
pub const PRODUCTS_KEY: &str = "brewdesk_products_v1";
/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "brewdesk_auth_token";
/// Key holding the serialized session user.
pub const AUTH_USER_KEY: &str = "brewdesk_auth_user";

/// Errors from the underlying key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// A durable string-per-key store.
///
/// Implementations must distinguish an absent key (`Ok(None)`) from an
/// empty value; the repository's seed-once behavior depends on it.
pub trait KeyValueStore {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store itself cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails (e.g. quota or disk).
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the removal fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// File-backed store: one file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(std::fs::write(self.path_for(key), value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Io(io::Error::other("store mutex poisoned"))
}

/// The product cache plus session keys, with the swallow-and-log policy.
#[derive(Debug, Clone)]
pub struct LocalCatalog<S> {
    store: S,
}

impl<S: KeyValueStore> LocalCatalog<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Last-written product list.
    ///
    /// An absent key or a corrupt payload yields an empty list; corruption
    /// is logged and never propagates past this layer.
    pub fn read_all(&self) -> Vec<Product> {
        let raw = match self.store.get(PRODUCTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "local catalog read failed, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "local catalog corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the cached list. Best-effort: failures are logged and
    /// swallowed so a full cache never blocks the operation that triggered
    /// the write.
    pub fn write_all(&self, products: &[Product]) {
        let raw = match serde_json::to_string(products) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize product cache");
                return;
            }
        };
        if let Err(e) = self.store.set(PRODUCTS_KEY, &raw) {
            tracing::warn!(error = %e, "local catalog write failed, cache is stale");
        }
    }

    /// Whether the products key exists at all.
    ///
    /// Distinguishes "never loaded" (seed on next local read) from
    /// "present but empty" (an explicitly emptied catalog, never re-seeded).
    pub fn is_seeded(&self) -> bool {
        matches!(self.store.get(PRODUCTS_KEY), Ok(Some(_)))
    }

    /// Drop the cached list entirely.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(PRODUCTS_KEY) {
            tracing::warn!(error = %e, "local catalog clear failed");
        }
    }

    /// Current bearer token, if a session is stored.
    pub fn auth_token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY).ok().flatten()
    }

    /// Current session, if one is stored and still parseable.
    pub fn session(&self) -> Option<Session> {
        let token = self.auth_token()?;
        let user_raw = self.store.get(AUTH_USER_KEY).ok().flatten()?;
        let user = serde_json::from_str(&user_raw).ok()?;
        Some(Session { token, user })
    }

    /// Persist a session under the credential keys.
    pub fn store_session(&self, session: &Session) {
        if let Err(e) = self.store.set(AUTH_TOKEN_KEY, &session.token) {
            tracing::warn!(error = %e, "could not persist auth token");
        }
        match serde_json::to_string(&session.user) {
            Ok(raw) => {
                if let Err(e) = self.store.set(AUTH_USER_KEY, &raw) {
                    tracing::warn!(error = %e, "could not persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize session user"),
        }
    }

    /// Remove the credential keys.
    pub fn clear_session(&self) {
        let _ = self.store.remove(AUTH_TOKEN_KEY);
        let _ = self.store.remove(AUTH_USER_KEY);
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}
