//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::AuthService;
use crate::store::{ProductStore, StoreError, UploadStore, UserStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    products: ProductStore,
    users: UserStore,
    uploads: UploadStore,
    auth: AuthService,
}

impl AppState {
    /// Open the stores under the configured directories and assemble the
    /// shared state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a data directory cannot be created or an
    /// existing data file cannot be read.
    pub async fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let products = ProductStore::open(config.data_dir.join("products.json")).await?;
        let users = UserStore::open(config.data_dir.join("users.json")).await?;
        let uploads = UploadStore::open(config.upload_dir.clone())?;
        let auth = AuthService::new(&config.jwt_secret, config.token_ttl_hours);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                users,
                uploads,
                auth,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn products(&self) -> &ProductStore {
        &self.inner.products
    }

    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    #[must_use]
    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
