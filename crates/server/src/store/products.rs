//! Product catalog store backed by `products.json`.

use std::path::PathBuf;

use tokio::sync::Mutex;

use brewdesk_core::{Product, ProductId};

use super::StoreError;

/// File-backed product catalog.
///
/// New products are inserted at the head so the list stays
/// most-recent-first, the order every consumer paginates in.
pub struct ProductStore {
    path: PathBuf,
    products: Mutex<Vec<Product>>,
}

impl ProductStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty catalog. A corrupt file is logged
    /// and also treated as empty; the next successful write replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the parent directory cannot be created
    /// or an existing file cannot be read.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let products = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(products) => products,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "product file corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            products: Mutex::new(products),
        })
    }

    pub async fn list(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    pub async fn get(&self, id: &ProductId) -> Option<Product> {
        self.products
            .lock()
            .await
            .iter()
            .find(|p| p.id == *id)
            .cloned()
    }

    /// Insert at the head and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file write fails.
    pub async fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.lock().await;
        products.insert(0, product);
        self.persist(&products).await
    }

    /// Apply `mutate` to the product with `id` and persist.
    ///
    /// Returns `Ok(None)` if no product has that id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file write fails.
    pub async fn update_with<F>(
        &self,
        id: &ProductId,
        mutate: F,
    ) -> Result<Option<Product>, StoreError>
    where
        F: FnOnce(&mut Product),
    {
        let mut products = self.products.lock().await;
        let Some(product) = products.iter_mut().find(|p| p.id == *id) else {
            return Ok(None);
        };
        mutate(product);
        let updated = product.clone();
        self.persist(&products).await?;
        Ok(Some(updated))
    }

    /// Remove the product with `id` and persist.
    ///
    /// Returns `Ok(None)` if no product has that id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file write fails.
    pub async fn remove(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.lock().await;
        let Some(position) = products.iter().position(|p| p.id == *id) else {
            return Ok(None);
        };
        let removed = products.remove(position);
        self.persist(&products).await?;
        Ok(Some(removed))
    }

    async fn persist(&self, products: &[Product]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(products)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
