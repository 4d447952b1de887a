//! The synchronizing repository.
//!
//! Composes the prober, the remote client, and the local catalog into a
//! single `load / create / update / delete` contract. Each top-level
//! operation probes availability and runs in remote mode when the server
//! answers, refreshing the local cache with the server's view; transport
//! failures degrade the single operation to local mode, silently for the
//! caller but logged. Rejected operations (`Unauthorized`, `NotFound`,
//! validation) never degrade — the fallback exists for unreachability, not
//! for refusals.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use brewdesk_core::{
    NewProduct, PLACEHOLDER_IMAGE, Price, Product, ProductId, ProductPatch, seed_catalog,
};

use crate::error::ApiError;
use crate::probe::Probe;
use crate::remote::{ImageUpload, RemoteCatalog};
use crate::store::{KeyValueStore, LocalCatalog};

/// Dual-mode product repository.
///
/// Holds no mode state between calls: every operation re-probes, so a
/// server coming back mid-session is picked up on the next call without
/// any explicit reconnect.
pub struct CatalogRepository<P, R, S> {
    prober: P,
    remote: R,
    local: LocalCatalog<S>,
}

impl<P: Probe, R: RemoteCatalog, S: KeyValueStore> CatalogRepository<P, R, S> {
    pub const fn new(prober: P, remote: R, local: LocalCatalog<S>) -> Self {
        Self {
            prober,
            remote,
            local,
        }
    }

    /// Load the catalog.
    ///
    /// Remote mode refreshes the local cache with the fetched list before
    /// returning it. Unreachability (including a list call that fails after
    /// a successful probe) falls back to the last-written local content;
    /// read operations never surface a blocking error. The first-ever local
    /// read seeds the fixed three-product catalog and persists it.
    pub async fn load(&self) -> Vec<Product> {
        if self.prober.probe().await {
            match self.remote.list().await {
                Ok(products) => {
                    self.local.write_all(&products);
                    return products;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "remote list failed after probe, using local catalog");
                }
            }
        }
        self.load_local()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before any I/O for invalid input,
    /// and propagates [`ApiError::Unauthorized`] from remote mode. A
    /// transport failure degrades to a local create instead of erroring.
    pub async fn create(
        &self,
        input: &NewProduct,
        image: Option<&ImageUpload>,
    ) -> Result<Product, ApiError> {
        let price = input.validate()?;
        if self.prober.probe().await {
            match self.remote.create(input, image).await {
                Ok(product) => {
                    self.refresh_cache().await;
                    return Ok(product);
                }
                Err(e) if e.triggers_fallback() => {
                    tracing::warn!(error = %e, "remote create unreachable, degrading to local");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.create_local(input, price, image))
    }

    /// Update a product by id, merging only the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before any I/O,
    /// [`ApiError::NotFound`] for a missing id (remote 404 included — a
    /// rejected update never falls back), and [`ApiError::Unauthorized`]
    /// from remote mode.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        image: Option<&ImageUpload>,
    ) -> Result<Product, ApiError> {
        patch.validate()?;
        if self.prober.probe().await {
            match self.remote.update(id, patch, image).await {
                Ok(product) => {
                    self.refresh_cache().await;
                    return Ok(product);
                }
                Err(e) if e.triggers_fallback() => {
                    tracing::warn!(error = %e, "remote update unreachable, degrading to local");
                }
                Err(e) => return Err(e),
            }
        }
        self.update_local(id, patch, image)
    }

    /// Delete a product by id.
    ///
    /// Remote mode surfaces 404 as [`ApiError::NotFound`]; local mode is an
    /// idempotent no-op for an absent id (`Ok(None)`). The asymmetry is
    /// deliberate and matches the rest of the fallback model: the remote
    /// answer is authoritative, the local store is lenient.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError::Unauthorized`] and [`ApiError::NotFound`]
    /// from remote mode.
    pub async fn delete(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        if self.prober.probe().await {
            match self.remote.delete(id).await {
                Ok(deleted) => {
                    self.refresh_cache().await;
                    return Ok(Some(deleted.deleted_product));
                }
                Err(e) if e.triggers_fallback() => {
                    tracing::warn!(error = %e, "remote delete unreachable, degrading to local");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(self.delete_local(id))
    }

    /// Borrow the local catalog (session keys, cache inspection).
    pub const fn local(&self) -> &LocalCatalog<S> {
        &self.local
    }

    /// Re-pull the list after a successful remote mutation so the cache
    /// reflects the server's view. Best-effort: if the refresh itself hits
    /// a transport failure the mutation still succeeded, so the stale
    /// cache is left in place with a warning.
    async fn refresh_cache(&self) {
        match self.remote.list().await {
            Ok(products) => self.local.write_all(&products),
            Err(e) => {
                tracing::warn!(error = %e, "cache refresh failed, local cache is stale");
            }
        }
    }

    fn load_local(&self) -> Vec<Product> {
        if self.local.is_seeded() {
            return self.local.read_all();
        }
        let seed = seed_catalog();
        self.local.write_all(&seed);
        seed
    }

    fn create_local(
        &self,
        input: &NewProduct,
        price: Price,
        image: Option<&ImageUpload>,
    ) -> Product {
        let product = Product {
            id: ProductId::generate(),
            name: input.name.clone(),
            price,
            description: input.description.clone(),
            category: input.category.clone(),
            stock: input.stock,
            image: image.map_or_else(|| PLACEHOLDER_IMAGE.to_owned(), data_uri),
            created_at: Some(chrono::Utc::now()),
            updated_at: None,
        };
        let mut products = self.load_local();
        // Head insertion keeps most-recent-first ordering in both modes.
        products.insert(0, product.clone());
        self.local.write_all(&products);
        product
    }

    fn update_local(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        image: Option<&ImageUpload>,
    ) -> Result<Product, ApiError> {
        let mut products = self.load_local();
        let Some(product) = products.iter_mut().find(|p| p.id == *id) else {
            return Err(ApiError::NotFound(format!("no product {id} in local catalog")));
        };
        patch.apply_to(product);
        if let Some(image) = image {
            product.image = data_uri(image);
        }
        let updated = product.clone();
        self.local.write_all(&products);
        Ok(updated)
    }

    fn delete_local(&self, id: &ProductId) -> Option<Product> {
        let mut products = self.load_local();
        let position = products.iter().position(|p| p.id == *id)?;
        let removed = products.remove(position);
        self.local.write_all(&products);
        Some(removed)
    }
}

/// Inline an uploaded image as a data URI, the local-mode stand-in for the
/// server's `/uploads/...` path.
fn data_uri(image: &ImageUpload) -> String {
    format!(
        "data:{};base64,{}",
        image.content_type,
        BASE64.encode(&image.bytes)
    )
}
