//! Typed client for the remote product API.
//!
//! [`RemoteCatalog`] is the seam the synchronizing repository is generic
//! over; [`HttpCatalog`] is the production implementation. Mutations attach
//! the bearer token read from the credential store at call time, and switch
//! to multipart encoding when an image accompanies the record.

use std::sync::Arc;

use reqwest::{Response, StatusCode, multipart};
use serde::Deserialize;
use tracing::instrument;

use brewdesk_core::{NewProduct, Product, ProductId, ProductPatch, ValidationError};

use crate::error::ApiError;
use crate::store::{KeyValueStore, LocalCatalog};

/// An image payload accompanying a create or update.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful remote delete.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub message: String,
    pub deleted_product: Product,
}

/// Operations against the remote product collection.
///
/// Every method may fail with [`ApiError::Transport`] — the repository's
/// fallback trigger. `Unauthorized` and `NotFound` are real application
/// errors and are never treated as unreachability.
pub trait RemoteCatalog {
    fn list(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>>;

    fn get(&self, id: &ProductId) -> impl Future<Output = Result<Product, ApiError>>;

    fn create(
        &self,
        input: &NewProduct,
        image: Option<&ImageUpload>,
    ) -> impl Future<Output = Result<Product, ApiError>>;

    fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        image: Option<&ImageUpload>,
    ) -> impl Future<Output = Result<Product, ApiError>>;

    fn delete(&self, id: &ProductId) -> impl Future<Output = Result<Deleted, ApiError>>;
}

/// HTTP implementation of [`RemoteCatalog`] over `reqwest`.
///
/// The bearer token is looked up in the local credential store on every
/// mutating call, so a login or logout takes effect immediately without
/// rebuilding the client.
#[derive(Clone)]
pub struct HttpCatalog<S> {
    inner: Arc<HttpCatalogInner<S>>,
}

struct HttpCatalogInner<S> {
    client: reqwest::Client,
    base_url: String,
    credentials: LocalCatalog<S>,
}

impl<S: KeyValueStore> HttpCatalog<S> {
    /// Create a client for the API rooted at `base_url` (no trailing slash).
    #[must_use]
    pub fn new(base_url: &str, credentials: LocalCatalog<S>) -> Self {
        Self {
            inner: Arc::new(HttpCatalogInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
                credentials,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.inner
            .credentials
            .auth_token()
            .ok_or_else(|| ApiError::Unauthorized("no credential stored".to_owned()))
    }

    fn form(input: &NewProduct, image: &ImageUpload) -> Result<multipart::Form, ApiError> {
        let mut form = multipart::Form::new()
            .text("name", input.name.clone())
            .text("price", input.price.to_string())
            .text("description", input.description.clone())
            .text("stock", input.stock.to_string());
        if let Some(category) = &input.category {
            form = form.text("category", category.clone());
        }
        Ok(form.part("image", Self::image_part(image)?))
    }

    fn patch_form(patch: &ProductPatch, image: &ImageUpload) -> Result<multipart::Form, ApiError> {
        let mut form = multipart::Form::new();
        if let Some(name) = &patch.name {
            form = form.text("name", name.clone());
        }
        if let Some(price) = patch.price {
            form = form.text("price", price.to_string());
        }
        if let Some(description) = &patch.description {
            form = form.text("description", description.clone());
        }
        if let Some(category) = &patch.category {
            form = form.text("category", category.clone());
        }
        if let Some(stock) = patch.stock {
            form = form.text("stock", stock.to_string());
        }
        Ok(form.part("image", Self::image_part(image)?))
    }

    // A malformed content type is a bad input, not unreachability; it must
    // never trigger the local fallback.
    fn image_part(image: &ImageUpload) -> Result<multipart::Part, ApiError> {
        multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| {
                ApiError::Validation(ValidationError::Rejected(format!(
                    "invalid image content type '{}': {e}",
                    image.content_type
                )))
            })
    }
}

/// Map non-success statuses to the error taxonomy.
pub(crate) async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = error_message(response).await;
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(message)),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound(message)),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
            Err(ApiError::Validation(ValidationError::Rejected(message)))
        }
        other => Err(ApiError::Transport(format!("unexpected status {other}: {message}"))),
    }
}

/// Pull the `error` field out of a failure body, if there is one.
async fn error_message(response: Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    }
}

impl<S: KeyValueStore> RemoteCatalog for HttpCatalog<S> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.inner.client.get(self.url("/products")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/products/{id}")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self, input, image))]
    async fn create(
        &self,
        input: &NewProduct,
        image: Option<&ImageUpload>,
    ) -> Result<Product, ApiError> {
        let token = self.bearer()?;
        let request = self
            .inner
            .client
            .post(self.url("/products"))
            .bearer_auth(token);
        let request = match image {
            Some(image) => request.multipart(Self::form(input, image)?),
            None => request.json(input),
        };
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self, patch, image), fields(product_id = %id))]
    async fn update(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        image: Option<&ImageUpload>,
    ) -> Result<Product, ApiError> {
        let token = self.bearer()?;
        let request = self
            .inner
            .client
            .put(self.url(&format!("/products/{id}")))
            .bearer_auth(token);
        let request = match image {
            Some(image) => request.multipart(Self::patch_form(patch, image)?),
            None => request.json(patch),
        };
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: &ProductId) -> Result<Deleted, ApiError> {
        let token = self.bearer()?;
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/products/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn base_url_is_normalized() {
        let catalog = HttpCatalog::new(
            "http://localhost:5000/api/",
            LocalCatalog::new(MemoryStore::new()),
        );
        assert_eq!(catalog.url("/products"), "http://localhost:5000/api/products");
    }

    #[test]
    fn bad_image_content_type_is_a_validation_error_not_a_fallback_trigger() {
        let image = ImageUpload {
            file_name: "latte.png".to_owned(),
            content_type: "not a mime".to_owned(),
            bytes: vec![1, 2, 3],
        };
        let err = HttpCatalog::<MemoryStore>::image_part(&image).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(!err.triggers_fallback());
    }

    #[tokio::test]
    async fn create_with_bad_content_type_rejects_before_any_request() {
        let credentials = LocalCatalog::new(MemoryStore::new());
        credentials.store_session(&brewdesk_core::Session {
            token: "tok".to_owned(),
            user: brewdesk_core::User {
                id: brewdesk_core::UserId::new("u_1"),
                name: "Ena".to_owned(),
                email: brewdesk_core::Email::parse("ena@brew.desk").expect("email"),
                role: brewdesk_core::Role::Admin,
                created_at: None,
            },
        });
        // Reserved TEST-NET-1 address; nothing answers here.
        let catalog = HttpCatalog::new("http://192.0.2.1:1", credentials);
        let input = NewProduct {
            name: "Mocha".to_owned(),
            price: rust_decimal::Decimal::new(500, 2),
            description: String::new(),
            category: None,
            stock: 0,
        };
        let image = ImageUpload {
            file_name: "latte.png".to_owned(),
            content_type: "not a mime".to_owned(),
            bytes: vec![1, 2, 3],
        };
        let err = catalog.create(&input, Some(&image)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn missing_credential_is_unauthorized_before_any_request() {
        let catalog = HttpCatalog::new(
            "http://localhost:5000/api",
            LocalCatalog::new(MemoryStore::new()),
        );
        assert!(matches!(
            catalog.bearer(),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
