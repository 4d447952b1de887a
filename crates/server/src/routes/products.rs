//! Product CRUD routes.
//!
//! Create and update accept either a JSON body or multipart form data; the
//! multipart shape exists for image uploads, the JSON shape for clients
//! without one. Reads are public, mutations require a bearer token.

use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use brewdesk_core::{NewProduct, PLACEHOLDER_IMAGE, Product, ProductId, ProductPatch};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::store::uploads::MAX_IMAGE_BYTES;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Raw field values from either body encoding. Everything arrives as text
/// in the multipart case, so numbers are parsed later, against the same
/// validation both encodings share.
#[derive(Default)]
struct Submission {
    name: Option<String>,
    price: Option<String>,
    description: Option<String>,
    category: Option<String>,
    stock: Option<String>,
    image: Option<UploadedImage>,
}

struct UploadedImage {
    file_name: String,
    bytes: Vec<u8>,
}

impl Submission {
    async fn from_request(request: Request) -> Result<Self, AppError> {
        let is_multipart = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));
        if is_multipart {
            let multipart = Multipart::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(body): Json<Value> = Json::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Ok(Self::from_json(&body))
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            match field.name() {
                Some("image") => {
                    let file_name = field.file_name().unwrap_or("upload").to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if bytes.len() > MAX_IMAGE_BYTES {
                        return Err(AppError::BadRequest(format!(
                            "image exceeds {MAX_IMAGE_BYTES} bytes"
                        )));
                    }
                    submission.image = Some(UploadedImage {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                Some(name) => {
                    let name = name.to_owned();
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    match name.as_str() {
                        "name" => submission.name = Some(value),
                        "price" => submission.price = Some(value),
                        "description" => submission.description = Some(value),
                        "category" => submission.category = Some(value),
                        "stock" => submission.stock = Some(value),
                        _ => {}
                    }
                }
                None => {}
            }
        }
        Ok(submission)
    }

    /// JSON bodies carry prices either as numbers or as strings; accept
    /// both by normalizing everything to text here.
    fn from_json(body: &Value) -> Self {
        let text = |key: &str| -> Option<String> {
            body.get(key).and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
        };
        Self {
            name: text("name"),
            price: text("price"),
            description: text("description"),
            category: text("category"),
            stock: text("stock"),
            image: None,
        }
    }

    fn into_new_product(self) -> Result<(NewProduct, Option<UploadedImage>), AppError> {
        let (Some(name), Some(price)) = (self.name, self.price) else {
            return Err(AppError::BadRequest(
                "name and price are required".to_string(),
            ));
        };
        let price = price
            .parse()
            .map_err(|_| AppError::BadRequest(format!("price '{price}' is not a number")))?;
        let stock = parse_stock(self.stock.as_deref())?;
        Ok((
            NewProduct {
                name,
                price,
                description: self.description.unwrap_or_default(),
                category: self.category.filter(|c| !c.trim().is_empty()),
                stock,
            },
            self.image,
        ))
    }

    fn into_patch(self) -> Result<(ProductPatch, Option<UploadedImage>), AppError> {
        let price = match self.price {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| AppError::BadRequest(format!("price '{raw}' is not a number")))?,
            ),
            None => None,
        };
        let stock = match self.stock {
            Some(_) => Some(parse_stock(self.stock.as_deref())?),
            None => None,
        };
        Ok((
            ProductPatch {
                name: self.name,
                price,
                description: self.description,
                category: self.category,
                stock,
            },
            self.image,
        ))
    }
}

fn parse_stock(raw: Option<&str>) -> Result<u32, AppError> {
    match raw {
        None | Some("") => Ok(0),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("stock '{raw}' is not a whole number"))),
    }
}

async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.products().list().await)
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    state
        .products()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

async fn create_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    request: Request,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let submission = Submission::from_request(request).await?;
    let (input, image) = submission.into_new_product()?;
    let price = input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let image_path = match image {
        Some(upload) => state.uploads().save(&upload.file_name, &upload.bytes).await?,
        None => PLACEHOLDER_IMAGE.to_owned(),
    };

    let product = Product {
        id: ProductId::generate(),
        name: input.name,
        price,
        description: input.description,
        category: input.category,
        stock: input.stock,
        image: image_path,
        created_at: Some(chrono::Utc::now()),
        updated_at: None,
    };
    state.products().insert(product.clone()).await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    let submission = Submission::from_request(request).await?;
    let (patch, image) = submission.into_patch()?;
    patch
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let new_image = match image {
        Some(upload) => Some(state.uploads().save(&upload.file_name, &upload.bytes).await?),
        None => None,
    };

    let mut replaced_image = None;
    let updated = state
        .products()
        .update_with(&id, |product| {
            patch.apply_to(product);
            if let Some(path) = new_image.clone() {
                replaced_image = Some(std::mem::replace(&mut product.image, path));
            }
        })
        .await?;

    let Some(updated) = updated else {
        // The upload is already on disk; drop the orphan.
        if let Some(path) = &new_image {
            state.uploads().remove(path).await;
        }
        return Err(AppError::NotFound(format!("product {id}")));
    };
    if let Some(old) = replaced_image {
        state.uploads().remove(&old).await;
    }
    tracing::info!(product_id = %id, "product updated");
    Ok(Json(updated))
}

async fn delete_product(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = ProductId::new(id);
    let removed = state
        .products()
        .remove(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    state.uploads().remove(&removed.image).await;
    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(json!({
        "message": "Product deleted",
        "deletedProduct": removed,
    })))
}
