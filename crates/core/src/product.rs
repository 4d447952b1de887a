//! Product record and its input shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, PriceError, ProductId};

/// Minimum length of a product name.
pub const MIN_NAME_LENGTH: usize = 2;

/// Stock threshold below which a product counts as low-stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Inline SVG shown for products created without an image.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns=%22http://www.w3.org/2000/svg%22 width=%22400%22 height=%22180%22%3E%3Crect fill=%22%23e0e0e0%22 width=%22400%22 height=%22180%22/%3E%3Ctext x=%2250%25%22 y=%2250%25%22 font-size=%2220%22 fill=%22%23999%22 text-anchor=%22middle%22 dy=%22.3em%22%3ENo Image%3C/text%3E%3C/svg%3E";

/// Validation errors for user input.
///
/// Checked before any network or storage call; an invalid input never
/// reaches the wire or the data file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    /// Name missing or shorter than [`MIN_NAME_LENGTH`].
    #[error("product name must be at least {MIN_NAME_LENGTH} characters")]
    NameTooShort,
    /// Price missing, non-numeric, or not strictly positive.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
    /// Malformed email address.
    #[error("invalid email: {0}")]
    Email(#[from] crate::types::EmailError),
    /// Password shorter than six characters.
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    /// Password with neither a digit nor a special character.
    #[error("password must contain a digit or a special character")]
    PasswordTooWeak,
    /// Input rejected server-side (HTTP 400).
    #[error("{0}")]
    Rejected(String),
}


/// A catalog product.
///
/// `image` is a URL, a data URI, or a server-relative `/uploads/...` path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: u32,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the stock level counts as low.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }

    /// Case-insensitive substring match over name and description.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }
}

/// Fields for creating a product.
///
/// Carries the raw price so that invalid amounts are representable; call
/// [`NewProduct::validate`] before doing anything with one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub stock: u32,
}

impl NewProduct {
    /// Validate the input and return the checked price.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameTooShort`] or a price error.
    pub fn validate(&self) -> Result<Price, ValidationError> {
        if self.name.trim().len() < MIN_NAME_LENGTH {
            return Err(ValidationError::NameTooShort);
        }
        Ok(Price::new(self.price)?)
    }
}

/// Partial update for a product.
///
/// Only present, non-empty fields are merged into the record. The image is
/// handled separately (replaced only when a new upload accompanies the
/// update), so it does not appear here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl ProductPatch {
    /// Validate whichever fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameTooShort`] or a price error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name
            && name.trim().len() < MIN_NAME_LENGTH
        {
            return Err(ValidationError::NameTooShort);
        }
        if let Some(price) = self.price {
            Price::new(price)?;
        }
        Ok(())
    }

    /// Merge present fields into `product`, leaving the rest untouched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name
            && !name.trim().is_empty()
        {
            product.name.clone_from(name);
        }
        if let Some(price) = self.price
            && let Ok(price) = Price::new(price)
        {
            product.price = price;
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(category) = &self.category {
            product.category = if category.trim().is_empty() {
                None
            } else {
                Some(category.clone())
            };
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        product.updated_at = Some(Utc::now());
    }
}

/// The fixed three-product catalog written on first-ever local load.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    fn seed(id: &str, name: &str, cents: i64, description: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::new(Decimal::new(cents, 2)).expect("seed prices are positive"),
            description: description.to_owned(),
            category: Some("coffee".to_owned()),
            stock: 20,
            image: PLACEHOLDER_IMAGE.to_owned(),
            created_at: None,
            updated_at: None,
        }
    }

    vec![
        seed("p_seed_1", "Espresso", 10_99, "Rich espresso"),
        seed("p_seed_2", "Latte", 10_99, "Smooth latte"),
        seed("p_seed_3", "Cappuccino", 11_99, "Creamy cappuccino"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: &str, stock: u32) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_owned(),
            price: Price::new(Decimal::new(500, 2)).expect("positive"),
            description: description.to_owned(),
            category: None,
            stock,
            image: PLACEHOLDER_IMAGE.to_owned(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn validate_rejects_short_name() {
        let input = NewProduct {
            name: "X".to_owned(),
            price: Decimal::new(500, 2),
            description: String::new(),
            category: None,
            stock: 0,
        };
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NameTooShort)
        ));
    }

    #[test]
    fn validate_rejects_zero_price() {
        let input = NewProduct {
            name: "Mocha".to_owned(),
            price: Decimal::ZERO,
            description: String::new(),
            category: None,
            stock: 0,
        };
        assert!(matches!(input.validate(), Err(ValidationError::Price(_))));
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut p = product("Latte", "Smooth latte", 5);
        let patch = ProductPatch {
            stock: Some(40),
            ..ProductPatch::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.name, "Latte");
        assert_eq!(p.stock, 40);
        assert!(p.updated_at.is_some());
    }

    #[test]
    fn patch_ignores_blank_name() {
        let mut p = product("Latte", "", 0);
        let patch = ProductPatch {
            name: Some("   ".to_owned()),
            ..ProductPatch::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.name, "Latte");
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let p = product("Cappuccino", "Creamy cappuccino", 0);
        assert!(p.matches_query("CAPPU"));
        assert!(p.matches_query("creamy"));
        assert!(!p.matches_query("espresso"));
    }

    #[test]
    fn low_stock_threshold_is_strict() {
        assert!(product("A A", "", 9).is_low_stock());
        assert!(!product("A A", "", 10).is_low_stock());
    }

    #[test]
    fn seed_catalog_is_fixed() {
        let seed = seed_catalog();
        let names: Vec<&str> = seed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Espresso", "Latte", "Cappuccino"]);
        assert_eq!(seed[0].id.as_str(), "p_seed_1");
    }
}
