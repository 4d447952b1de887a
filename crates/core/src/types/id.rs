//! String-keyed entity ids.
//!
//! Product ids are generated client- or server-side as
//! `"p_" + unix-millis + "_" + random-suffix`. They are globally unique by
//! convention only; no collision check is performed anywhere.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Id of a [`Product`](crate::Product).
///
/// Wire format is an opaque string (e.g. `p_1712345678901_4821`). Seed
/// records carry the fixed ids `p_seed_1` through `p_seed_3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id from the current time and a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = rand::random_range(0..10_000_u32);
        Self(format!("p_{millis}_{suffix}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Id of a [`User`](crate::User).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id from the current time and a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = rand::random_range(0..10_000_u32);
        Self(format!("u_{millis}_{suffix}"))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_product_id_has_expected_shape() {
        let id = ProductId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "p");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u32>().is_ok());
    }

    #[test]
    fn product_id_serde_is_transparent() {
        let id = ProductId::new("p_seed_1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"p_seed_1\"");
        let back: ProductId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
