//! JSON-file persistence.
//!
//! The catalog and the user table each live in a single JSON file, loaded
//! once at startup and rewritten in full after every mutation. A
//! `tokio::sync::Mutex` around the in-memory copy serializes writers;
//! last writer wins, there is no finer-grained isolation.

mod products;
pub mod uploads;
mod users;

pub use products::ProductStore;
pub use uploads::UploadStore;
pub use users::{StoredUser, UserStore};

use thiserror::Error;

/// Errors from the persistent stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Unique constraint violated (duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),
}
