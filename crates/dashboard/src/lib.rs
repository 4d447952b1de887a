//! Dual-mode catalog client for the BrewDesk dashboard.
//!
//! The centerpiece is [`CatalogRepository`]: it probes server availability
//! per operation, works against the REST API when reachable, and degrades
//! to a local persistent store when not, keeping the cached catalog as the
//! best current view of truth either way.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod error;
pub mod probe;
pub mod remote;
pub mod repository;
pub mod store;
pub mod view;

pub use auth::AuthClient;
pub use error::ApiError;
pub use probe::{HealthProber, PROBE_TIMEOUT, Probe};
pub use remote::{Deleted, HttpCatalog, ImageUpload, RemoteCatalog};
pub use repository::CatalogRepository;
pub use store::{FileStore, KeyValueStore, LocalCatalog, MemoryStore, StoreError};
pub use view::{CatalogStats, DashboardView, PAGE_SIZE, PageView, StockFilter, UiAction};
