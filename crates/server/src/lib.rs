//! BrewDesk catalog API server.
//!
//! Serves the REST surface the dashboard synchronizes against: product
//! CRUD with image uploads, registration and login, and the health
//! endpoint the availability prober polls. Persistence is JSON files on
//! disk, uploads are static files served under `/uploads`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
///
/// The API lives under `/api`; uploaded images are served as static files
/// under `/uploads`. CORS is wide open because the dashboard is served
/// from a different origin in development, and the bearer check on
/// mutations is the actual access control.
pub fn app(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads().dir());
    Router::new()
        .nest("/api", routes::routes())
        .nest_service("/uploads", uploads)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
