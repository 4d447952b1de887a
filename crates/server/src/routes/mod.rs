//! Route definitions.

mod auth;
mod health;
mod products;

use axum::Router;

use crate::state::AppState;

/// All API routes, mounted under `/api` by the binary.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(products::routes())
        .merge(auth::routes())
}
