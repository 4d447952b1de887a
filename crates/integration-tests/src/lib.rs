//! Integration tests for BrewDesk.
//!
//! These tests drive the dashboard client against a live server process,
//! so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server
//! BREWDESK_JWT_SECRET=$(openssl rand -hex 32) cargo run -p brewdesk-server
//!
//! # Run integration tests against it
//! cargo test -p brewdesk-integration-tests -- --ignored
//! ```
//!
//! The API base URL defaults to `http://localhost:5000/api` and can be
//! overridden with `BREWDESK_API_URL`.

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("BREWDESK_API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string())
}

/// A unique email per test run, so re-runs don't trip the uniqueness
/// constraint.
#[must_use]
pub fn fresh_email(prefix: &str) -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{prefix}+{millis}@brew.desk")
}
