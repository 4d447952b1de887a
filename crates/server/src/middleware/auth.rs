//! Bearer token extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::Claims;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Any valid credential passes; the role inside the claims is informational
/// for handlers that want it. Mutating product routes add this extractor,
/// read routes do not.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a bearer token".to_string()))?;
        let claims = state
            .auth()
            .validate_token(token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
        Ok(Self(claims))
    }
}
