//! Registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use brewdesk_core::{Email, Role, User, validate_password};

use crate::error::AppError;
use crate::state::AppState;
use crate::store::StoreError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    name: Option<String>,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    user: User,
}

/// Create an account. The very first account becomes the admin; everyone
/// after that is a regular user.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_password(&body.password).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Default the display name to the email's local part.
    let fallback_name = email
        .as_str()
        .split('@')
        .next()
        .unwrap_or_default()
        .to_owned();
    let name = body
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(fallback_name);
    let role = if state.users().is_empty().await {
        Role::Admin
    } else {
        Role::User
    };
    let password_hash = state
        .auth()
        .hash_password(&body.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state
        .users()
        .create(&name, email, password_hash, role)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Store(other),
        })?;
    tracing::info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let unauthorized = || AppError::Unauthorized("invalid credentials".to_string());
    let stored = state
        .users()
        .find_by_email(&email)
        .await
        .ok_or_else(unauthorized)?;
    state
        .auth()
        .verify_password(&body.password, &stored.password_hash)
        .map_err(|_| unauthorized())?;

    let token = state
        .auth()
        .issue_token(&stored.user)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(user_id = %stored.user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: stored.user,
    }))
}
