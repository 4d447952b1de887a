//! User record and client session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ValidationError;
use crate::types::{Email, Role, UserId};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Password strength check mirrored on both sides of the wire.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordTooShort`] or
/// [`ValidationError::PasswordTooWeak`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password
        .chars()
        .any(|c| c.is_ascii_digit() || "!@#$%^&*".contains(c))
    {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}

/// A user account, as exposed over the API.
///
/// The password hash never appears in this shape; it lives only in the
/// server's user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Client-side session state: the bearer credential plus the user it
/// belongs to. Persisted in the local store between visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token attached to mutating API calls.
    pub token: String,
    pub user: User,
}

impl Session {
    /// Whether this session may use mutating catalog controls.
    ///
    /// Display gating only; the server independently checks the credential.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.role.can_mutate()
    }
}
