//! Password hashing and bearer token management.
//!
//! Passwords are hashed with Argon2id; bearer tokens are HS256 JWTs
//! carrying the user's id, email, and role.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use brewdesk_core::{Role, User, UserId};

const ISSUER: &str = "brewdesk";

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately indistinguishable from an
    /// unknown email at the API surface.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed")]
    PasswordHash,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

/// JWT claims for BrewDesk access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Email address.
    pub email: String,
    /// Role at issue time.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// JWT ID.
    pub jti: String,
}

impl Claims {
    fn new(user: &User, ttl_hours: u64) -> Self {
        let now = Utc::now();
        #[allow(clippy::cast_possible_wrap)] // TTL is bounded by config validation
        let exp = now + Duration::hours(ttl_hours as i64);
        Self {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: ISSUER.to_string(),
            jti: UserId::generate().to_string(),
        }
    }

    /// The authenticated user's id.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::new(self.sub.clone())
    }
}

/// Issues and validates credentials.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: u64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("ttl_hours", &self.ttl_hours)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_hours: u64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_hours,
        }
    }

    /// Hash a password using Argon2id.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PasswordHash`] if hashing fails.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for a bad hash or a
    /// non-matching password.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    /// Issue an access token for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if encoding fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user, self.ttl_hours);
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenExpired`] or [`AuthError::InvalidToken`].
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewdesk_core::Email;

    fn service() -> AuthService {
        AuthService::new(&SecretString::from("kQ7#mZp2!vX9@rW4$nT6^bY1&cL8*dJ3"), 24)
    }

    fn user() -> User {
        User {
            id: UserId::new("u_1"),
            name: "Ena".to_owned(),
            email: Email::parse("ena@brew.desk").expect("email"),
            role: Role::Admin,
            created_at: None,
        }
    }

    #[test]
    fn password_round_trips_and_rejects_wrong_input() {
        let auth = service();
        let hash = auth.hash_password("kopi42!").expect("hash");
        assert!(auth.verify_password("kopi42!", &hash).is_ok());
        assert!(matches!(
            auth.verify_password("kopi43!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_round_trips_with_role() {
        let auth = service();
        let token = auth.issue_token(&user()).expect("issue");
        let claims = auth.validate_token(&token).expect("validate");
        assert_eq!(claims.sub, "u_1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn token_from_a_different_secret_is_rejected() {
        let auth = service();
        let other = AuthService::new(
            &SecretString::from("zF5&hV8!qN2@wK7$mR4^tC9*xB1#pG6%"),
            24,
        );
        let token = other.issue_token(&user()).expect("issue");
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
