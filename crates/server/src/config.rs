//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BREWDESK_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `BREWDESK_HOST` - Bind address (default: 127.0.0.1)
//! - `BREWDESK_PORT` - Listen port (default: 5000), also honors `PORT`
//! - `BREWDESK_DATA_DIR` - Directory for products.json / users.json (default: data)
//! - `BREWDESK_UPLOAD_DIR` - Directory for uploaded images (default: uploads)
//! - `BREWDESK_TOKEN_TTL_HOURS` - Token lifetime in hours (default: 24)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Token lifetime in hours
    pub token_ttl_hours: u64,
    /// Directory holding products.json and users.json
    pub data_dir: PathBuf,
    /// Directory holding uploaded product images
    pub upload_dir: PathBuf,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("data_dir", &self.data_dir)
            .field("upload_dir", &self.upload_dir)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the signing secret fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BREWDESK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BREWDESK_HOST".to_string(), e.to_string()))?;
        let port = get_port()?;
        let jwt_secret = get_validated_secret("BREWDESK_JWT_SECRET")?;
        validate_secret_length(&jwt_secret, "BREWDESK_JWT_SECRET")?;
        let token_ttl_hours = get_env_or_default("BREWDESK_TOKEN_TTL_HOURS", "24")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BREWDESK_TOKEN_TTL_HOURS".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(get_env_or_default("BREWDESK_DATA_DIR", "data"));
        let upload_dir = PathBuf::from(get_env_or_default("BREWDESK_UPLOAD_DIR", "uploads"));

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_hours,
            data_dir,
            upload_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Port from `BREWDESK_PORT`, with fallback to the platform-provided `PORT`.
fn get_port() -> Result<u16, ConfigError> {
    let raw = std::env::var("BREWDESK_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "5000".to_string());
    raw.parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar("BREWDESK_PORT".to_string(), e.to_string()))
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shannon_entropy_of_repeated_char_is_zero() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shannon_entropy_of_random_looking_secret_is_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn placeholder_secrets_are_rejected() {
        let result = validate_secret_strength("your-jwt-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn short_secret_is_rejected() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#");
        assert!(validate_secret_length(&secret, "TEST_VAR").is_err());
        let secret = SecretString::from("aB3$xY9!mK2@nL5#aB3$xY9!mK2@nL5#");
        assert!(validate_secret_length(&secret, "TEST_VAR").is_ok());
    }
}
