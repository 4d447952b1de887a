//! Session management against the auth endpoints.
//!
//! Unlike the catalog, auth has no local fallback: without a reachable
//! server there is nobody to mint a token, so transport failures surface
//! as errors. A previously stored session keeps working in local mode
//! because the repository never re-validates it.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use brewdesk_core::{Email, Session, User, ValidationError, validate_password};

use crate::error::ApiError;
use crate::remote::check;
use crate::store::{KeyValueStore, LocalCatalog};

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for `/auth/register` and `/auth/login`, persisting the resulting
/// session into the credential keys of the local store.
#[derive(Clone)]
pub struct AuthClient<S> {
    inner: Arc<AuthClientInner<S>>,
}

struct AuthClientInner<S> {
    client: reqwest::Client,
    base_url: String,
    credentials: LocalCatalog<S>,
}

impl<S: KeyValueStore> AuthClient<S> {
    #[must_use]
    pub fn new(base_url: &str, credentials: LocalCatalog<S>) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_owned(),
                credentials,
            }),
        }
    }

    /// Register a new account.
    ///
    /// The server answers with the created user and no token; callers log
    /// in afterwards to obtain a session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before any request for a malformed
    /// email or weak password, and whatever the server answers otherwise.
    #[instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        validate_password(password)?;
        let response = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(&RegisterBody {
                name,
                email: email.as_str(),
                password,
            })
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Log in and store the returned session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed email,
    /// [`ApiError::Unauthorized`] for bad credentials, and
    /// [`ApiError::Transport`] when the server is unreachable.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody {
                email: email.as_str(),
                password,
            })
            .send()
            .await?;
        let session: Session = check(response).await?.json().await?;
        self.inner.credentials.store_session(&session);
        Ok(session)
    }

    /// Drop the stored session. Purely local, always succeeds.
    pub fn logout(&self) {
        self.inner.credentials.clear_session();
    }

    /// Session restored from the credential keys, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.inner.credentials.session()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }
}
