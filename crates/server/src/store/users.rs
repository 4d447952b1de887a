//! User accounts backed by `users.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use brewdesk_core::{Email, Role, User, UserId};

use super::StoreError;

/// A user as persisted, with the credential hash that never leaves the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// File-backed user table. Email uniqueness is the only constraint, and it
/// is case-insensitive because [`Email`] lowercases on parse.
pub struct UserStore {
    path: PathBuf,
    users: Mutex<Vec<StoredUser>>,
}

impl UserStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the parent directory cannot be created
    /// or an existing file cannot be read.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let users = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "user file corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            users: Mutex::new(users),
        })
    }

    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }

    pub async fn find_by_email(&self, email: &Email) -> Option<StoredUser> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.user.email == *email)
            .cloned()
    }

    /// Create a user with the given role.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email is already taken, or
    /// an I/O error if the file write fails. The uniqueness check and the
    /// insert happen under one lock, so two concurrent registrations
    /// cannot both win.
    pub async fn create(
        &self,
        name: &str,
        email: Email,
        password_hash: String,
        role: Role,
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.user.email == email) {
            return Err(StoreError::Conflict(format!(
                "email {email} is already registered"
            )));
        }
        let user = User {
            id: UserId::generate(),
            name: name.to_owned(),
            email,
            role,
            created_at: Some(chrono::Utc::now()),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash,
        });
        self.persist(&users).await?;
        Ok(user)
    }

    async fn persist(&self, users: &[StoredUser]) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(users)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
