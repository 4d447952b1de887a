//! User roles.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Only admins may mutate the catalog. The dashboard also uses the role to
/// decide which controls to render, but that gate is cosmetic; the server's
/// credential check is the actual authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full catalog access.
    Admin,
    /// Read-only access.
    #[default]
    User,
}

impl Role {
    /// Whether this role may create, update, or delete products.
    #[must_use]
    pub const fn can_mutate(self) -> bool {
        matches!(self, Self::Admin)
    }
}
