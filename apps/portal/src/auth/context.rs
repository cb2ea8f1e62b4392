use std::collections::BTreeSet;

use serde::Serialize;

use super::permissions::{AuthLevel, Permission, Role};
use crate::error::ClientError;
use crate::models::user::User;

/// Authorization view of the current session.
///
/// Always derived from a fetched [`User`]; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub is_authenticated: bool,
    pub user_id: Option<i64>,
    pub role: Role,
    pub auth_level: AuthLevel,
    pub permissions: BTreeSet<Permission>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::guest()
    }
}

impl AuthContext {
    pub fn guest() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
            role: Role::Guest,
            auth_level: AuthLevel::NotRestricted,
            permissions: BTreeSet::new(),
        }
    }

    /// Maps a user's role tag through the static tables. An unknown or
    /// empty role yields the guest context.
    pub fn from_user(user: &User) -> Self {
        let Ok(role) = user.role.parse::<Role>() else {
            tracing::debug!(user_id = user.id, role = %user.role, "unknown role, using guest context");
            return Self::guest();
        };

        Self {
            is_authenticated: true,
            user_id: Some(user.id),
            role,
            auth_level: role.auth_level(),
            permissions: role.permissions().iter().copied().collect(),
        }
    }

    /// `None` (no user, or a 204 from the session endpoint) is a guest.
    pub fn from_session(user: Option<&User>) -> Self {
        user.map_or_else(Self::guest, Self::from_user)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&Permission::Administrator)
            || self.permissions.contains(&permission)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn has_auth_level(&self, level: AuthLevel) -> bool {
        self.auth_level >= level
    }

    pub fn require_permission(&self, permission: Permission) -> Result<(), ClientError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(ClientError::PermissionDenied { permission })
        }
    }
}
