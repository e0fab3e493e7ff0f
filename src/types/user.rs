//! Users with their roles, and the permissions those roles carry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::Identity;

/// An atomic named capability, e.g. `user_create`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Permission {
    name: String,
}

impl Permission {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Permission { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named bundle of permissions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Role {
    name: String,
    #[serde(default)]
    permissions: Vec<Permission>,
}

impl Role {
    /// Create a new role holding the given permission names.
    pub fn new<T, I, S>(name: T, permissions: I) -> Self
    where
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Role {
            name: name.into(),
            permissions: permissions.into_iter().map(Permission::new).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// A user aggregate as returned by the user directory.
///
/// Permissions are never attached to a user directly, only through roles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct User {
    id: Identity,
    #[serde(default)]
    roles: Vec<Role>,
}

impl User {
    pub fn new(id: Identity, roles: Vec<Role>) -> Self {
        User { id, roles }
    }

    pub fn id(&self) -> &Identity {
        &self.id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Names of every role attached to the user.
    pub fn role_names(&self) -> BTreeSet<String> {
        self.roles.iter().map(|r| r.name().to_string()).collect()
    }

    /// Union of the permission names across all of the user's roles.
    pub fn permission_names(&self) -> BTreeSet<String> {
        self.roles
            .iter()
            .flat_map(|r| r.permissions())
            .map(|p| p.name().to_string())
            .collect()
    }
}
