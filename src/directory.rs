//! User lookup.
//!
//! [`UserDirectory`] is the seam to whatever stores users and their roles.
//! [`InMemoryDirectory`] is a reference implementation configured from JSON:
//!
//! ```json
//! [
//!   {
//!     "id": "6f1c2d3e-8a9b-4c5d-9e0f-1a2b3c4d5e6f",
//!     "roles": [
//!       { "name": "editor", "permissions": [{ "name": "doc_read" }, { "name": "doc_write" }] }
//!     ]
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::PolicyError;
use crate::types::{Identity, User};

/// Finds the user aggregate for an identity.
///
/// `Ok(None)` means no such user exists. `Err` is reserved for the backend
/// itself failing. Implementations must be safe to call concurrently.
pub trait UserDirectory: Send + Sync {
    fn find_by_identity(&self, identity: &Identity) -> Result<Option<User>, PolicyError>;
}

impl<D: UserDirectory + ?Sized> UserDirectory for Arc<D> {
    fn find_by_identity(&self, identity: &Identity) -> Result<Option<User>, PolicyError> {
        (**self).find_by_identity(identity)
    }
}

/// A thread-safe, cloneable directory holding users in memory.
///
/// Clones share the same underlying set, so a reload through one handle is
/// seen by every evaluator using another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    inner: Arc<RwLock<HashMap<Identity, User>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users<I: IntoIterator<Item = User>>(users: I) -> Self {
        InMemoryDirectory {
            inner: Arc::new(RwLock::new(index_users(users))),
        }
    }

    /// Build a directory from a JSON array of users.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let users: Vec<User> = serde_json::from_str(json)?;
        Ok(Self::from_users(users))
    }

    /// Replace every user with the contents of a JSON array.
    ///
    /// The old set stays in place if the JSON does not parse.
    pub fn reload_from_str(&self, json: &str) -> Result<(), PolicyError> {
        let users: Vec<User> = serde_json::from_str(json)?;
        let users = index_users(users);
        let count = users.len();
        *self.inner.write()? = users;

        info!(event = "Directory", phase = "Reload", users = count);

        #[cfg(feature = "observability")]
        crate::metrics::record_reload(count);

        Ok(())
    }

    /// Insert or replace a single user.
    pub fn insert(&self, user: User) -> Result<(), PolicyError> {
        self.inner.write()?.insert(*user.id(), user);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, PolicyError> {
        Ok(self.inner.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, PolicyError> {
        Ok(self.inner.read()?.is_empty())
    }
}

impl UserDirectory for InMemoryDirectory {
    fn find_by_identity(&self, identity: &Identity) -> Result<Option<User>, PolicyError> {
        Ok(self.inner.read()?.get(identity).cloned())
    }
}

fn index_users<I: IntoIterator<Item = User>>(users: I) -> HashMap<Identity, User> {
    users.into_iter().map(|u| (*u.id(), u)).collect()
}
