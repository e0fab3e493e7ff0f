use std::collections::BTreeSet;
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::directory::UserDirectory;
use crate::error::PolicyError;
use crate::types::{CheckMode, Identity, User};

/// Resolves the grants an identity holds, either role names or the
/// permission names reachable through those roles.
#[derive(Clone)]
pub struct GrantResolver {
    directory: Arc<dyn UserDirectory>,
}

impl GrantResolver {
    pub fn new<D: UserDirectory + 'static>(directory: D) -> Self {
        GrantResolver {
            directory: Arc::new(directory),
        }
    }

    pub fn from_arc(directory: Arc<dyn UserDirectory>) -> Self {
        GrantResolver { directory }
    }

    /// Names of the roles attached to the user.
    pub fn resolve_roles(&self, identity: &Identity) -> Result<BTreeSet<String>, PolicyError> {
        Ok(self.lookup(identity)?.role_names())
    }

    /// Union of permission names across every role attached to the user.
    pub fn resolve_permissions(
        &self,
        identity: &Identity,
    ) -> Result<BTreeSet<String>, PolicyError> {
        Ok(self.lookup(identity)?.permission_names())
    }

    /// Resolve the grants relevant to `mode`. An unrecognized mode has no
    /// grants and does not touch the directory.
    pub fn resolve(
        &self,
        identity: &Identity,
        mode: &CheckMode,
    ) -> Result<BTreeSet<String>, PolicyError> {
        match mode {
            CheckMode::Roles => self.resolve_roles(identity),
            CheckMode::Permissions => self.resolve_permissions(identity),
            CheckMode::Unrecognized(_) => Ok(BTreeSet::new()),
        }
    }

    fn lookup(&self, identity: &Identity) -> Result<User, PolicyError> {
        let user = self
            .directory
            .find_by_identity(identity)?
            .ok_or_else(|| PolicyError::IdentityNotFound(identity.to_string()))?;

        debug!(
            event = "Resolve",
            phase = "Lookup",
            identity = identity.to_string(),
            roles = user.roles().len()
        );

        Ok(user)
    }
}

/// The required tokens held in `grants`, in expression order without duplicates.
///
/// An empty result means no match.
pub fn matching_grants(required: &[String], grants: &BTreeSet<String>) -> Vec<String> {
    required
        .iter()
        .filter(|token| grants.contains(token.as_str()))
        .unique()
        .cloned()
        .collect()
}
