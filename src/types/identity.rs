//! Identity of the principal being authorized.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::PolicyError;

const HYPHENATED_LEN: usize = 36;

/// The unique key of an authenticated principal, e.g.
/// `6f1c2d3e-8a9b-4c5d-9e0f-1a2b3c4d5e6f`.
///
/// Only the hyphenated form parses. Braced, `urn:uuid:` and simple forms are
/// rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Identity(id)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != HYPHENATED_LEN {
            return Err(PolicyError::InvalidIdentity(format!(
                "'{trimmed}' is not a hyphenated UUID"
            )));
        }
        Uuid::parse_str(trimmed).map(Identity).map_err(|e| {
            PolicyError::InvalidIdentity(format!("'{trimmed}' is not a valid identity: {e}"))
        })
    }
}
