//! The leading discriminator of a permission expression.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

/// What kind of grant an expression is checked against.
///
/// Parsing is exact and case sensitive: only `roles` and `permissions` are
/// recognized, anything else is kept verbatim in [`CheckMode::Unrecognized`].
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Match against the names of the roles the user holds.
    #[strum(serialize = "roles")]
    Roles,
    /// Match against the permissions reachable through the user's roles.
    #[strum(serialize = "permissions")]
    Permissions,
    /// Any other leading token. Never matches anything.
    #[strum(default)]
    Unrecognized(String),
}

impl CheckMode {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, CheckMode::Unrecognized(_))
    }
}

impl Display for CheckMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CheckMode::Unrecognized(token) => write!(f, "{token}"),
            known => write!(f, "{}", known.as_ref()),
        }
    }
}
