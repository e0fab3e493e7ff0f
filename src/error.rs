use std::collections::HashMap;
use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Identity, User};

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicyError {
    #[error("malformed permission expression: {0}")]
    MalformedExpression(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("no user found for identity {0}")]
    IdentityNotFound(String),

    #[error("user lookup failed: {0}")]
    LookupError(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLockError(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::InvalidFormat(err.to_string())
    }
}

impl From<uuid::Error> for PolicyError {
    fn from(err: uuid::Error) -> Self {
        PolicyError::InvalidIdentity(err.to_string())
    }
}

impl From<PoisonError<RwLockReadGuard<'_, HashMap<Identity, User>>>> for PolicyError {
    fn from(err: PoisonError<RwLockReadGuard<'_, HashMap<Identity, User>>>) -> Self {
        PolicyError::PoisonedLockError(err.to_string())
    }
}

impl From<PoisonError<RwLockWriteGuard<'_, HashMap<Identity, User>>>> for PolicyError {
    fn from(err: PoisonError<RwLockWriteGuard<'_, HashMap<Identity, User>>>) -> Self {
        PolicyError::PoisonedLockError(err.to_string())
    }
}
