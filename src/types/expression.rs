//! Decoded permission expressions.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PolicyError;
use crate::parser;

use super::check_mode::CheckMode;

/// A typed check request, e.g. `{'permissions', 'doc_read', 'doc_write'}`.
///
/// The listed tokens are alternatives: holding any one of them is enough.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct PermissionExpression {
    mode: CheckMode,
    tokens: Vec<String>,
}

impl PermissionExpression {
    pub fn new<I, S>(mode: CheckMode, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PermissionExpression {
            mode,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mode(&self) -> &CheckMode {
        &self.mode
    }

    /// Every token listed after the mode, in expression order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The tokens that take part in matching. Empty for an unrecognized mode.
    pub fn required(&self) -> &[String] {
        if self.mode.is_recognized() {
            &self.tokens
        } else {
            &[]
        }
    }
}

impl Display for PermissionExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let elements = std::iter::once(self.mode.to_string())
            .chain(self.tokens.iter().cloned())
            .map(|t| format!("'{t}'"))
            .join(", ");
        write!(f, "{{{elements}}}")
    }
}

impl FromStr for PermissionExpression {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::decode(s)
    }
}
