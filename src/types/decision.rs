//! Authorization decision types.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay};
use utoipa::ToSchema;

use crate::error::PolicyError;

/// Why an evaluation was denied. Operator facing only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsRefStr, StrumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DenyReason {
    /// No identity or no expression was supplied.
    MissingInput,
    /// The expression did not start with `roles` or `permissions`.
    UnrecognizedMode,
    /// None of the required tokens is held by the identity.
    NoMatchingGrant,
    /// The user directory has no user for the identity.
    IdentityNotFound,
    /// Any other failure while decoding, resolving or matching.
    UnexpectedFailure,
}

impl From<&PolicyError> for DenyReason {
    fn from(err: &PolicyError) -> Self {
        match err {
            PolicyError::IdentityNotFound(_) => DenyReason::IdentityNotFound,
            _ => DenyReason::UnexpectedFailure,
        }
    }
}

/// Allow or deny, with the tokens that matched or the reason for the denial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum Decision {
    Allow { matched: Vec<String> },
    Deny { reason: DenyReason },
}

impl Decision {
    pub fn deny(reason: DenyReason) -> Self {
        Decision::Deny { reason }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow { .. } => None,
            Decision::Deny { reason } => Some(*reason),
        }
    }
}

impl From<Decision> for bool {
    fn from(decision: Decision) -> Self {
        decision.is_allowed()
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Decision::Allow { matched } => write!(f, "Allow({})", matched.join(", ")),
            Decision::Deny { reason } => write!(f, "Deny({reason})"),
        }
    }
}

/// Outcome of an object-targeted check, see
/// [`PermissionEvaluator::evaluate_target`](crate::PermissionEvaluator::evaluate_target).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TargetCheck {
    /// Object-targeted permissions are not enforced; the check always passes.
    NotEnforced,
}

impl TargetCheck {
    pub fn is_allowed(&self) -> bool {
        match self {
            TargetCheck::NotEnforced => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_display_allow() {
        let decision = Decision::Allow {
            matched: vec!["editor".to_string(), "viewer".to_string()],
        };
        assert_eq!(decision.to_string(), "Allow(editor, viewer)");
    }

    #[test]
    fn test_decision_display_deny() {
        let decision = Decision::deny(DenyReason::NoMatchingGrant);
        assert_eq!(decision.to_string(), "Deny(no_matching_grant)");
    }

    #[test]
    fn test_decision_into_bool() {
        let allow: bool = Decision::Allow { matched: vec!["a".into()] }.into();
        let deny: bool = Decision::deny(DenyReason::MissingInput).into();
        assert!(allow);
        assert!(!deny);
    }

    #[test]
    fn test_deny_reason_from_error() {
        let not_found = PolicyError::IdentityNotFound("x".into());
        let lookup = PolicyError::LookupError("connection reset".into());
        let malformed = PolicyError::MalformedExpression("{".into());
        assert_eq!(DenyReason::from(&not_found), DenyReason::IdentityNotFound);
        assert_eq!(DenyReason::from(&lookup), DenyReason::UnexpectedFailure);
        assert_eq!(DenyReason::from(&malformed), DenyReason::UnexpectedFailure);
    }

    #[test]
    fn test_deny_reason_accessor() {
        assert_eq!(
            Decision::deny(DenyReason::UnrecognizedMode).deny_reason(),
            Some(DenyReason::UnrecognizedMode)
        );
        assert_eq!(Decision::Allow { matched: vec![] }.deny_reason(), None);
    }

    #[test]
    fn test_target_check_always_allows() {
        assert!(TargetCheck::NotEnforced.is_allowed());
    }

    #[test]
    fn test_decision_serialization() {
        let allow = Decision::Allow {
            matched: vec!["doc_write".to_string()],
        };
        insta::assert_json_snapshot!(allow, @r#"
        {
          "Allow": {
            "matched": [
              "doc_write"
            ]
          }
        }
        "#);

        let deny = Decision::deny(DenyReason::IdentityNotFound);
        insta::assert_json_snapshot!(deny, @r#"
        {
          "Deny": {
            "reason": "identity_not_found"
          }
        }
        "#);
    }
}
