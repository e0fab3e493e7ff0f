//! Data model types for identities, expressions, grants and decisions.
//!
//! Canonical string forms:
//! - Identity: a hyphenated UUID, e.g. `6f1c2d3e-8a9b-4c5d-9e0f-1a2b3c4d5e6f`
//! - Expression: `{'roles', 'admin', 'editor'}` or `{'permissions', 'user_read'}`
//!
//! Quoting rules: expression elements may be single quoted, double quoted or
//! bare; the outer brackets may be `{}` or `[]`.

mod check_mode;
mod decision;
mod expression;
mod identity;
mod user;

pub use check_mode::CheckMode;
pub use decision::{Decision, DenyReason, TargetCheck};
pub use expression::PermissionExpression;
pub use identity::Identity;
pub use user::{Permission, Role, User};
