use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, trace};

use crate::directory::UserDirectory;
use crate::error::PolicyError;
use crate::parser;
use crate::resolver::{GrantResolver, matching_grants};
use crate::timers::{PhaseDurations, PhaseTimer};
use crate::types::{CheckMode, Decision, DenyReason, Identity, TargetCheck};

/// The authorization evaluator. Cloneable and thread-safe.
///
/// Every evaluation is total: missing input, an unknown user, a malformed
/// expression or a failing directory all end in a deny, never in an error.
///
/// ```rust
/// use permgate_core::{InMemoryDirectory, PermissionEvaluator, Role, User};
///
/// let id = "6f1c2d3e-8a9b-4c5d-9e0f-1a2b3c4d5e6f";
/// let directory = InMemoryDirectory::from_users([User::new(
///     id.parse().unwrap(),
///     vec![Role::new("editor", ["doc_read", "doc_write"])],
/// )]);
/// let evaluator = PermissionEvaluator::new(directory);
///
/// assert!(evaluator.has_permission(Some(id), Some("{'roles', 'editor', 'viewer'}")));
/// assert!(!evaluator.has_permission(Some(id), Some("{'permissions', 'doc_delete'}")));
/// assert!(!evaluator.has_permission(None, Some("{'roles', 'editor'}")));
/// ```
#[derive(Clone)]
pub struct PermissionEvaluator {
    resolver: GrantResolver,
}

#[derive(Default)]
struct EvaluationTrace {
    phases: PhaseDurations,
    mode: Option<CheckMode>,
}

impl PermissionEvaluator {
    pub fn new<D: UserDirectory + 'static>(directory: D) -> Self {
        PermissionEvaluator {
            resolver: GrantResolver::new(directory),
        }
    }

    pub fn from_arc(directory: Arc<dyn UserDirectory>) -> Self {
        PermissionEvaluator {
            resolver: GrantResolver::from_arc(directory),
        }
    }

    /// Is `identity` allowed by `expression`?
    ///
    /// True iff the identity holds at least one of the roles or permissions
    /// the expression lists. To require two expressions, evaluate both and
    /// combine the results.
    pub fn has_permission(&self, identity: Option<&str>, expression: Option<&str>) -> bool {
        self.evaluate(identity, expression).is_allowed()
    }

    /// Same as [`has_permission`](Self::has_permission), keeping the matched
    /// tokens or the reason for the denial.
    pub fn evaluate(&self, identity: Option<&str>, expression: Option<&str>) -> Decision {
        #[cfg(feature = "observability")]
        let start = Instant::now();
        let mut eval_trace = EvaluationTrace::default();

        let decision = match (identity, expression) {
            (Some(identity), Some(expression)) => {
                self.contained(identity, expression, &mut eval_trace)
            }
            _ => {
                trace!(
                    event = "Evaluate",
                    phase = "MissingInput",
                    identity_present = identity.is_some(),
                    expression_present = expression.is_some()
                );
                Decision::deny(DenyReason::MissingInput)
            }
        };

        #[cfg(feature = "observability")]
        crate::metrics::record_evaluation(
            crate::metrics::EvaluationStats {
                duration: start.elapsed(),
                allowed: decision.is_allowed(),
                identity: identity.unwrap_or_default().to_string(),
                mode: eval_trace.mode.as_ref().map(ToString::to_string),
                deny_reason: decision.deny_reason(),
            },
            &eval_trace.phases,
        );

        decision
    }

    /// Object-targeted check, e.g. `hasPermission(#id, 'Foo', 'read')`.
    ///
    /// NOT ENFORCED: this always returns [`TargetCheck::NotEnforced`], which
    /// allows. Checks against a specific target id and type are not
    /// implemented; guard such operations with [`evaluate`](Self::evaluate).
    pub fn evaluate_target(
        &self,
        identity: Option<&str>,
        target_id: &str,
        target_type: &str,
        permission: &str,
    ) -> TargetCheck {
        debug!(
            event = "EvaluateTarget",
            phase = "NotEnforced",
            identity = identity.unwrap_or_default(),
            target_id,
            target_type,
            permission
        );
        TargetCheck::NotEnforced
    }

    /// Boolean form of [`evaluate_target`](Self::evaluate_target). Always `true`.
    pub fn has_target_permission(
        &self,
        identity: Option<&str>,
        target_id: &str,
        target_type: &str,
        permission: &str,
    ) -> bool {
        self.evaluate_target(identity, target_id, target_type, permission)
            .is_allowed()
    }

    fn contained(
        &self,
        identity: &str,
        expression: &str,
        eval_trace: &mut EvaluationTrace,
    ) -> Decision {
        let start = Instant::now();
        debug!(
            event = "Evaluate",
            phase = "Begin",
            identity,
            expression
        );

        let decision = match self.decide(identity, expression, eval_trace) {
            Ok(decision) => decision,
            Err(err) => {
                error!(
                    event = "Evaluate",
                    phase = "Error",
                    identity,
                    expression,
                    error = %err
                );
                Decision::deny(DenyReason::from(&err))
            }
        };

        debug!(
            event = "Evaluate",
            phase = "End",
            decision = decision.to_string(),
            mode = ?eval_trace.mode,
            elapsed_us = start.elapsed().as_micros() as u64,
            parse_us = eval_trace.phases.parse.as_micros() as u64,
            resolve_us = eval_trace.phases.resolve.as_micros() as u64,
            match_us = eval_trace.phases.matching.as_micros() as u64
        );

        decision
    }

    fn decide(
        &self,
        identity: &str,
        expression: &str,
        eval_trace: &mut EvaluationTrace,
    ) -> Result<Decision, PolicyError> {
        let (identity, expr) = {
            let _timer = PhaseTimer::new(&mut eval_trace.phases.parse);
            (identity.parse::<Identity>()?, parser::decode(expression)?)
        };
        eval_trace.mode = Some(expr.mode().clone());

        if !expr.mode().is_recognized() {
            trace!(
                event = "Evaluate",
                phase = "UnrecognizedMode",
                mode = expr.mode().to_string()
            );
            return Ok(Decision::deny(DenyReason::UnrecognizedMode));
        }

        let grants = {
            let _timer = PhaseTimer::new(&mut eval_trace.phases.resolve);
            self.resolver.resolve(&identity, expr.mode())?
        };

        let matched = {
            let _timer = PhaseTimer::new(&mut eval_trace.phases.matching);
            matching_grants(expr.required(), &grants)
        };

        if matched.is_empty() {
            trace!(event = "Evaluate", phase = "Invalid", mode = expr.mode().to_string());
            Ok(Decision::deny(DenyReason::NoMatchingGrant))
        } else {
            trace!(
                event = "Evaluate",
                phase = "Valid",
                mode = expr.mode().to_string(),
                matched = matched.join(",")
            );
            Ok(Decision::Allow { matched })
        }
    }
}
