//! Owner/assignee authorization rules.

use super::{AuthorizationPolicy, Decision, DenialReason, Operation};
use crate::identity::domain::UserId;
use crate::task::domain::Task;

/// Default policy: owners control everything, assignees may read and
/// complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipPolicy;

impl OwnershipPolicy {
    /// Creates the policy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AuthorizationPolicy for OwnershipPolicy {
    fn check(&self, actor: UserId, task: &Task, operation: Operation) -> Decision {
        let is_owner = task.is_owned_by(actor);
        let is_assignee = task.is_assigned_to(actor);

        let allowed = match operation {
            Operation::Create => true,
            Operation::Read | Operation::Complete => is_owner || is_assignee,
            Operation::Update | Operation::Assign | Operation::Delete => is_owner,
        };

        if allowed {
            Decision::Allowed
        } else if is_owner || is_assignee {
            Decision::Denied(DenialReason::InsufficientRole)
        } else {
            Decision::Denied(DenialReason::NotRelated)
        }
    }
}
