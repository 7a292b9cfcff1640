//! Authorization policy for task operations.
//!
//! Decisions are a pure function of the acting user, a task snapshot, and the
//! requested [`Operation`]. The policy never touches a store, so every rule
//! can be exercised with synthetic tasks.

mod access;
mod ownership;

pub use access::ReadAccess;
pub use ownership::OwnershipPolicy;

use crate::identity::domain::UserId;
use crate::task::domain::Task;
use std::fmt;

/// Operation requested against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a task owned by the actor.
    Create,
    /// Read the task or its activity log.
    Read,
    /// Change the title, description, or completion flag.
    Update,
    /// Delegate the task to another user.
    Assign,
    /// Mark the task complete.
    Complete,
    /// Remove the task.
    Delete,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Assign,
        Self::Complete,
        Self::Delete,
    ];

    /// Returns a lowercase operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Assign => "assign",
            Self::Complete => "complete",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// The actor is neither owner nor assignee of the task.
    NotRelated,
    /// The actor is related to the task but the operation needs more rights.
    InsufficientRole,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The operation may proceed.
    Allowed,
    /// The operation is refused.
    Denied(DenialReason),
}

impl Decision {
    /// Returns `true` for [`Decision::Allowed`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Authorization decision function injected into the lifecycle service.
pub trait AuthorizationPolicy: Send + Sync {
    /// Decides whether `actor` may perform `operation` on `task`.
    ///
    /// `Create` is evaluated against the freshly built task.
    fn check(&self, actor: UserId, task: &Task, operation: Operation) -> Decision;
}
