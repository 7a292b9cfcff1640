//! Read access derived from live tasks or retained activity history.

use crate::identity::domain::UserId;
use crate::task::domain::{ActivityAction, ActivityEntry, Task};

/// Users who may read a task and its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadAccess {
    owner: UserId,
    assignee: Option<UserId>,
}

impl ReadAccess {
    /// Read access for a live task.
    #[must_use]
    pub const fn of_task(task: &Task) -> Self {
        Self {
            owner: task.owner_id(),
            assignee: task.assigned_to(),
        }
    }

    /// Reconstructs read access from a task's retained activity entries.
    ///
    /// The owner is the actor of the `created` entry; the assignee is the
    /// subject of the latest `assigned` entry. Entries must be in
    /// chronological order. Returns `None` when no `created` entry exists.
    #[must_use]
    pub fn from_history(entries: &[ActivityEntry]) -> Option<Self> {
        let owner = entries
            .iter()
            .find(|entry| entry.action() == ActivityAction::Created)?
            .user_id();
        let assignee = entries
            .iter()
            .rev()
            .find(|entry| entry.action() == ActivityAction::Assigned)
            .and_then(ActivityEntry::subject_user);
        Some(Self { owner, assignee })
    }

    /// Returns `true` when `actor` is the owner or the assignee.
    #[must_use]
    pub fn permits(&self, actor: UserId) -> bool {
        self.owner == actor || self.assignee == Some(actor)
    }
}
