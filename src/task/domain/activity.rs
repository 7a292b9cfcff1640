//! Activity log entries recorded for task mutations.

use super::{ActivityEntryId, ParseActivityActionError, TaskId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation recorded by an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// The task was created.
    Created,
    /// Owner-editable fields changed.
    Updated,
    /// The task was delegated to a user.
    Assigned,
    /// The task was marked complete.
    Completed,
    /// The task was deleted. Always the final entry for a task.
    Deleted,
}

impl ActivityAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }
}

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ParseActivityActionError(value.to_owned())),
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity entry awaiting a store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivityEntry {
    /// Task the action was performed on.
    pub task_id: TaskId,
    /// Acting user.
    pub user_id: UserId,
    /// Recorded action.
    pub action: ActivityAction,
    /// Optional human-readable note.
    pub details: Option<String>,
    /// User the action targeted, set for assignments.
    pub subject_user: Option<UserId>,
    /// Time of the action.
    pub timestamp: DateTime<Utc>,
}

impl NewActivityEntry {
    /// Creates an entry without details, stamped with the clock time.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        user_id: UserId,
        action: ActivityAction,
        clock: &impl Clock,
    ) -> Self {
        Self {
            task_id,
            user_id,
            action,
            details: None,
            subject_user: None,
            timestamp: clock.utc(),
        }
    }

    /// Creates an `assigned` entry naming the new assignee.
    #[must_use]
    pub fn assigned(
        task_id: TaskId,
        user_id: UserId,
        assignee: UserId,
        assignee_name: &str,
        clock: &impl Clock,
    ) -> Self {
        Self {
            details: Some(format!("Assigned to {assignee_name}")),
            subject_user: Some(assignee),
            ..Self::new(task_id, user_id, ActivityAction::Assigned, clock)
        }
    }

    /// Raises the timestamp to at least `floor`.
    ///
    /// Mutations stamp entries no earlier than the task's `updated_at`, so a
    /// regressed clock cannot reorder a task's history.
    #[must_use]
    pub fn not_before(mut self, floor: DateTime<Utc>) -> Self {
        self.timestamp = self.timestamp.max(floor);
        self
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn into_entry(self, id: ActivityEntryId) -> ActivityEntry {
        ActivityEntry {
            id,
            task_id: self.task_id,
            user_id: self.user_id,
            action: self.action,
            details: self.details,
            subject_user: self.subject_user,
            timestamp: self.timestamp,
        }
    }
}

/// Immutable record of one successful task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    id: ActivityEntryId,
    task_id: TaskId,
    user_id: UserId,
    action: ActivityAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject_user: Option<UserId>,
    timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityEntryId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.action
    }

    /// Returns the human-readable note, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the targeted user for assignments.
    #[must_use]
    pub const fn subject_user(&self) -> Option<UserId> {
        self.subject_user
    }

    /// Returns the action timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Key giving the total chronological order: timestamp, then id.
    #[must_use]
    pub const fn sort_key(&self) -> (DateTime<Utc>, ActivityEntryId) {
        (self.timestamp, self.id)
    }
}
