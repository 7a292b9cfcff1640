//! In-memory append-only activity log.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::identity::domain::UserId;
use crate::task::{
    domain::{ActivityEntry, ActivityEntryId, NewActivityEntry, TaskId},
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};

/// Thread-safe in-memory activity log.
///
/// Entries are kept in append order and receive identifiers starting at 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    state: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl InMemoryActivityLog {
    /// Creates an empty activity log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries across all tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Persistence`] when the state lock is
    /// poisoned.
    pub fn len(&self) -> ActivityLogResult<usize> {
        Ok(self.state.read().map_err(poisoned)?.len())
    }

    /// Returns `true` when no entry has been appended.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::Persistence`] when the state lock is
    /// poisoned.
    pub fn is_empty(&self) -> ActivityLogResult<bool> {
        Ok(self.len()? == 0)
    }

    fn select(
        &self,
        matches: impl Fn(&ActivityEntry) -> bool,
    ) -> ActivityLogResult<Vec<ActivityEntry>> {
        let entries = self.state.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .filter(|entry| matches(entry))
            .cloned()
            .collect())
    }
}

fn poisoned(err: impl std::fmt::Display) -> ActivityLogError {
    ActivityLogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLog {
    async fn append(&self, entry: NewActivityEntry) -> ActivityLogResult<ActivityEntry> {
        let mut entries = self.state.write().map_err(poisoned)?;
        let next_id = i64::try_from(entries.len())
            .map_err(ActivityLogError::persistence)?
            .saturating_add(1);
        let stored = entry.into_entry(ActivityEntryId::new(next_id));
        entries.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityEntry>> {
        self.select(|entry| entry.task_id() == task_id)
    }

    async fn list_by_user(&self, user_id: UserId) -> ActivityLogResult<Vec<ActivityEntry>> {
        self.select(|entry| entry.user_id() == user_id)
    }
}
