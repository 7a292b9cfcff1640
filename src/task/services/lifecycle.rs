//! Service layer enforcing authorization and recording task activity.
//!
//! Every mutation follows the same protocol: load the task snapshot, ask the
//! [`AuthorizationPolicy`], write the store, then append exactly one
//! [`ActivityEntry`]. Failed calls never append. With a [`TaskUnitOfWork`]
//! configured, the write and the append commit together.

use super::error::{TaskLifecycleError, TaskLifecycleResult};
use crate::config::PaginationConfig;
use crate::identity::{domain::UserId, ports::IdentityProvider};
use crate::task::{
    domain::{
        ActivityAction, ActivityEntry, NewActivityEntry, Page, PageRequest, Task, TaskId,
        TaskPatch, TaskTitle,
    },
    policy::{AuthorizationPolicy, Decision, Operation, OwnershipPolicy, ReadAccess},
    ports::{ActivityLogRepository, TaskRepository, TaskUnitOfWork, TaskWrite},
};
use mockable::Clock;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    fn into_patch(self) -> TaskLifecycleResult<TaskPatch> {
        let title = self.title.map(TaskTitle::new).transpose()?;
        Ok(TaskPatch {
            title,
            description: self.description,
            completed: self.completed,
        })
    }
}

/// Task lifecycle orchestration service.
///
/// Collaborators are injected at construction so tests can substitute
/// in-memory fakes.
#[derive(Clone)]
pub struct TaskLifecycleService<R, L, I, C, P = OwnershipPolicy>
where
    R: TaskRepository,
    L: ActivityLogRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
    P: AuthorizationPolicy,
{
    tasks: Arc<R>,
    activity_log: Arc<L>,
    identity: Arc<I>,
    clock: Arc<C>,
    policy: Arc<P>,
    unit_of_work: Option<Arc<dyn TaskUnitOfWork>>,
    pagination: PaginationConfig,
}

impl<R, L, I, C> TaskLifecycleService<R, L, I, C, OwnershipPolicy>
where
    R: TaskRepository,
    L: ActivityLogRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates a service using the owner/assignee policy.
    #[must_use]
    pub fn new(tasks: Arc<R>, activity_log: Arc<L>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self::with_policy(
            tasks,
            activity_log,
            identity,
            clock,
            Arc::new(OwnershipPolicy::new()),
        )
    }
}

impl<R, L, I, C, P> TaskLifecycleService<R, L, I, C, P>
where
    R: TaskRepository,
    L: ActivityLogRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
    P: AuthorizationPolicy,
{
    /// Creates a service with an explicit authorization policy.
    #[must_use]
    pub fn with_policy(
        tasks: Arc<R>,
        activity_log: Arc<L>,
        identity: Arc<I>,
        clock: Arc<C>,
        policy: Arc<P>,
    ) -> Self {
        Self {
            tasks,
            activity_log,
            identity,
            clock,
            policy,
            unit_of_work: None,
            pagination: PaginationConfig::default(),
        }
    }

    /// Routes every mutation through `unit_of_work`.
    ///
    /// The task write and its activity entry then succeed or fail together,
    /// and [`TaskLifecycleError::PartialFailure`] is never returned.
    #[must_use]
    pub fn with_unit_of_work(mut self, unit_of_work: Arc<dyn TaskUnitOfWork>) -> Self {
        self.unit_of_work = Some(unit_of_work);
        self
    }

    /// Replaces the pagination bounds.
    #[must_use]
    pub const fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Builds a validated page request from optional caller input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for non-positive values or
    /// a limit above the configured maximum.
    pub fn page_request(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> TaskLifecycleResult<PageRequest> {
        Ok(PageRequest::from_query(page, limit, &self.pagination)?)
    }

    /// Creates a task owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for an empty title,
    /// [`TaskLifecycleError::StoreUnavailable`] when the insert fails, and
    /// [`TaskLifecycleError::PartialFailure`] when the task was stored but
    /// the `created` entry was not.
    pub async fn create(
        &self,
        actor: UserId,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest { title, description } = request;
        let task = Task::new(actor, TaskTitle::new(title)?, description, &*self.clock);
        self.authorize(actor, &task, Operation::Create)?;

        let entry = NewActivityEntry::new(task.id(), actor, ActivityAction::Created, &*self.clock)
            .not_before(task.updated_at());
        self.commit(TaskWrite::Insert(task.clone()), entry).await?;

        info!(task_id = %task.id(), actor = %actor, "task created");
        Ok(task)
    }

    /// Returns a task the actor may read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task is absent or
    /// the actor is neither owner nor assignee.
    pub async fn get(&self, actor: UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        self.authorized_snapshot(actor, id, Operation::Read).await
    }

    /// Applies a partial update. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] for an empty replacement
    /// title, [`TaskLifecycleError::NotFound`] or
    /// [`TaskLifecycleError::Unauthorized`] when the actor may not update,
    /// and store or partial failures from collaborators.
    pub async fn update(
        &self,
        actor: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let patch = request.into_patch()?;
        let mut task = self.authorized_snapshot(actor, id, Operation::Update).await?;
        if patch.is_empty() {
            debug!(task_id = %id, "empty update recorded");
        }

        task.apply_patch(patch, &*self.clock);
        let entry = NewActivityEntry::new(id, actor, ActivityAction::Updated, &*self.clock)
            .not_before(task.updated_at());
        self.commit(TaskWrite::Update(task.clone()), entry).await?;

        info!(task_id = %id, actor = %actor, "task updated");
        Ok(task)
    }

    /// Delegates a task to `assignee`. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AssigneeNotFound`] when the identity
    /// provider does not know `assignee`, plus the errors of
    /// [`TaskLifecycleService::update`].
    pub async fn assign(
        &self,
        actor: UserId,
        id: TaskId,
        assignee: UserId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.authorized_snapshot(actor, id, Operation::Assign).await?;
        let assignee_name = self
            .identity
            .display_name(assignee)
            .await?
            .ok_or(TaskLifecycleError::AssigneeNotFound(assignee))?;

        task.assign_to(assignee, &*self.clock);
        let entry =
            NewActivityEntry::assigned(id, actor, assignee, &assignee_name, &*self.clock)
                .not_before(task.updated_at());
        self.commit(TaskWrite::Update(task.clone()), entry).await?;

        info!(task_id = %id, actor = %actor, assignee = %assignee, "task assigned");
        Ok(task)
    }

    /// Marks a task complete. Owner or assignee.
    ///
    /// Completing an already completed task succeeds and is logged again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or
    /// [`TaskLifecycleError::Unauthorized`] when the actor may not complete
    /// the task, and store or partial failures from collaborators.
    pub async fn mark_complete(&self, actor: UserId, id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self
            .authorized_snapshot(actor, id, Operation::Complete)
            .await?;
        if task.is_completed() {
            debug!(task_id = %id, "task was already complete");
        }

        task.mark_complete(&*self.clock);
        let entry = NewActivityEntry::new(id, actor, ActivityAction::Completed, &*self.clock)
            .not_before(task.updated_at());
        self.commit(TaskWrite::Update(task.clone()), entry).await?;

        info!(task_id = %id, actor = %actor, "task completed");
        Ok(task)
    }

    /// Deletes a task and appends its final `deleted` entry. Owner only.
    ///
    /// The task's activity history is retained.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or
    /// [`TaskLifecycleError::Unauthorized`] when the actor may not delete
    /// the task, and store or partial failures from collaborators.
    pub async fn delete(&self, actor: UserId, id: TaskId) -> TaskLifecycleResult<()> {
        let task = self.authorized_snapshot(actor, id, Operation::Delete).await?;

        let entry = NewActivityEntry::new(id, actor, ActivityAction::Deleted, &*self.clock)
            .not_before(task.updated_at());
        self.commit(TaskWrite::Delete(id), entry).await?;

        info!(task_id = %id, actor = %actor, "task deleted");
        Ok(())
    }

    /// Lists tasks owned by `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::StoreUnavailable`] when the store fails.
    pub async fn list_owned(
        &self,
        actor: UserId,
        page: PageRequest,
    ) -> TaskLifecycleResult<Page<Task>> {
        Ok(self.tasks.list_by_owner(actor, page).await?)
    }

    /// Lists tasks assigned to `actor`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::StoreUnavailable`] when the store fails.
    pub async fn list_assigned(
        &self,
        actor: UserId,
        page: PageRequest,
    ) -> TaskLifecycleResult<Page<Task>> {
        Ok(self.tasks.list_by_assignee(actor, page).await?)
    }

    /// Returns a task's activity entries, oldest first, ordered by
    /// timestamp then entry id.
    ///
    /// For a deleted task the retained history is returned to the users who
    /// could read the task when it was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the actor may not read
    /// the task or no trace of it exists, and
    /// [`TaskLifecycleError::StoreUnavailable`] when a store fails.
    pub async fn get_activity(
        &self,
        actor: UserId,
        id: TaskId,
    ) -> TaskLifecycleResult<Vec<ActivityEntry>> {
        let snapshot = self.tasks.find_by_id(id).await?;
        if let Some(task) = &snapshot {
            self.authorize(actor, task, Operation::Read)?;
        }

        let mut entries = self.activity_log.list_by_task(id).await?;
        entries.sort_by_key(ActivityEntry::sort_key);

        if snapshot.is_none() {
            let permitted = ReadAccess::from_history(&entries)
                .is_some_and(|access| access.permits(actor));
            if !permitted {
                return Err(TaskLifecycleError::NotFound(id));
            }
        }
        Ok(entries)
    }

    /// Returns every entry the actor performed, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::StoreUnavailable`] when the log fails.
    pub async fn get_user_activity(
        &self,
        actor: UserId,
    ) -> TaskLifecycleResult<Vec<ActivityEntry>> {
        let mut entries = self.activity_log.list_by_user(actor).await?;
        entries.sort_by_key(|entry| Reverse(entry.sort_key()));
        Ok(entries)
    }

    async fn authorized_snapshot(
        &self,
        actor: UserId,
        id: TaskId,
        operation: Operation,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(id))?;
        self.authorize(actor, &task, operation)?;
        Ok(task)
    }

    /// Maps a denial to `Unauthorized` for actors who can see the task and
    /// to `NotFound` for everyone else.
    fn authorize(
        &self,
        actor: UserId,
        task: &Task,
        operation: Operation,
    ) -> TaskLifecycleResult<()> {
        let Decision::Denied(reason) = self.policy.check(actor, task, operation) else {
            return Ok(());
        };

        warn!(
            task_id = %task.id(),
            actor = %actor,
            %operation,
            ?reason,
            "task operation denied"
        );
        if self.policy.check(actor, task, Operation::Read).is_allowed() {
            Err(TaskLifecycleError::Unauthorized { operation })
        } else {
            Err(TaskLifecycleError::NotFound(task.id()))
        }
    }

    async fn commit(
        &self,
        write: TaskWrite,
        entry: NewActivityEntry,
    ) -> TaskLifecycleResult<ActivityEntry> {
        if let Some(unit_of_work) = &self.unit_of_work {
            let task_id = entry.task_id;
            let action = entry.action;
            return unit_of_work.commit(write, entry).await.map_err(|source| {
                error!(
                    task_id = %task_id,
                    %action,
                    error = %source,
                    "task mutation rolled back"
                );
                source.into()
            });
        }

        match write {
            TaskWrite::Insert(task) => self.tasks.insert(&task).await?,
            TaskWrite::Update(task) => self.tasks.update(&task).await?,
            TaskWrite::Delete(task_id) => self.tasks.delete(task_id).await?,
        }
        self.record(entry).await
    }

    async fn record(&self, entry: NewActivityEntry) -> TaskLifecycleResult<ActivityEntry> {
        let task_id = entry.task_id;
        let actor = entry.user_id;
        let action = entry.action;

        self.activity_log.append(entry).await.map_err(|source| {
            error!(
                task_id = %task_id,
                actor = %actor,
                %action,
                error = %source,
                "task mutation applied but activity entry was not recorded"
            );
            TaskLifecycleError::PartialFailure {
                task_id,
                action,
                source,
            }
        })
    }
}
