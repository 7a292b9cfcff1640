//! Diesel row models for task and activity persistence.

use super::schema::{activity_log, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Current assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Current assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable task columns; `owner_id` and `created_at` are
/// never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Current assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for activity entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activity_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityRow {
    /// Entry identifier.
    pub id: i64,
    /// Task the entry belongs to.
    pub task_id: uuid::Uuid,
    /// Acting user.
    pub user_id: uuid::Uuid,
    /// Recorded action.
    pub action: String,
    /// Optional note.
    pub details: Option<String>,
    /// Targeted user for assignments.
    pub subject_user: Option<uuid::Uuid>,
    /// Time of the action.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for activity entries; the identifier comes from the
/// sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = activity_log)]
pub struct NewActivityRow {
    /// Task the entry belongs to.
    pub task_id: uuid::Uuid,
    /// Acting user.
    pub user_id: uuid::Uuid,
    /// Recorded action.
    pub action: String,
    /// Optional note.
    pub details: Option<String>,
    /// Targeted user for assignments.
    pub subject_user: Option<uuid::Uuid>,
    /// Time of the action.
    pub recorded_at: DateTime<Utc>,
}
