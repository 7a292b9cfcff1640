//! Diesel schema for task and activity log persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title. Unbounded, as `TaskTitle` is.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Completion flag.
        completed -> Bool,
        /// Owning user.
        owner_id -> Uuid,
        /// Current assignee.
        assigned_to -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only task activity entries. Rows outlive their task.
    activity_log (id) {
        /// Monotonic entry identifier.
        id -> Int8,
        /// Task the entry belongs to.
        task_id -> Uuid,
        /// Acting user.
        user_id -> Uuid,
        /// Recorded action.
        #[max_length = 32]
        action -> Varchar,
        /// Optional human-readable note.
        details -> Nullable<Text>,
        /// Targeted user for assignments.
        subject_user -> Nullable<Uuid>,
        /// Time of the action.
        recorded_at -> Timestamptz,
    }
}
