//! Activity log sequencing, ordering, and immutability against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, reference_time, test_runtime};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskward::identity::domain::UserId;
use taskward::task::{
    domain::{ActivityAction, ActivityEntry, NewActivityEntry, TaskId},
    ports::ActivityLogRepository,
};

fn entry_at(
    task_id: TaskId,
    user_id: UserId,
    action: ActivityAction,
    timestamp: DateTime<Utc>,
) -> NewActivityEntry {
    NewActivityEntry {
        task_id,
        user_id,
        action,
        details: None,
        subject_user: None,
        timestamp,
    }
}

fn actions(entries: &[ActivityEntry]) -> Vec<ActivityAction> {
    entries.iter().map(ActivityEntry::action).collect()
}

#[rstest]
fn task_history_is_ordered_by_time_then_sequence(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "log_ordering")?;
    let log = db.activity_log();
    let rt = test_runtime()?;
    let task = TaskId::new();
    let user = UserId::new();
    let later = reference_time() + Duration::minutes(5);

    let completed =
        rt.block_on(log.append(entry_at(task, user, ActivityAction::Completed, later)))?;
    let created = rt.block_on(log.append(entry_at(
        task,
        user,
        ActivityAction::Created,
        reference_time(),
    )))?;
    let updated = rt.block_on(log.append(entry_at(
        task,
        user,
        ActivityAction::Updated,
        reference_time(),
    )))?;
    rt.block_on(log.append(entry_at(
        TaskId::new(),
        user,
        ActivityAction::Created,
        reference_time(),
    )))?;

    assert!(completed.id() < created.id());
    assert!(created.id() < updated.id());
    let history = rt.block_on(log.list_by_task(task))?;
    assert_eq!(
        actions(&history),
        vec![
            ActivityAction::Created,
            ActivityAction::Updated,
            ActivityAction::Completed,
        ]
    );
    Ok(())
}

#[rstest]
fn user_history_is_newest_first(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "log_user")?;
    let log = db.activity_log();
    let rt = test_runtime()?;
    let actor = UserId::new();

    for minutes in [0, 20, 10] {
        let at = reference_time() + Duration::minutes(minutes);
        rt.block_on(log.append(entry_at(TaskId::new(), actor, ActivityAction::Created, at)))?;
    }
    rt.block_on(log.append(entry_at(
        TaskId::new(),
        UserId::new(),
        ActivityAction::Created,
        reference_time(),
    )))?;

    let history = rt.block_on(log.list_by_user(actor))?;
    let offsets: Vec<i64> = history
        .iter()
        .map(|entry| (entry.timestamp() - reference_time()).num_minutes())
        .collect();
    assert_eq!(offsets, vec![20, 10, 0]);
    Ok(())
}

#[rstest]
fn assignment_details_and_subject_are_stored(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "log_assignment")?;
    let log = db.activity_log();
    let rt = test_runtime()?;
    let task = TaskId::new();
    let assignee = UserId::new();
    let entry = NewActivityEntry {
        details: Some("Assigned to Marie Ndiaye".to_owned()),
        subject_user: Some(assignee),
        ..entry_at(task, UserId::new(), ActivityAction::Assigned, reference_time())
    };

    rt.block_on(log.append(entry))?;
    let history = rt.block_on(log.list_by_task(task))?;
    let stored = history
        .first()
        .ok_or_else(|| eyre::eyre!("entry should be stored"))?;

    assert_eq!(stored.details(), Some("Assigned to Marie Ndiaye"));
    assert_eq!(stored.subject_user(), Some(assignee));
    assert_eq!(stored.timestamp(), reference_time());
    Ok(())
}

#[rstest]
#[case("UPDATE activity_log SET action = 'updated'")]
#[case("DELETE FROM activity_log")]
fn stored_entries_cannot_be_rewritten(
    shared_test_cluster: &'static TestCluster,
    #[case] statement: &str,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "log_append_only")?;
    let log = db.activity_log();
    let rt = test_runtime()?;
    let task = TaskId::new();
    rt.block_on(log.append(entry_at(
        task,
        UserId::new(),
        ActivityAction::Created,
        reference_time(),
    )))?;

    let mut conn = db.raw_connection()?;
    let rewrite = diesel::sql_query(statement).execute(&mut conn);

    assert!(rewrite.is_err());
    let history = rt.block_on(log.list_by_task(task))?;
    assert_eq!(actions(&history), vec![ActivityAction::Created]);
    Ok(())
}
