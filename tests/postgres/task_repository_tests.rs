//! Task CRUD, uniqueness, and listing tests against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, task_created_at, test_runtime};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskward::config::PaginationConfig;
use taskward::identity::domain::UserId;
use taskward::task::{
    domain::{PageRequest, Task, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};

#[rstest]
fn long_title_round_trips(shared_test_cluster: &'static TestCluster) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "tasks_long_title")?;
    let repo = db.tasks();
    let rt = test_runtime()?;
    let title = "Quarterly review notes ".repeat(14).trim_end().to_owned();
    assert!(title.chars().count() > 300);
    let mut task = Task::new(
        UserId::new(),
        TaskTitle::new(title.clone())?,
        Some("Carry over action items".to_owned()),
        &DefaultClock,
    );
    task.assign_to(UserId::new(), &DefaultClock);

    rt.block_on(repo.insert(&task))?;
    let found = rt
        .block_on(repo.find_by_id(task.id()))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;

    assert_eq!(found.title().as_str(), title);
    assert_eq!(found.assigned_to(), task.assigned_to());
    assert_eq!(found.owner_id(), task.owner_id());
    Ok(())
}

#[rstest]
fn duplicate_insert_is_rejected(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "tasks_duplicate")?;
    let repo = db.tasks();
    let rt = test_runtime()?;
    let task = task_created_at(UserId::new(), "Water plants", 0)?;

    rt.block_on(repo.insert(&task))?;
    let result = rt.block_on(repo.insert(&task));

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()
    ));
    Ok(())
}

#[rstest]
fn update_and_delete_of_missing_task_are_not_found(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "tasks_missing")?;
    let repo = db.tasks();
    let rt = test_runtime()?;
    let ghost = task_created_at(UserId::new(), "Never stored", 0)?;

    let updated = rt.block_on(repo.update(&ghost));
    let deleted = rt.block_on(repo.delete(ghost.id()));

    assert!(matches!(updated, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()));
    assert!(matches!(deleted, Err(TaskRepositoryError::NotFound(id)) if id == ghost.id()));
    assert!(rt.block_on(repo.find_by_id(TaskId::new()))?.is_none());
    Ok(())
}

#[rstest]
fn update_persists_mutable_fields(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "tasks_update")?;
    let repo = db.tasks();
    let rt = test_runtime()?;
    let mut task = task_created_at(UserId::new(), "Water plants", 0)?;
    rt.block_on(repo.insert(&task))?;

    let assignee = UserId::new();
    task.assign_to(assignee, &DefaultClock);
    task.mark_complete(&DefaultClock);
    rt.block_on(repo.update(&task))?;
    let found = rt
        .block_on(repo.find_by_id(task.id()))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;

    assert!(found.is_completed());
    assert_eq!(found.assigned_to(), Some(assignee));
    assert_eq!(
        found.updated_at().timestamp_micros(),
        task.updated_at().timestamp_micros()
    );
    assert_eq!(found.created_at(), task.created_at());
    Ok(())
}

#[rstest]
fn listings_are_newest_first_with_totals(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), eyre::Report> {
    let db = TestDatabase::create(shared_test_cluster, "tasks_listing")?;
    let repo = db.tasks();
    let rt = test_runtime()?;
    let owner = UserId::new();
    let assignee = UserId::new();

    let mut stored = Vec::new();
    for minutes in [0, 10, 20] {
        let mut task = task_created_at(owner, "Weekly chore", minutes)?;
        if minutes > 0 {
            task.assign_to(assignee, &DefaultClock);
        }
        rt.block_on(repo.insert(&task))?;
        stored.push(task.id());
    }
    rt.block_on(repo.insert(&task_created_at(UserId::new(), "Someone else's", 30)?))?;

    let config = PaginationConfig::default();
    let first = rt.block_on(repo.list_by_owner(owner, PageRequest::new(1, 2, &config)?))?;
    let second = rt.block_on(repo.list_by_owner(owner, PageRequest::new(2, 2, &config)?))?;
    let assigned =
        rt.block_on(repo.list_by_assignee(assignee, PageRequest::new(1, 10, &config)?))?;

    let ids = |tasks: &[Task]| tasks.iter().map(Task::id).collect::<Vec<_>>();
    let newest_first: Vec<TaskId> = stored.iter().rev().copied().collect();
    assert_eq!(first.total, 3);
    assert_eq!(ids(&first.items), newest_first.get(..2).unwrap_or_default());
    assert_eq!(ids(&second.items), newest_first.get(2..).unwrap_or_default());
    assert_eq!(assigned.total, 2);
    assert_eq!(ids(&assigned.items), newest_first.get(..2).unwrap_or_default());
    Ok(())
}
