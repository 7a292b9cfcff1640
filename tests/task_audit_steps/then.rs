//! Then steps for task audit BDD scenarios.

use super::world::{TaskAuditWorld, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;
use taskward::task::{ports::TaskRepository, services::ErrorKind};

fn parse_kind(raw: &str) -> Result<ErrorKind, eyre::Report> {
    match raw {
        "not found" => Ok(ErrorKind::NotFound),
        "unauthorized" => Ok(ErrorKind::Unauthorized),
        "assignee not found" => Ok(ErrorKind::AssigneeNotFound),
        "validation" => Ok(ErrorKind::Validation),
        other => Err(eyre!("unknown error kind in scenario: {other}")),
    }
}

#[then("the operation succeeds")]
fn operation_succeeds(world: &TaskAuditWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre!("no operation was attempted"))?;
    outcome
        .as_ref()
        .map_err(|err| eyre!("unexpected operation failure: {err}"))?;
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails_with(world: &TaskAuditWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = parse_kind(&kind)?;
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre!("no operation was attempted"))?;
    let Err(err) = outcome else {
        return Err(eyre!("expected {kind} failure, but the operation succeeded"));
    };
    eyre::ensure!(
        err.kind() == expected,
        "expected {expected:?}, found {:?}",
        err.kind()
    );
    Ok(())
}

#[then(r#"the activity seen by "{reader}" is "{actions}""#)]
fn activity_seen_by(
    world: &TaskAuditWorld,
    reader: String,
    actions: String,
) -> Result<(), eyre::Report> {
    let reader_id = world.user(&reader)?;
    let task_id = world.task()?.id();
    let entries = run_async(world.service.get_activity(reader_id, task_id))
        .wrap_err("read task activity")?;
    let recorded: Vec<&str> = entries.iter().map(|entry| entry.action().as_str()).collect();
    let expected: Vec<&str> = actions.split(',').map(str::trim).collect();
    eyre::ensure!(
        recorded == expected,
        "expected activity {expected:?}, found {recorded:?}"
    );
    Ok(())
}

#[then(r#"the latest entry reads "{details}""#)]
fn latest_entry_details(world: &TaskAuditWorld, details: String) -> Result<(), eyre::Report> {
    let owner_id = world.task()?.owner_id();
    let task_id = world.task()?.id();
    let entries = run_async(world.service.get_activity(owner_id, task_id))
        .wrap_err("read task activity")?;
    let latest = entries
        .last()
        .ok_or_else(|| eyre!("task activity is empty"))?;
    eyre::ensure!(
        latest.details() == Some(details.as_str()),
        "expected details {details:?}, found {:?}",
        latest.details()
    );
    Ok(())
}

#[then("no activity is returned")]
fn no_activity_returned(world: &TaskAuditWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_activity.is_none(),
        "activity was returned to a user who may not read it"
    );
    Ok(())
}

#[then("the task still exists")]
fn task_still_exists(world: &TaskAuditWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.tasks.find_by_id(task_id)).wrap_err("look up task")?;
    eyre::ensure!(stored.is_some(), "task {task_id} was removed");
    Ok(())
}

#[then("the task no longer exists")]
fn task_no_longer_exists(world: &TaskAuditWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let stored = run_async(world.tasks.find_by_id(task_id)).wrap_err("look up task")?;
    eyre::ensure!(stored.is_none(), "task {task_id} still exists");
    Ok(())
}

#[then(r#"the task is owned by "{owner}" and incomplete"#)]
fn task_owned_and_incomplete(world: &TaskAuditWorld, owner: String) -> Result<(), eyre::Report> {
    let owner_id = world.user(&owner)?;
    let task = world.task()?;
    eyre::ensure!(task.owner_id() == owner_id, "task owner mismatch");
    eyre::ensure!(!task.is_completed(), "new task should be incomplete");
    eyre::ensure!(task.assigned_to().is_none(), "new task should be unassigned");
    Ok(())
}
