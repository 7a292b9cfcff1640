//! When steps for task audit BDD scenarios.

use super::world::{TaskAuditWorld, run_async};
use rstest_bdd_macros::when;
use taskward::identity::domain::UserId;
use taskward::task::services::CreateTaskRequest;

#[when(r#""{actor}" creates a task titled "{title}""#)]
fn create_task(world: &mut TaskAuditWorld, actor: String, title: String) -> Result<(), eyre::Report> {
    let actor_id = world.user(&actor)?;
    let result = run_async(world.service.create(actor_id, CreateTaskRequest::new(title)));
    if let Ok(ref created) = result {
        world.current_task = Some(created.clone());
    }
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{actor}" marks the task complete"#)]
fn complete_task(world: &mut TaskAuditWorld, actor: String) -> Result<(), eyre::Report> {
    let actor_id = world.user(&actor)?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.mark_complete(actor_id, task_id));
    if let Ok(ref updated) = result {
        world.current_task = Some(updated.clone());
    }
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{actor}" deletes the task"#)]
fn delete_task(world: &mut TaskAuditWorld, actor: String) -> Result<(), eyre::Report> {
    let actor_id = world.user(&actor)?;
    let task_id = world.task()?.id();
    world.last_outcome = Some(run_async(world.service.delete(actor_id, task_id)));
    Ok(())
}

#[when(r#""{actor}" assigns the task to an unregistered user"#)]
fn assign_to_unregistered(world: &mut TaskAuditWorld, actor: String) -> Result<(), eyre::Report> {
    let actor_id = world.user(&actor)?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.assign(actor_id, task_id, UserId::new()));
    world.last_outcome = Some(result.map(|_| ()));
    Ok(())
}

#[when(r#""{actor}" requests the task activity"#)]
fn request_activity(world: &mut TaskAuditWorld, actor: String) -> Result<(), eyre::Report> {
    let actor_id = world.user(&actor)?;
    let task_id = world.task()?.id();
    match run_async(world.service.get_activity(actor_id, task_id)) {
        Ok(entries) => {
            world.last_activity = Some(entries);
            world.last_outcome = Some(Ok(()));
        }
        Err(err) => {
            world.last_activity = None;
            world.last_outcome = Some(Err(err));
        }
    }
    Ok(())
}
