//! Step completion and cascading activation.

use jiff::{SignedDuration, Timestamp};

use super::{lifecycle, validation, EngineContext};
use crate::{
    error::{Result, TrackerError},
    models::{CompletionEvidence, Evidence, Process, ProcessStatus, StepCompletion, StepStatus},
    notify::Notification,
};

/// Completes a step of an active process.
///
/// Every pending step that depends on the completed one moves to
/// in-progress, in a single non-transitive pass over the steps in display
/// order. A dependent whose relative due date is anchored on the completed
/// step gets `due_date = now + hours`. When every step is then completed the
/// lifecycle controller settles the process.
///
/// # Errors
///
/// - `InvalidState` if the process is not active or the step is already
///   completed
/// - `StepNotFound` if the step does not exist
/// - `Validation` if the actor is blank or the evidence does not satisfy the
///   step's requirements
///
/// The process is unchanged whenever an error is returned.
pub fn complete_step(
    process: &mut Process,
    step_id: &str,
    actor: &str,
    evidence: &[Evidence],
    ctx: EngineContext<'_>,
) -> Result<Vec<Notification>> {
    if process.status != ProcessStatus::Active {
        return Err(TrackerError::invalid_state(
            format!("complete step '{step_id}'"),
            format!("process {} is {}, not active", process.id, process.status),
        ));
    }

    let index = process
        .step_index(step_id)
        .ok_or_else(|| TrackerError::StepNotFound {
            process_id: process.id,
            step_id: step_id.to_string(),
        })?;

    let step = &process.steps[index];
    if !step.status.is_open() {
        return Err(TrackerError::invalid_state(
            format!("complete step '{step_id}'"),
            "the step is already completed",
        ));
    }

    let actor = validation::required("actor", actor)?;
    let collected = CompletionEvidence::collect(&step.requirements, evidence)?;
    let activations = plan_activations(process, index, ctx.now)?;

    let mut notifications = Vec::new();

    let step = &mut process.steps[index];
    step.status = StepStatus::Completed;
    step.completion = Some(StepCompletion {
        completed_at: ctx.now,
        completed_by: actor.clone(),
        attachments: collected.attachments,
        notes: collected.notes,
        confirmed: collected.confirmed,
    });
    log::debug!("process {}: step '{}' completed by {}", process.id, step.id, actor);
    notifications.push(Notification::new(
        ctx.admin_recipient,
        format!("Step Completed: {}", step.title),
        format!(
            "Step \"{}\" in process \"{}\" has been completed by {}.",
            step.title, process.name, actor
        ),
    ));

    for (dependent, due_date) in activations {
        let step = &mut process.steps[dependent];
        step.status = StepStatus::InProgress;
        log::debug!("process {}: step '{}' activated", process.id, step.id);

        if let Some(due) = due_date {
            step.due_date = Some(due);
            notifications.push(Notification::new(
                step.assignee.clone(),
                format!("New Task: {}", step.title),
                format!(
                    "You have been assigned to \"{}\" in process \"{}\". Due by {}.",
                    step.title, process.name, due
                ),
            ));
        }
    }

    process.updated_at = ctx.now;
    notifications.extend(lifecycle::settle(process, ctx));

    Ok(notifications)
}

/// Computes which steps activate when the step at `completed` finishes, and
/// the due date each one receives, without touching the process.
fn plan_activations(
    process: &Process,
    completed: usize,
    now: Timestamp,
) -> Result<Vec<(usize, Option<Timestamp>)>> {
    let completed_id = process.steps[completed].id.as_str();

    process
        .steps
        .iter()
        .enumerate()
        .filter(|(i, step)| {
            *i != completed
                && step.status == StepStatus::Pending
                && step.depends_on_step(completed_id)
        })
        .map(|(i, step)| {
            let due = match &step.relative_due_date {
                Some(rule) if rule.step_id == completed_id => {
                    Some(relative_due_date(now, rule.hours).map_err(|reason| {
                        TrackerError::validation(format!("steps.{}.relative_due_date", step.id))
                            .with_reason(reason)
                    })?)
                }
                _ => None,
            };
            Ok((i, due))
        })
        .collect()
}

/// `now + hours`, in exact elapsed hours.
pub fn relative_due_date(now: Timestamp, hours: u32) -> std::result::Result<Timestamp, String> {
    now.checked_add(SignedDuration::from_hours(i64::from(hours)))
        .map_err(|e| format!("{hours} hours after {now} is out of range: {e}"))
}
