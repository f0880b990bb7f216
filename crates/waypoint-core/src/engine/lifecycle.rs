//! Process status transitions: activation, completion, approval, archival.

use super::{validation, EngineContext};
use crate::{
    error::{Result, TrackerError},
    models::{Process, ProcessStatus},
    notify::Notification,
};

/// Fails with `InvalidState` unless the process is still a draft.
pub fn ensure_draft(process: &Process, action: &str) -> Result<()> {
    if process.status != ProcessStatus::Draft {
        return Err(TrackerError::invalid_state(
            action,
            format!(
                "process {} is {}; only draft processes can be edited",
                process.id, process.status
            ),
        ));
    }
    Ok(())
}

/// Moves a draft process to active.
///
/// The definition is validated again as a whole: a name and department, at
/// least one step, and a valid dependency graph. Step statuses are left as
/// they are; steps without dependencies stay pending until completed
/// directly.
pub fn activate(process: &mut Process, ctx: EngineContext<'_>) -> Result<()> {
    if process.status != ProcessStatus::Draft {
        return Err(TrackerError::invalid_state(
            "activate process",
            format!("process {} is {}, not draft", process.id, process.status),
        ));
    }

    validation::validate_definition(&process.name, &process.department)?;
    if process.steps.is_empty() {
        return Err(TrackerError::validation("steps")
            .with_reason("a process needs at least one step to be activated"));
    }
    for (index, step) in process.steps.iter().enumerate() {
        validation::required(&format!("steps[{index}].title"), &step.title)?;
        validation::required(&format!("steps[{index}].assignee"), &step.assignee)?;
    }
    validation::validate_steps(&process.steps)?;

    process.status = ProcessStatus::Active;
    process.updated_at = ctx.now;
    log::info!("process {} '{}' activated", process.id, process.name);
    Ok(())
}

/// Runs after a step completion. When every step is completed the process
/// either completes on its own or, if approval is required, the admin is
/// told it is ready for approval.
pub(crate) fn settle(process: &mut Process, ctx: EngineContext<'_>) -> Vec<Notification> {
    if !process.all_steps_completed() {
        return Vec::new();
    }

    if process.requires_admin_approval {
        log::info!("process {} '{}' awaits approval", process.id, process.name);
        return vec![Notification::new(
            ctx.admin_recipient,
            format!("Process Ready for Approval: {}", process.name),
            format!(
                "All steps in process \"{}\" have been completed. Please review and approve.",
                process.name
            ),
        )];
    }

    process.status = ProcessStatus::Completed;
    process.updated_at = ctx.now;
    log::info!("process {} '{}' completed", process.id, process.name);
    Vec::new()
}

/// Approves an active process whose steps are all completed.
///
/// # Errors
///
/// `InvalidState` when the process is not active, does not require
/// approval, was already approved, or still has open steps; `Validation`
/// when the approver is blank.
pub fn approve(
    process: &mut Process,
    approver: &str,
    ctx: EngineContext<'_>,
) -> Result<Vec<Notification>> {
    const ACTION: &str = "approve process";

    if process.status != ProcessStatus::Active {
        return Err(TrackerError::invalid_state(
            ACTION,
            format!("process {} is {}, not active", process.id, process.status),
        ));
    }
    if !process.requires_admin_approval {
        return Err(TrackerError::invalid_state(
            ACTION,
            format!("process {} does not require approval", process.id),
        ));
    }
    if process.is_approved() {
        return Err(TrackerError::invalid_state(
            ACTION,
            format!("process {} is already approved", process.id),
        ));
    }
    if !process.all_steps_completed() {
        return Err(TrackerError::invalid_state(
            ACTION,
            format!(
                "{} of {} steps are completed",
                process.completed_steps(),
                process.steps.len()
            ),
        ));
    }
    let approver = validation::required("approver", approver)?;

    process.status = ProcessStatus::Completed;
    process.approved_at = Some(ctx.now);
    process.updated_at = ctx.now;
    log::info!("process {} '{}' approved by {}", process.id, process.name, approver);

    let notification = Notification::new(
        process.created_by.clone(),
        format!("Process Completed: {}", process.name),
        format!(
            "Process \"{}\" has been completed and approved by {}.",
            process.name, approver
        ),
    );
    process.approved_by = Some(approver);

    Ok(vec![notification])
}

/// Archives an active or completed process. Archival is terminal.
pub fn archive(process: &mut Process, ctx: EngineContext<'_>) -> Result<()> {
    match process.status {
        ProcessStatus::Active | ProcessStatus::Completed => {
            process.status = ProcessStatus::Archived;
            process.updated_at = ctx.now;
            log::info!("process {} '{}' archived", process.id, process.name);
            Ok(())
        }
        ProcessStatus::Draft | ProcessStatus::Archived => Err(TrackerError::invalid_state(
            "archive process",
            format!(
                "process {} is {}; only active or completed processes can be archived",
                process.id, process.status
            ),
        )),
    }
}
