//! Overdue detection.

use super::EngineContext;
use crate::{
    models::{Process, ProcessStatus, StepStatus},
    notify::Notification,
};

/// Flags every in-progress step of an active process whose due date lies
/// strictly before `ctx.now`.
///
/// The transition is one-way: an overdue step is never flagged again, so a
/// repeated sweep returns no notifications. Pending steps are not flagged even
/// when they carry a configured due date.
pub fn sweep_overdue(process: &mut Process, ctx: EngineContext<'_>) -> Vec<Notification> {
    if process.status != ProcessStatus::Active {
        return Vec::new();
    }

    let mut notifications = Vec::new();
    for step in &mut process.steps {
        let Some(due) = step.due_date else {
            continue;
        };
        if step.status != StepStatus::InProgress || ctx.now <= due {
            continue;
        }

        step.status = StepStatus::Overdue;
        log::info!("process {}: step '{}' is overdue (due {})", process.id, step.id, due);
        notifications.push(Notification::new(
            ctx.admin_recipient,
            format!("Overdue Step: {}", step.title),
            format!(
                "Step \"{}\" in process \"{}\" is overdue. Due date was {}.",
                step.title, process.name, due
            ),
        ));
    }

    if !notifications.is_empty() {
        process.updated_at = ctx.now;
    }
    notifications
}
