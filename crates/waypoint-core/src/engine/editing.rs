//! Construction and editing of draft processes.
//!
//! Edits work on a copy of the step list which replaces the original only
//! once it validates, so a rejected edit leaves the draft unchanged.

use jiff::Timestamp;

use super::{lifecycle::ensure_draft, validation};
use crate::{
    error::{Result, TrackerError},
    models::{Process, ProcessStatus},
    params::{AddStep, CreateProcess, UpdateProcess},
};

/// Builds an unsaved draft process (id `0`) from creation parameters.
pub fn new_process(params: CreateProcess, now: Timestamp) -> Result<Process> {
    let name = validation::required("name", &params.name)?;
    let department = validation::required("department", &params.department)?;
    let created_by = validation::required("created_by", &params.created_by)?;
    let steps = validation::build_steps(params.steps)?;

    Ok(Process {
        id: 0,
        name,
        description: params.description.unwrap_or_default().trim().to_string(),
        department,
        created_by,
        status: ProcessStatus::Draft,
        requires_admin_approval: params.requires_admin_approval,
        approved_by: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
        steps,
    })
}

/// Applies an update to a draft. Returns the names of the changed fields.
pub fn update_process(
    process: &mut Process,
    params: UpdateProcess,
    now: Timestamp,
) -> Result<Vec<&'static str>> {
    ensure_draft(process, "update process")?;

    let name = params
        .name
        .map(|n| validation::required("name", &n))
        .transpose()?;
    let department = params
        .department
        .map(|d| validation::required("department", &d))
        .transpose()?;
    let steps = params.steps.map(validation::build_steps).transpose()?;

    let mut changed = Vec::new();
    if let Some(name) = name {
        process.name = name;
        changed.push("name");
    }
    if let Some(description) = params.description {
        process.description = description.trim().to_string();
        changed.push("description");
    }
    if let Some(department) = department {
        process.department = department;
        changed.push("department");
    }
    if let Some(required) = params.requires_admin_approval {
        process.requires_admin_approval = required;
        changed.push("requires_admin_approval");
    }
    if let Some(steps) = steps {
        process.steps = steps;
        changed.push("steps");
    }

    if !changed.is_empty() {
        process.updated_at = now;
    }
    Ok(changed)
}

/// Inserts a step into a draft. Returns the id the step was stored under.
pub fn add_step(process: &mut Process, params: AddStep, now: Timestamp) -> Result<String> {
    ensure_draft(process, "add step")?;

    let id = match params.step.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => validation::next_step_id(process.steps.iter().map(|s| s.id.as_str())),
    };
    let step = validation::build_step(params.step, "step", id.clone())?;

    let position = match params.position {
        Some(p) => {
            let p = p as usize;
            if p > process.steps.len() {
                return Err(TrackerError::validation("position").with_reason(format!(
                    "{p} is past the end of the step list ({} steps)",
                    process.steps.len()
                )));
            }
            p
        }
        None => process.steps.len(),
    };

    let mut steps = process.steps.clone();
    steps.insert(position, step);
    validation::validate_steps(&steps)?;

    process.steps = steps;
    process.updated_at = now;
    Ok(id)
}

/// Removes a step from a draft.
///
/// Fails when another step still depends on it.
pub fn remove_step(process: &mut Process, step_id: &str, now: Timestamp) -> Result<()> {
    ensure_draft(process, "remove step")?;

    let index = process
        .step_index(step_id)
        .ok_or_else(|| TrackerError::StepNotFound {
            process_id: process.id,
            step_id: step_id.to_string(),
        })?;

    if let Some(dependent) = process.steps.iter().find(|s| s.depends_on_step(step_id)) {
        return Err(TrackerError::invalid_state(
            format!("remove step '{step_id}'"),
            format!("step '{}' depends on it", dependent.id),
        ));
    }

    process.steps.remove(index);
    process.updated_at = now;
    Ok(())
}

/// Swaps the display position of two steps in a draft.
pub fn swap_steps(process: &mut Process, first: &str, second: &str, now: Timestamp) -> Result<()> {
    ensure_draft(process, "swap steps")?;

    let lookup = |step_id: &str| {
        process
            .step_index(step_id)
            .ok_or_else(|| TrackerError::StepNotFound {
                process_id: process.id,
                step_id: step_id.to_string(),
            })
    };
    let a = lookup(first)?;
    let b = lookup(second)?;

    process.steps.swap(a, b);
    process.updated_at = now;
    Ok(())
}
