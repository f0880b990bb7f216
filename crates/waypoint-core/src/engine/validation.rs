//! Input validation and dependency-graph checks.

use std::collections::{HashMap, HashSet};

use jiff::Timestamp;

use crate::{
    error::{Result, TrackerError},
    models::{RelativeDueDate, Step, StepStatus, MAX_RELATIVE_DUE_HOURS},
    params::StepDraft,
};

/// Trims a required text field, rejecting blank values.
pub fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TrackerError::validation(field).with_reason("must not be empty"));
    }
    Ok(value.to_string())
}

/// Checks the process-level fields every process needs.
pub fn validate_definition(name: &str, department: &str) -> Result<()> {
    required("name", name)?;
    required("department", department)?;
    Ok(())
}

/// Returns the lowest `step-N` id not already used by `steps`.
pub fn next_step_id<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    (1..)
        .map(|n| format!("step-{n}"))
        .find(|candidate| !taken.contains(candidate.as_str()))
        .unwrap_or_default()
}

/// Converts a draft into a pending step, validating its own fields.
///
/// Cross-step rules (unique ids, known dependencies, cycles) are checked by
/// [`validate_steps`].
pub fn build_step(draft: StepDraft, field: &str, id: String) -> Result<Step> {
    let title = required(&format!("{field}.title"), &draft.title)?;
    let assignee = required(&format!("{field}.assignee"), &draft.assignee)?;

    let relative_due_date = match draft.relative_due_date {
        Some(rule) => {
            let hours_field = format!("{field}.relative_due_date.hours");
            let hours = match u32::try_from(rule.hours) {
                Ok(hours) if hours_in_range(hours) => hours,
                _ if rule.hours <= 0 => {
                    return Err(TrackerError::validation(hours_field).with_reason(format!(
                        "must be a positive number of hours, got {}",
                        rule.hours
                    )));
                }
                _ => {
                    return Err(TrackerError::validation(hours_field).with_reason(format!(
                        "must be at most {MAX_RELATIVE_DUE_HOURS} hours, got {}",
                        rule.hours
                    )));
                }
            };
            Some(RelativeDueDate {
                step_id: required(&format!("{field}.relative_due_date.step_id"), &rule.step_id)?,
                hours,
            })
        }
        None => None,
    };

    let due_date = draft
        .due_date
        .as_deref()
        .map(|raw| {
            raw.trim().parse::<Timestamp>().map_err(|e| {
                TrackerError::validation(format!("{field}.due_date"))
                    .with_reason(format!("'{raw}' is not an RFC 3339 timestamp: {e}"))
            })
        })
        .transpose()?;

    Ok(Step {
        id,
        title,
        description: draft.description.unwrap_or_default().trim().to_string(),
        assignee,
        requirements: draft.requirements,
        depends_on: draft
            .depends_on
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect(),
        relative_due_date,
        due_date,
        status: StepStatus::Pending,
        completion: None,
    })
}

/// Converts a list of drafts into steps, generating missing ids, and
/// validates the result as a whole.
pub fn build_steps(drafts: Vec<StepDraft>) -> Result<Vec<Step>> {
    let mut taken: Vec<String> = drafts
        .iter()
        .filter_map(|d| d.id.as_deref().map(str::trim))
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    let mut steps = Vec::with_capacity(drafts.len());
    for (index, mut draft) in drafts.into_iter().enumerate() {
        let id = match draft.id.take().map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => {
                let id = next_step_id(taken.iter().map(String::as_str));
                taken.push(id.clone());
                id
            }
        };
        steps.push(build_step(draft, &format!("steps[{index}]"), id)?);
    }

    validate_steps(&steps)?;
    Ok(steps)
}

fn hours_in_range(hours: u32) -> bool {
    (1..=MAX_RELATIVE_DUE_HOURS).contains(&hours)
}

/// Validates the cross-step invariants of a step list:
///
/// - step ids are unique
/// - every dependency names another step of the same list
/// - a relative due date is anchored on one of the step's dependencies
/// - the dependency graph has no cycles
pub fn validate_steps(steps: &[Step]) -> Result<()> {
    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.id.as_str()) {
            return Err(TrackerError::validation("steps")
                .with_reason(format!("duplicate step id '{}'", step.id)));
        }
    }

    for step in steps {
        for dep in &step.depends_on {
            if dep == &step.id {
                return Err(TrackerError::validation(format!("steps.{}.depends_on", step.id))
                    .with_reason("a step cannot depend on itself"));
            }
            if !seen.contains(dep.as_str()) {
                return Err(TrackerError::validation(format!("steps.{}.depends_on", step.id))
                    .with_reason(format!("unknown step '{dep}'")));
            }
        }

        if let Some(rule) = &step.relative_due_date {
            if !hours_in_range(rule.hours) {
                return Err(
                    TrackerError::validation(format!("steps.{}.relative_due_date.hours", step.id))
                        .with_reason(format!(
                            "must be between 1 and {MAX_RELATIVE_DUE_HOURS}, got {}",
                            rule.hours
                        )),
                );
            }
            if !step.depends_on_step(&rule.step_id) {
                return Err(
                    TrackerError::validation(format!("steps.{}.relative_due_date", step.id))
                        .with_reason(format!(
                            "'{}' must be one of the step's dependencies",
                            rule.step_id
                        )),
                );
            }
        }
    }

    if let Some(cycle) = find_cycle(steps) {
        return Err(TrackerError::validation("steps")
            .with_reason(format!("dependency cycle: {}", cycle.join(" -> "))));
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search for a dependency cycle. Returns the ids along the
/// cycle, first id repeated at the end.
fn find_cycle(steps: &[Step]) -> Option<Vec<String>> {
    let edges: HashMap<&str, &[String]> = steps
        .iter()
        .map(|s| (s.id.as_str(), s.depends_on.as_slice()))
        .collect();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut path: Vec<&str> = Vec::new();

    fn visit<'a>(
        id: &'a str,
        edges: &HashMap<&'a str, &'a [String]>,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match marks.get(id) {
            Some(Mark::Done) => return None,
            Some(Mark::Visiting) => {
                let start = path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(id.to_string());
                return Some(cycle);
            }
            None => {}
        }

        marks.insert(id, Mark::Visiting);
        path.push(id);
        for dep in edges.get(id).copied().unwrap_or_default() {
            if let Some(cycle) = visit(dep.as_str(), edges, marks, path) {
                return Some(cycle);
            }
        }
        path.pop();
        marks.insert(id, Mark::Done);
        None
    }

    steps
        .iter()
        .find_map(|s| visit(s.id.as_str(), &edges, &mut marks, &mut path))
}
