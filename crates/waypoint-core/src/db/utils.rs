//! Row conversion helpers shared by the process and template queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, Connection, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{RelativeDueDate, Step, StepCompletion, StepRequirements, StepStatus},
};

/// Columns describing a step definition, shared by both step tables.
pub(super) const STEP_DEFINITION_COLUMNS: &str = "step_key, title, description, assignee, requires_upload, requires_checkbox, requires_text_confirmation, depends_on, due_after_step, due_after_hours, due_date";

/// Runtime columns only present on `process_steps`.
pub(super) const STEP_RUNTIME_COLUMNS: &str =
    "status, completed_at, completed_by, attachments, completion_notes, confirmed";

/// Parses a timestamp column.
pub(super) fn timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parses a nullable timestamp column.
pub(super) fn optional_timestamp_at(row: &Row, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            s.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Parses a JSON string-array column.
fn string_list_at(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Builds a pending step from the [`STEP_DEFINITION_COLUMNS`] starting at
/// column 0.
pub(super) fn build_step_definition(row: &Row) -> rusqlite::Result<Step> {
    let due_after_step: Option<String> = row.get(8)?;
    let due_after_hours: Option<u32> = row.get(9)?;
    let relative_due_date = match (due_after_step, due_after_hours) {
        (Some(step_id), Some(hours)) => Some(RelativeDueDate { step_id, hours }),
        _ => None,
    };

    Ok(Step {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        assignee: row.get(3)?,
        requirements: StepRequirements {
            upload: row.get(4)?,
            checkbox: row.get(5)?,
            text_confirmation: row.get(6)?,
        },
        depends_on: string_list_at(row, 7)?,
        relative_due_date,
        due_date: optional_timestamp_at(row, 10)?,
        status: StepStatus::Pending,
        completion: None,
    })
}

/// Builds a step with runtime state from the definition columns followed by
/// [`STEP_RUNTIME_COLUMNS`].
pub(super) fn build_process_step(row: &Row) -> rusqlite::Result<Step> {
    let mut step = build_step_definition(row)?;

    let status_str: String = row.get(11)?;
    step.status = status_str.parse::<StepStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            11,
            Type::Text,
            format!("Invalid step status: {status_str}").into(),
        )
    })?;

    step.completion = match optional_timestamp_at(row, 12)? {
        Some(completed_at) => Some(StepCompletion {
            completed_at,
            completed_by: row.get::<_, Option<String>>(13)?.unwrap_or_default(),
            attachments: string_list_at(row, 14)?,
            notes: row.get(15)?,
            confirmed: row.get(16)?,
        }),
        None => None,
    };

    Ok(step)
}

/// Which step table a write targets.
#[derive(Clone, Copy)]
pub(super) enum StepTable {
    Process,
    Template,
}

impl StepTable {
    fn delete_sql(self) -> &'static str {
        match self {
            Self::Process => "DELETE FROM process_steps WHERE process_id = ?1",
            Self::Template => "DELETE FROM template_steps WHERE template_id = ?1",
        }
    }

    fn insert_sql(self) -> String {
        match self {
            Self::Process => format!(
                "INSERT INTO process_steps (process_id, position, {STEP_DEFINITION_COLUMNS}, {STEP_RUNTIME_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)"
            ),
            Self::Template => format!(
                "INSERT INTO template_steps (template_id, position, {STEP_DEFINITION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
        }
    }
}

/// Replaces every step row of `owner_id` in `table` with `steps`, keeping
/// their order as positions.
pub(super) fn write_steps(
    conn: &Connection,
    table: StepTable,
    owner_id: u64,
    steps: &[Step],
) -> Result<()> {
    conn.execute(table.delete_sql(), params![owner_id as i64])
        .db_context("Failed to delete steps")?;

    let mut stmt = conn
        .prepare(&table.insert_sql())
        .db_context("Failed to prepare step insert")?;

    for (position, step) in steps.iter().enumerate() {
        let depends_on = serde_json::to_string(&step.depends_on)?;
        let (due_after_step, due_after_hours) = match &step.relative_due_date {
            Some(rule) => (Some(rule.step_id.as_str()), Some(rule.hours)),
            None => (None, None),
        };
        let due_date = step.due_date.map(|t| t.to_string());

        match table {
            StepTable::Process => {
                let completion = step.completion.as_ref();
                let attachments = serde_json::to_string(
                    completion.map(|c| c.attachments.as_slice()).unwrap_or_default(),
                )?;
                stmt.execute(params![
                    owner_id as i64,
                    position as i64,
                    step.id,
                    step.title,
                    step.description,
                    step.assignee,
                    step.requirements.upload,
                    step.requirements.checkbox,
                    step.requirements.text_confirmation,
                    depends_on,
                    due_after_step,
                    due_after_hours,
                    due_date,
                    step.status.as_str(),
                    completion.map(|c| c.completed_at.to_string()),
                    completion.map(|c| c.completed_by.as_str()),
                    attachments,
                    completion.and_then(|c| c.notes.as_deref()),
                    completion.is_some_and(|c| c.confirmed),
                ])
                .db_context("Failed to insert process step")?;
            }
            StepTable::Template => {
                stmt.execute(params![
                    owner_id as i64,
                    position as i64,
                    step.id,
                    step.title,
                    step.description,
                    step.assignee,
                    step.requirements.upload,
                    step.requirements.checkbox,
                    step.requirements.text_confirmation,
                    depends_on,
                    due_after_step,
                    due_after_hours,
                    due_date,
                ])
                .db_context("Failed to insert template step")?;
            }
        }
    }

    Ok(())
}
