//! Template storage.

use rusqlite::{params, Connection, OptionalExtension};

use super::utils::{build_step_definition, timestamp_at, write_steps, StepTable, STEP_DEFINITION_COLUMNS};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Step, Template},
};

const INSERT_TEMPLATE_SQL: &str = "INSERT INTO templates (name, description, department, created_by, requires_admin_approval, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const TEMPLATE_COLUMNS: &str =
    "id, name, description, department, created_by, requires_admin_approval, created_at";
const COUNT_TEMPLATES_SQL: &str = "SELECT COUNT(*) FROM templates";

impl super::Database {
    fn build_template_from_row(row: &rusqlite::Row) -> rusqlite::Result<Template> {
        Ok(Template {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            description: row.get(2)?,
            department: row.get(3)?,
            created_by: row.get(4)?,
            requires_admin_approval: row.get(5)?,
            created_at: timestamp_at(row, 6)?,
            steps: Vec::new(),
        })
    }

    /// Stores a template with its blueprint steps and returns the assigned id.
    pub fn create_template(&mut self, template: &Template) -> Result<u64> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_TEMPLATE_SQL,
            params![
                template.name,
                template.description,
                template.department,
                template.created_by,
                template.requires_admin_approval,
                template.created_at.to_string(),
            ],
        )
        .db_context("Failed to insert template")?;

        let id = tx.last_insert_rowid() as u64;
        write_steps(&tx, StepTable::Template, id, &template.steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(id)
    }

    /// Retrieves a template and its steps by ID.
    pub fn get_template(&self, id: u64) -> Result<Option<Template>> {
        let template = self
            .connection
            .query_row(
                &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"),
                params![id as i64],
                Self::build_template_from_row,
            )
            .optional()
            .db_context("Failed to query template")?;

        match template {
            Some(mut template) => {
                template.steps = load_template_steps(&self.connection, template.id)?;
                Ok(Some(template))
            }
            None => Ok(None),
        }
    }

    /// Lists all templates, newest first, with their steps.
    pub fn list_templates(&self) -> Result<Vec<Template>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM templates ORDER BY id DESC"
            ))
            .db_context("Failed to prepare template listing")?;

        let templates = stmt
            .query_map([], Self::build_template_from_row)
            .db_context("Failed to query templates")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read template row")?;

        templates
            .into_iter()
            .map(|mut template| {
                template.steps = load_template_steps(&self.connection, template.id)?;
                Ok(template)
            })
            .collect()
    }

    /// Number of stored templates.
    pub fn count_templates(&self) -> Result<usize> {
        self.connection
            .query_row(COUNT_TEMPLATES_SQL, [], |row| row.get::<_, i64>(0))
            .map(|count| count as usize)
            .db_context("Failed to count templates")
    }
}

fn load_template_steps(conn: &Connection, template_id: u64) -> Result<Vec<Step>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {STEP_DEFINITION_COLUMNS} FROM template_steps WHERE template_id = ?1 ORDER BY position"
        ))
        .db_context("Failed to prepare template step query")?;

    let steps = stmt
        .query_map(params![template_id as i64], build_step_definition)
        .db_context("Failed to query template steps")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read template step row")?;
    Ok(steps)
}
