//! Process aggregate storage: create, get, list and read-modify-write.

use rusqlite::{params, types::Type, Connection, OptionalExtension, TransactionBehavior};

use super::utils::{
    build_process_step, optional_timestamp_at, timestamp_at, write_steps, StepTable,
    STEP_DEFINITION_COLUMNS, STEP_RUNTIME_COLUMNS,
};
use crate::{
    error::{DatabaseResultExt, Result, TrackerError},
    models::{Process, ProcessFilter, ProcessStatus},
};

const INSERT_PROCESS_SQL: &str = "INSERT INTO processes (name, description, department, created_by, status, requires_admin_approval, approved_by, approved_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_PROCESS_SQL: &str = "UPDATE processes SET name = ?1, description = ?2, department = ?3, created_by = ?4, status = ?5, requires_admin_approval = ?6, approved_by = ?7, approved_at = ?8, updated_at = ?9 WHERE id = ?10";
const PROCESS_COLUMNS: &str = "id, name, description, department, created_by, status, requires_admin_approval, approved_by, approved_at, created_at, updated_at";
const SELECT_PROCESS_IDS_BY_STATUS_SQL: &str =
    "SELECT id FROM processes WHERE status = ?1 ORDER BY id";

impl super::Database {
    /// Helper function to construct a process (without steps) from a row of
    /// [`PROCESS_COLUMNS`].
    fn build_process_from_row(row: &rusqlite::Row) -> rusqlite::Result<Process> {
        let status_str: String = row.get(5)?;
        let status = status_str.parse::<ProcessStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("Invalid process status: {status_str}").into(),
            )
        })?;

        Ok(Process {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            description: row.get(2)?,
            department: row.get(3)?,
            created_by: row.get(4)?,
            status,
            requires_admin_approval: row.get(6)?,
            approved_by: row.get(7)?,
            approved_at: optional_timestamp_at(row, 8)?,
            created_at: timestamp_at(row, 9)?,
            updated_at: timestamp_at(row, 10)?,
            steps: Vec::new(),
        })
    }

    /// Inserts a new process with its steps and returns the assigned id.
    ///
    /// The `id` of the given process is ignored.
    pub fn create_process(&mut self, process: &Process) -> Result<u64> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PROCESS_SQL,
            params![
                process.name,
                process.description,
                process.department,
                process.created_by,
                process.status.as_str(),
                process.requires_admin_approval,
                process.approved_by,
                process.approved_at.map(|t| t.to_string()),
                process.created_at.to_string(),
                process.updated_at.to_string(),
            ],
        )
        .db_context("Failed to insert process")?;

        let id = tx.last_insert_rowid() as u64;
        write_steps(&tx, StepTable::Process, id, &process.steps)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(id)
    }

    /// Retrieves a process and its steps by ID.
    pub fn get_process(&self, id: u64) -> Result<Option<Process>> {
        load_process(&self.connection, id)
    }

    /// Lists processes matching the filter, newest first, with their steps.
    pub fn list_processes(&self, filter: &ProcessFilter) -> Result<Vec<Process>> {
        let mut query = format!("SELECT {PROCESS_COLUMNS} FROM processes");
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match filter.status {
            Some(status) => {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str()));
            }
            None => {
                conditions.push("status != ?");
                params_vec.push(Box::new(ProcessStatus::Archived.as_str()));
            }
        }
        if let Some(ref department) = filter.department {
            conditions.push("department = ? COLLATE NOCASE");
            params_vec.push(Box::new(department.clone()));
        }

        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
        query.push_str(" ORDER BY id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare process listing")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let processes = stmt
            .query_map(&params_refs[..], Self::build_process_from_row)
            .db_context("Failed to query processes")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read process row")?;

        processes
            .into_iter()
            .map(|mut process| {
                process.steps = load_steps(&self.connection, process.id)?;
                Ok(process)
            })
            .collect()
    }

    /// Lists every process regardless of status, with steps.
    pub fn all_processes(&self) -> Result<Vec<Process>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {PROCESS_COLUMNS} FROM processes ORDER BY id DESC"
            ))
            .db_context("Failed to prepare process listing")?;
        let processes = stmt
            .query_map([], Self::build_process_from_row)
            .db_context("Failed to query processes")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read process row")?;

        processes
            .into_iter()
            .map(|mut process| {
                process.steps = load_steps(&self.connection, process.id)?;
                Ok(process)
            })
            .collect()
    }

    /// Loads a process, applies `change` and writes it back, all inside one
    /// `IMMEDIATE` transaction.
    ///
    /// If `change` fails nothing is written and its error is returned.
    ///
    /// # Errors
    ///
    /// `TrackerError::ProcessNotFound` when no process has the given id.
    pub fn update_process<T>(
        &mut self,
        id: u64,
        change: impl FnOnce(&mut Process) -> Result<T>,
    ) -> Result<T> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut process = load_process(&tx, id)?.ok_or(TrackerError::ProcessNotFound { id })?;
        let output = change(&mut process)?;
        store_process(&tx, &process)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(output)
    }

    /// Applies `change` to every process in `status` inside one `IMMEDIATE`
    /// transaction. Processes for which `change` returns `false` are not
    /// written back.
    pub fn update_processes_with_status(
        &mut self,
        status: ProcessStatus,
        mut change: impl FnMut(&mut Process) -> bool,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let ids = {
            let mut stmt = tx
                .prepare(SELECT_PROCESS_IDS_BY_STATUS_SQL)
                .db_context("Failed to prepare process id query")?;
            let ids = stmt
                .query_map(params![status.as_str()], |row| row.get::<_, i64>(0))
                .db_context("Failed to query process ids")?
                .collect::<rusqlite::Result<Vec<_>>>()
                .db_context("Failed to read process id")?;
            ids
        };

        for id in ids {
            if let Some(mut process) = load_process(&tx, id as u64)? {
                if change(&mut process) {
                    store_process(&tx, &process)?;
                }
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(())
    }
}

fn load_process(conn: &Connection, id: u64) -> Result<Option<Process>> {
    let process = conn
        .query_row(
            &format!("SELECT {PROCESS_COLUMNS} FROM processes WHERE id = ?1"),
            params![id as i64],
            super::Database::build_process_from_row,
        )
        .optional()
        .db_context("Failed to query process")?;

    match process {
        Some(mut process) => {
            process.steps = load_steps(conn, process.id)?;
            Ok(Some(process))
        }
        None => Ok(None),
    }
}

fn load_steps(conn: &Connection, process_id: u64) -> Result<Vec<crate::models::Step>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {STEP_DEFINITION_COLUMNS}, {STEP_RUNTIME_COLUMNS} FROM process_steps WHERE process_id = ?1 ORDER BY position"
        ))
        .db_context("Failed to prepare step query")?;

    let steps = stmt
        .query_map(params![process_id as i64], build_process_step)
        .db_context("Failed to query steps")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read step row")?;
    Ok(steps)
}

fn store_process(conn: &Connection, process: &Process) -> Result<()> {
    conn.execute(
        UPDATE_PROCESS_SQL,
        params![
            process.name,
            process.description,
            process.department,
            process.created_by,
            process.status.as_str(),
            process.requires_admin_approval,
            process.approved_by,
            process.approved_at.map(|t| t.to_string()),
            process.updated_at.to_string(),
            process.id as i64,
        ],
    )
    .db_context("Failed to update process")?;

    write_steps(conn, StepTable::Process, process.id, &process.steps)
}
