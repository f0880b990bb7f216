//! Database operations and SQLite management for processes and templates.
//!
//! Processes are stored as aggregates: a `processes` row plus its
//! `process_steps` rows. Reads load the whole aggregate; writes replace it
//! inside one transaction, so a process is never observed half-written.
//!
//! Mutations of existing processes go through [`Database::update_process`],
//! which runs a read-modify-write in an `IMMEDIATE` transaction and only
//! writes back when the closure succeeds.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod process_queries;
pub mod template_queries;
pub mod utils;


/// How long a connection waits on a lock held by another connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
