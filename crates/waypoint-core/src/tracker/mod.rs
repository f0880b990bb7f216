//! High-level tracker API for managing processes and templates.
//!
//! [`Tracker`] is the single entry point every interface goes through. It
//! owns the database path, the notification sink and a write lock shared by
//! all of its clones, including the background [`OverdueSweep`].
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │     Tracker     │    │     Engine      │    │    Database     │
//! │ (process_ops,   │───▶│ (pure state     │───▶│   (via db/)     │
//! │  step_ops, ...) │    │  transitions)   │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!   Async facade          Business rules         Data persistence
//! ```
//!
//! Each mutation:
//!
//! 1. takes the write lock,
//! 2. loads the process inside an `IMMEDIATE` transaction on a blocking
//!    thread,
//! 3. runs the engine transition and writes the process back only if it
//!    succeeded,
//! 4. dispatches notifications after the commit.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use waypoint_core::{
//!     params::{CompleteStep, CreateProcess, Id, StepDraft},
//!     TrackerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("/tmp/waypoint.db"))
//!     .build()
//!     .await?;
//!
//! let process = tracker
//!     .create_process(&CreateProcess {
//!         name: "Employee Onboarding".to_string(),
//!         department: "HR".to_string(),
//!         created_by: "ana".to_string(),
//!         steps: vec![StepDraft {
//!             title: "Sign contract".to_string(),
//!             assignee: "HR Manager".to_string(),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! tracker.activate_process(&Id { id: process.id }).await?;
//! tracker
//!     .complete_step(&CompleteStep {
//!         process_id: process.id,
//!         step_id: "step-1".to_string(),
//!         actor: "ana".to_string(),
//!         evidence: vec![],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{sync::Mutex, task};

use crate::{
    db::Database,
    engine::EngineContext,
    error::{Result, TrackerError},
    models::Process,
    notify::{Notification, Notifier},
};

pub mod board_ops;
pub mod builder;
pub mod process_ops;
pub mod step_ops;
pub mod sweep;
pub mod template_ops;


pub use builder::TrackerBuilder;
pub use sweep::OverdueSweep;

/// Main tracker interface for managing processes, steps and templates.
///
/// Cloning is cheap; clones share the write lock and the notifier.
#[derive(Clone)]
pub struct Tracker {
    pub(crate) db_path: PathBuf,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) admin_recipient: Arc<str>,
    pub(crate) sweep_interval: Duration,
    write_lock: Arc<Mutex<()>>,
}

impl Tracker {
    pub(crate) fn new(
        db_path: PathBuf,
        notifier: Arc<dyn Notifier>,
        admin_recipient: Arc<str>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            db_path,
            notifier,
            admin_recipient,
            sweep_interval,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the backing SQLite database.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Interval used by [`Tracker::start_overdue_sweep`].
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Runs a read-only query on a blocking thread.
    pub(crate) async fn read<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            query(&db)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Runs a write under the tracker's write lock on a blocking thread and
    /// dispatches the notifications it produced once it has committed.
    pub(crate) async fn write<T, F>(&self, write: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database, EngineContext<'_>) -> Result<(T, Vec<Notification>)>
            + Send
            + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let db_path = self.db_path.clone();
        let admin = Arc::clone(&self.admin_recipient);

        let (output, notifications) = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            write(&mut db, EngineContext::new(Timestamp::now(), &admin))
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        self.dispatch(&notifications);
        Ok(output)
    }

    /// Applies an engine transition to one stored process and returns the
    /// process as committed.
    pub(crate) async fn mutate<F>(&self, id: u64, transition: F) -> Result<Process>
    where
        F: FnOnce(&mut Process, EngineContext<'_>) -> Result<Vec<Notification>> + Send + 'static,
    {
        self.write(move |db, ctx| {
            db.update_process(id, |process| {
                let notifications = transition(process, ctx)?;
                Ok((process.clone(), notifications))
            })
        })
        .await
    }

    pub(crate) fn dispatch(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.notifier.notify(notification);
        }
    }
}
