//! Core library for the Waypoint process tracker.
//!
//! Waypoint models repeatable business processes (onboarding, procurement,
//! compliance checks) as ordered steps with dependencies, relative due dates
//! and required completion evidence. Completing a step activates the steps
//! waiting on it; a periodic sweep flags steps that ran past their due date;
//! processes may require an explicit approval before they count as done.
//!
//! # Layers
//!
//! - [`models`]: plain data, with [`std::fmt::Display`] impls living in
//!   [`display`]
//! - [`engine`]: pure state transitions over a loaded [`models::Process`]
//! - [`db`]: SQLite persistence
//! - [`tracker`]: async facade combining the three, dispatching
//!   [`Notification`]s after each committed change
//!
//! # Quick Start
//!
//! ```rust
//! use waypoint_core::{params::CreateProcess, MemoryNotifier, TrackerBuilder};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let notifier = MemoryNotifier::new();
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .with_notifier(Arc::new(notifier.clone()))
//!     .build()
//!     .await?;
//!
//! let process = tracker
//!     .create_process(&CreateProcess {
//!         name: "Vendor Onboarding".to_string(),
//!         department: "Procurement".to_string(),
//!         created_by: "ana".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{process}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod notify;
pub mod params;
pub mod tracker;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, OperationStatus, ProcessSummaries, Tasks, Templates, UpdateResult,
};
pub use error::{ErrorKind, Result, TrackerError};
pub use models::{Process, ProcessStatus, Step, StepStatus, Template};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier};
pub use tracker::{OverdueSweep, Tracker, TrackerBuilder};
