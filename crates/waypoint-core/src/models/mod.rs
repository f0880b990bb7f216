//! Data models for processes, steps and templates.
//!
//! This module contains the core domain models of the Waypoint process
//! tracker. Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.
//!
//! # Model Overview
//!
//! - [`Process`]: an instance of a workflow with ordered [`Step`]s and a
//!   [`ProcessStatus`] lifecycle (`draft → active → completed → archived`)
//! - [`Step`]: a unit of work with an assignee, dependencies, an optional
//!   relative due date, required evidence and a [`StepStatus`]
//! - [`Template`]: a reusable blueprint snapshotted from a process
//! - [`Evidence`]: tagged completion payload validated against a step's
//!   [`StepRequirements`]
//! - [`ProcessSummary`], [`TaskEntry`], [`DashboardStats`]: read models for
//!   list views
//!
//! # Examples
//!
//! ```rust
//! use waypoint_core::models::{Step, StepStatus};
//!
//! let mut step = Step::new("paperwork", "Complete paperwork", "HR Manager");
//! step.depends_on.push("offer".to_string());
//! assert!(step.depends_on_step("offer"));
//! assert_eq!(step.status, StepStatus::Pending);
//! println!("{}", step); // Shows ○ Pending status icon
//! ```

pub mod completion;
pub mod filters;
pub mod process;
pub mod status;
pub mod step;
pub mod summary;
pub mod template;


pub use completion::{CompletionEvidence, Evidence};
pub use filters::{ProcessFilter, TaskFilter};
pub use process::Process;
pub use status::{ProcessStatus, StepStatus};
pub use step::{RelativeDueDate, Step, StepCompletion, StepRequirements, MAX_RELATIVE_DUE_HOURS};
pub use summary::{DashboardStats, ProcessSummary, TaskEntry};
pub use template::{Template, TEMPLATE_SUFFIX};
