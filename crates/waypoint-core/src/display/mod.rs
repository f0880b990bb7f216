//! Markdown formatting for models, collections and operation results.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and operation outcomes are wrapped in newtypes so every interface (the
//! terminal renderer, MCP tool results) prints the same text.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │ (Process, Step) │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: [`ProcessSummaries`], [`Tasks`], [`Templates`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`]
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`], [`DueLabel`]
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage Examples
//!
//! ```rust
//! use waypoint_core::{
//!     display::{CreateResult, UpdateResult},
//!     models::{Step, StepStatus},
//! };
//!
//! let step = Step::new("sign", "Sign contract", "Legal");
//! let output = CreateResult::new(step.clone()).to_string();
//! assert!(output.contains("Added step 'sign'"));
//!
//! let update = UpdateResult::with_changes(step, vec!["Completed by ana".to_string()]);
//! assert!(update.to_string().contains("- Completed by ana"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{ProcessSummaries, Tasks, Templates};
pub use datetime::{DueLabel, LocalDateTime};
pub use results::{CreateResult, UpdateResult};
pub use status::OperationStatus;
