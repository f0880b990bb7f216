//! Parameter structures for Waypoint operations
//!
//! These are the request types every interface speaks. The CLI builds them
//! from clap arguments; the MCP server deserializes them directly from tool
//! calls:
//!
//! ```text
//! ┌─────────────────┐
//! │   CLI Args      │───┐
//! │  (clap derives) │   │    ┌─────────────────┐
//! └─────────────────┘   ├───▶│  Core Params    │
//! ┌─────────────────┐   │    │ (serde derives) │
//! │   MCP Tools     │───┘    └─────────────────┘
//! │ (JSON arguments)│
//! └─────────────────┘
//! ```
//!
//! JSON schema generation for MCP is only compiled with the `schema` feature.
//!
//! Raw input (status strings, due-date strings, possibly non-positive hours)
//! is kept as the caller supplied it; validation happens in
//! [`crate::engine::validation`] so every interface gets the same errors.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Evidence, StepRequirements};

/// Generic parameters for operations requiring just an ID.
///
/// Used for show_process, activate_process, archive_process, show_template
/// and save_as_template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Relative due-date rule as entered by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RelativeDueDateDraft {
    /// Dependency whose completion starts the clock
    pub step_id: String,
    /// Hours allowed after that completion; must be positive
    pub hours: i64,
}

/// Definition of a step inside a draft process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepDraft {
    /// Step identifier; generated as `step-N` when omitted
    #[serde(default)]
    pub id: Option<String>,
    /// Title of the step (required)
    pub title: String,
    /// Optional detailed description of the work
    #[serde(default)]
    pub description: Option<String>,
    /// Role or person responsible (required)
    pub assignee: String,
    /// Evidence required on completion
    #[serde(default)]
    pub requirements: StepRequirements,
    /// Ids of steps whose completion activates this one
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Due date relative to the completion of one of `depends_on`
    #[serde(default)]
    pub relative_due_date: Option<RelativeDueDateDraft>,
    /// Absolute due date (RFC 3339, e.g. `2025-04-01T09:00:00Z`)
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Parameters for creating a new draft process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateProcess {
    /// Name of the process (required)
    pub name: String,
    /// Optional detailed description
    #[serde(default)]
    pub description: Option<String>,
    /// Owning department (required)
    pub department: String,
    /// Identity of the creator
    #[serde(default)]
    pub created_by: String,
    /// Whether completion requires an explicit approval
    #[serde(default)]
    pub requires_admin_approval: bool,
    /// Steps in display order
    #[serde(default)]
    pub steps: Vec<StepDraft>,
}

/// Parameters for editing a draft process. Omitted fields are unchanged;
/// `steps`, when given, replaces the whole step list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateProcess {
    /// Process ID to update (required)
    pub id: u64,
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New department
    pub department: Option<String>,
    /// New approval requirement
    pub requires_admin_approval: Option<bool>,
    /// Replacement step list
    pub steps: Option<Vec<StepDraft>>,
}

/// Parameters for adding a step to a draft process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddStep {
    /// ID of the draft process
    pub process_id: u64,
    /// Position to insert the step (0-indexed); appended when omitted
    #[serde(default)]
    pub position: Option<u32>,
    /// The step definition
    #[serde(flatten)]
    pub step: StepDraft,
}

/// Parameters for removing a step from a draft process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RemoveStep {
    /// ID of the draft process
    pub process_id: u64,
    /// Step to remove
    pub step_id: String,
}

/// Parameters for swapping the display order of two steps in a draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SwapSteps {
    /// ID of the draft process
    pub process_id: u64,
    /// First step
    pub step1_id: String,
    /// Second step
    pub step2_id: String,
}

/// Parameters for completing a step of an active process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CompleteStep {
    /// ID of the process
    pub process_id: u64,
    /// Step to complete
    pub step_id: String,
    /// Identity completing the step
    #[serde(default)]
    pub actor: String,
    /// Evidence satisfying the step's requirements
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// Parameters for approving a fully completed process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ApproveProcess {
    /// ID of the process
    pub id: u64,
    /// Identity of the approver
    #[serde(default)]
    pub approver: String,
}

/// Parameters for listing processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListProcesses {
    /// Only processes in this status ('draft', 'active', 'completed',
    /// 'archived'); all non-archived processes when omitted
    #[serde(default)]
    pub status: Option<String>,
    /// Only processes of this department
    #[serde(default)]
    pub department: Option<String>,
}

/// Parameters for the task board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTasks {
    /// Only steps in this status ('pending', 'in-progress', 'completed',
    /// 'overdue')
    #[serde(default)]
    pub status: Option<String>,
    /// Case-insensitive text search
    #[serde(default)]
    pub search: Option<String>,
}

/// Parameters for creating a process from a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateFromTemplate {
    /// ID of the template to copy
    pub template_id: u64,
    /// Name of the new process; derived from the template when omitted
    #[serde(default)]
    pub name: Option<String>,
    /// Identity of the creator
    #[serde(default)]
    pub created_by: String,
}
