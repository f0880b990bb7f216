//! Step model definition and related functionality.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::StepStatus;

/// Represents an individual step within a process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Identifier of the step, unique within its process
    pub id: String,

    /// Brief title/summary of the step
    pub title: String,

    /// Detailed description of the work
    #[serde(default)]
    pub description: String,

    /// Role or person responsible for the step (free text)
    pub assignee: String,

    /// Evidence that must accompany completion
    #[serde(default)]
    pub requirements: StepRequirements,

    /// Ids of steps in the same process whose completion activates this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Due date derived from the completion time of a dependency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_due_date: Option<RelativeDueDate>,

    /// Absolute due date, either configured or derived on activation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Completion metadata, present once the step is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<StepCompletion>,
}

/// Largest accepted [`RelativeDueDate::hours`], ten years.
pub const MAX_RELATIVE_DUE_HOURS: u32 = 87_600;

/// Rule deriving a step's due date from the completion of a dependency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RelativeDueDate {
    /// Dependency whose completion starts the clock
    pub step_id: String,
    /// Hours allowed after that completion, in `1..=MAX_RELATIVE_DUE_HOURS`
    pub hours: u32,
}

/// Kinds of evidence a step requires before it can be completed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StepRequirements {
    /// At least one uploaded attachment
    #[serde(default)]
    pub upload: bool,
    /// An explicit confirmation checkbox
    #[serde(default)]
    pub checkbox: bool,
    /// A free-text confirmation describing the work
    #[serde(default)]
    pub text_confirmation: bool,
}

impl StepRequirements {
    /// Returns true when no evidence is required.
    pub fn is_empty(&self) -> bool {
        !(self.upload || self.checkbox || self.text_confirmation)
    }

    /// Human-readable names of the required evidence kinds.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.upload {
            labels.push("upload");
        }
        if self.checkbox {
            labels.push("checkbox");
        }
        if self.text_confirmation {
            labels.push("text confirmation");
        }
        labels
    }
}

/// Metadata stamped onto a step when it is completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepCompletion {
    /// When the step was completed (UTC)
    pub completed_at: Timestamp,
    /// Identity of whoever completed it
    pub completed_by: String,
    /// Uploaded proof, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    /// Free-text confirmation notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether the completion checkbox was ticked
    #[serde(default)]
    pub confirmed: bool,
}

impl Step {
    /// Creates a pending step with no dependencies or requirements.
    pub fn new(id: impl Into<String>, title: impl Into<String>, assignee: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            assignee: assignee.into(),
            requirements: StepRequirements::default(),
            depends_on: Vec::new(),
            relative_due_date: None,
            due_date: None,
            status: StepStatus::Pending,
            completion: None,
        }
    }

    /// Returns true if completing `step_id` may activate this step.
    pub fn depends_on_step(&self, step_id: &str) -> bool {
        self.depends_on.iter().any(|dep| dep == step_id)
    }

    /// Clears all runtime state so the step can serve as a blueprint.
    ///
    /// Due dates derived from a relative rule are runtime state and are
    /// dropped; a configured absolute due date is kept.
    pub fn reset(&mut self) {
        self.status = StepStatus::Pending;
        self.completion = None;
        if self.relative_due_date.is_some() {
            self.due_date = None;
        }
    }
}
