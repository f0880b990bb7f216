//! Process model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ProcessStatus, Step, StepStatus};

/// Represents a running (or draft) process with its ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Process {
    /// Unique identifier for the process
    pub id: u64,

    /// Name of the process
    pub name: String,

    /// Detailed description of the process
    #[serde(default)]
    pub description: String,

    /// Owning department (free text)
    pub department: String,

    /// Identity of the creator
    pub created_by: String,

    /// Lifecycle status
    #[serde(default)]
    pub status: ProcessStatus,

    /// Whether completion requires an explicit approval
    #[serde(default)]
    pub requires_admin_approval: bool,

    /// Identity of the approver, once approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,

    /// When the process was approved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Timestamp>,

    /// Timestamp when the process was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the process was last modified (UTC)
    pub updated_at: Timestamp,

    /// Steps in display order (not dependency order)
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Process {
    /// Looks up a step by id.
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Position of a step in display order.
    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    /// Number of completed steps.
    pub fn completed_steps(&self) -> usize {
        self.count_steps(StepStatus::Completed)
    }

    /// Number of steps in the given status.
    pub fn count_steps(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// Returns true if the process has steps and every one is completed.
    ///
    /// A process without steps is never considered complete.
    pub fn all_steps_completed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }

    /// Completion percentage, rounded half-up to a whole percent.
    ///
    /// Defined as `0` for a process without steps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jiff::Timestamp;
    /// use waypoint_core::models::{Process, ProcessStatus, Step, StepStatus};
    ///
    /// let mut process = Process {
    ///     id: 1,
    ///     name: "Onboarding".to_string(),
    ///     description: String::new(),
    ///     department: "HR".to_string(),
    ///     created_by: "ana".to_string(),
    ///     status: ProcessStatus::Active,
    ///     requires_admin_approval: false,
    ///     approved_by: None,
    ///     approved_at: None,
    ///     created_at: Timestamp::UNIX_EPOCH,
    ///     updated_at: Timestamp::UNIX_EPOCH,
    ///     steps: vec![],
    /// };
    /// assert_eq!(process.progress(), 0);
    ///
    /// process.steps = vec![Step::new("a", "A", "HR"), Step::new("b", "B", "HR"), Step::new("c", "C", "HR")];
    /// process.steps[0].status = StepStatus::Completed;
    /// assert_eq!(process.progress(), 33);
    /// process.steps[1].status = StepStatus::Completed;
    /// assert_eq!(process.progress(), 67);
    /// ```
    pub fn progress(&self) -> u8 {
        let total = self.steps.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_steps();
        ((completed * 200 + total) / (total * 2)) as u8
    }

    /// The step currently needing attention: the first in-progress step, or
    /// failing that the first pending one.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::InProgress)
            .or_else(|| self.steps.iter().find(|s| s.status == StepStatus::Pending))
    }

    /// Returns true once approval has been recorded.
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}
