//! Status enumerations for processes and steps.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of process statuses.
///
/// Transitions only move forward along `draft → active → completed →
/// archived`; archival may also be reached directly from `active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    /// Process is being defined and may be freely edited
    #[default]
    Draft,

    /// Process is running: steps activate and go overdue
    Active,

    /// All steps are completed (and approved, when approval is required)
    Completed,

    /// Soft-deleted; no further mutation is permitted
    Archived,
}

impl FromStr for ProcessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProcessStatus::Draft),
            "active" => Ok(ProcessStatus::Active),
            "completed" => Ok(ProcessStatus::Completed),
            "archived" => Ok(ProcessStatus::Archived),
            _ => Err(format!("Invalid process status: {s}")),
        }
    }
}

impl ProcessStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Draft => "draft",
            ProcessStatus::Active => "active",
            ProcessStatus::Completed => "completed",
            ProcessStatus::Archived => "archived",
        }
    }
}

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    /// Waiting for a dependency to complete
    #[default]
    Pending,

    /// Eligible to be worked on
    InProgress,

    /// Done; terminal
    Completed,

    /// In progress past its due date
    Overdue,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "in-progress" | "inprogress" | "in_progress" => Ok(StepStatus::InProgress),
            "completed" | "done" => Ok(StepStatus::Completed),
            "overdue" => Ok(StepStatus::Overdue),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in-progress",
            StepStatus::Completed => "completed",
            StepStatus::Overdue => "overdue",
        }
    }

    /// Whether a step in this status may still be completed.
    pub fn is_open(&self) -> bool {
        !matches!(self, StepStatus::Completed)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::InProgress.with_icon(), "➤ In Progress");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(StepStatus::Overdue.with_icon(), "⚠ Overdue");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::InProgress => "➤ In Progress",
            StepStatus::Pending => "○ Pending",
            StepStatus::Overdue => "⚠ Overdue",
        }
    }
}
