//! Template model: a reusable process blueprint.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Process, ProcessStatus, Step};

/// Suffix appended to a process name when it is saved as a template.
pub const TEMPLATE_SUFFIX: &str = " Template";

/// A process blueprint. Always behaves as a draft and never executes; every
/// step is pending and carries no completion metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    /// Unique identifier for the template
    pub id: u64,

    /// Name of the template
    pub name: String,

    /// Description copied to processes created from it
    #[serde(default)]
    pub description: String,

    /// Owning department
    pub department: String,

    /// Identity of whoever saved the template
    pub created_by: String,

    /// Whether processes created from it require approval
    #[serde(default)]
    pub requires_admin_approval: bool,

    /// Timestamp when the template was created (UTC)
    pub created_at: Timestamp,

    /// Blueprint steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Template {
    /// Snapshots a process into an unsaved template (id `0`), scrubbing all
    /// step runtime state.
    pub fn snapshot(process: &Process, now: Timestamp) -> Self {
        let steps = process
            .steps
            .iter()
            .cloned()
            .map(|mut step| {
                step.reset();
                step
            })
            .collect();

        Self {
            id: 0,
            name: format!("{}{TEMPLATE_SUFFIX}", process.name),
            description: process.description.clone(),
            department: process.department.clone(),
            created_by: process.created_by.clone(),
            requires_admin_approval: process.requires_admin_approval,
            created_at: now,
            steps,
        }
    }

    /// Deep-copies the template into an unsaved draft process (id `0`).
    ///
    /// Without an explicit name the template suffix is stripped from the
    /// template's own name.
    pub fn instantiate(&self, name: Option<&str>, created_by: &str, now: Timestamp) -> Process {
        let name = name.map(String::from).unwrap_or_else(|| {
            self.name
                .strip_suffix(TEMPLATE_SUFFIX)
                .unwrap_or(&self.name)
                .to_string()
        });

        Process {
            id: 0,
            name,
            description: self.description.clone(),
            department: self.department.clone(),
            created_by: created_by.to_string(),
            status: ProcessStatus::Draft,
            requires_admin_approval: self.requires_admin_approval,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
            steps: self.steps.clone(),
        }
    }
}
