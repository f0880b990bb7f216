//! Read models derived from processes: summaries, tasks and dashboard stats.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Process, ProcessStatus, Step, StepStatus};

/// Summary information about a process with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSummary {
    /// Process ID
    pub id: u64,
    /// Name of the process
    pub name: String,
    /// Owning department
    pub department: String,
    /// Process status
    pub status: ProcessStatus,
    /// Whether completion requires approval
    pub requires_admin_approval: bool,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of completed steps
    pub completed_steps: u32,
    /// Number of overdue steps
    pub overdue_steps: u32,
    /// Completion percentage
    pub progress: u8,
}

impl From<&Process> for ProcessSummary {
    fn from(process: &Process) -> Self {
        Self {
            id: process.id,
            name: process.name.clone(),
            department: process.department.clone(),
            status: process.status,
            requires_admin_approval: process.requires_admin_approval,
            created_at: process.created_at,
            total_steps: process.steps.len() as u32,
            completed_steps: process.completed_steps() as u32,
            overdue_steps: process.count_steps(StepStatus::Overdue) as u32,
            progress: process.progress(),
        }
    }
}

/// A step of an active process, as listed on the task board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Owning process ID
    pub process_id: u64,
    /// Owning process name
    pub process_name: String,
    /// The step itself
    pub step: Step,
}

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub active_processes: u32,
    pub completed_processes: u32,
    pub templates: u32,
    pub overdue_steps: u32,
}

impl DashboardStats {
    /// Computes the statistics from every process and the template count.
    pub fn compute(processes: &[Process], templates: usize) -> Self {
        let count = |status: ProcessStatus| {
            processes.iter().filter(|p| p.status == status).count() as u32
        };

        Self {
            active_processes: count(ProcessStatus::Active),
            completed_processes: count(ProcessStatus::Completed),
            templates: templates as u32,
            overdue_steps: processes
                .iter()
                .map(|p| p.count_steps(StepStatus::Overdue) as u32)
                .sum(),
        }
    }
}
