//! Filter types for querying processes and tasks.

use super::{Process, ProcessStatus, StepStatus, TaskEntry};
use crate::error::{Result, TrackerError};

/// Filter options for querying processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    /// Only processes in this status; `None` lists every non-archived process
    pub status: Option<ProcessStatus>,

    /// Filter by department (case-insensitive exact match)
    pub department: Option<String>,
}

impl ProcessFilter {
    /// Returns true if the process passes the filter.
    pub fn matches(&self, process: &Process) -> bool {
        let status_ok = match self.status {
            Some(status) => process.status == status,
            None => process.status != ProcessStatus::Archived,
        };
        let department_ok = self
            .department
            .as_ref()
            .is_none_or(|d| process.department.eq_ignore_ascii_case(d));
        status_ok && department_ok
    }
}

impl TryFrom<&crate::params::ListProcesses> for ProcessFilter {
    type Error = TrackerError;

    /// Convert ListProcesses parameters to a ProcessFilter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waypoint_core::{models::{ProcessFilter, ProcessStatus}, params::ListProcesses};
    ///
    /// let params = ListProcesses { status: Some("completed".to_string()), department: None };
    /// let filter = ProcessFilter::try_from(&params)?;
    /// assert_eq!(filter.status, Some(ProcessStatus::Completed));
    ///
    /// let bad = ListProcesses { status: Some("finished".to_string()), department: None };
    /// assert!(ProcessFilter::try_from(&bad).is_err());
    /// # Ok::<(), waypoint_core::TrackerError>(())
    /// ```
    fn try_from(params: &crate::params::ListProcesses) -> Result<Self> {
        let status = params
            .status
            .as_deref()
            .map(str::parse::<ProcessStatus>)
            .transpose()
            .map_err(|reason| TrackerError::validation("status").with_reason(reason))?;

        Ok(Self {
            status,
            department: params.department.clone(),
        })
    }
}

/// Filter options for the task board.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only steps in this status
    pub status: Option<StepStatus>,

    /// Case-insensitive search over step title, step description and process
    /// name
    pub search: Option<String>,
}

impl TaskFilter {
    /// Returns true if the task passes the filter.
    pub fn matches(&self, task: &TaskEntry) -> bool {
        if self.status.is_some_and(|s| s != task.step.status) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                task.step.title.to_lowercase().contains(&query)
                    || task.step.description.to_lowercase().contains(&query)
                    || task.process_name.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }
}

impl TryFrom<&crate::params::ListTasks> for TaskFilter {
    type Error = TrackerError;

    fn try_from(params: &crate::params::ListTasks) -> Result<Self> {
        let status = params
            .status
            .as_deref()
            .map(str::parse::<StepStatus>)
            .transpose()
            .map_err(|reason| TrackerError::validation("status").with_reason(reason))?;

        Ok(Self {
            status,
            search: params.search.clone(),
        })
    }
}
