//! Read models spanning every process: task board and dashboard.

use super::Tracker;
use crate::{
    display::Tasks,
    error::Result,
    models::{DashboardStats, ProcessFilter, ProcessStatus, TaskEntry, TaskFilter},
    params::ListTasks,
};

impl Tracker {
    /// Lists the steps of every active process, in process order (newest
    /// process first) and step order within a process.
    pub async fn list_tasks(&self, params: &ListTasks) -> Result<Tasks> {
        let filter = TaskFilter::try_from(params)?;
        let active = ProcessFilter {
            status: Some(ProcessStatus::Active),
            department: None,
        };
        let processes = self.read(move |db| db.list_processes(&active)).await?;

        let tasks = processes
            .into_iter()
            .flat_map(|process| {
                let process_id = process.id;
                let process_name = process.name;
                process.steps.into_iter().map(move |step| TaskEntry {
                    process_id,
                    process_name: process_name.clone(),
                    step,
                })
            })
            .filter(|task| filter.matches(task))
            .collect();

        Ok(Tasks(tasks))
    }

    /// Computes dashboard statistics.
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        self.read(|db| {
            let processes = db.all_processes()?;
            let templates = db.count_templates()?;
            Ok(DashboardStats::compute(&processes, templates))
        })
        .await
    }
}
