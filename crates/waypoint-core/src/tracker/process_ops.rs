//! Process operations for the Tracker.

use jiff::Timestamp;

use super::Tracker;
use crate::{
    display::{ProcessSummaries, UpdateResult},
    engine::{self, editing},
    error::{Result, TrackerError},
    models::{Process, ProcessFilter, ProcessSummary},
    params::{ApproveProcess, CreateProcess, Id, ListProcesses, UpdateProcess},
};

impl Tracker {
    /// Creates a new draft process.
    ///
    /// Missing step ids are generated as `step-N`. The step list is
    /// validated as a whole, so a draft never holds an invalid dependency
    /// graph.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use waypoint_core::{params::CreateProcess, TrackerBuilder};
    /// # async {
    /// let tracker = TrackerBuilder::new().build().await?;
    /// let process = tracker
    ///     .create_process(&CreateProcess {
    ///         name: "Quarterly Audit".to_string(),
    ///         department: "Finance".to_string(),
    ///         created_by: "lee".to_string(),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// # Result::<(), waypoint_core::TrackerError>::Ok(())
    /// # };
    /// ```
    pub async fn create_process(&self, params: &CreateProcess) -> Result<Process> {
        let mut process = editing::new_process(params.clone(), Timestamp::now())?;

        let stored = process.clone();
        let id = self
            .write(move |db, _ctx| Ok((db.create_process(&stored)?, Vec::new())))
            .await?;

        process.id = id;
        log::info!("process {} '{}' created", id, process.name);
        Ok(process)
    }

    /// Retrieves a process with all its steps.
    ///
    /// # Errors
    ///
    /// `TrackerError::ProcessNotFound` if no process has the given id.
    pub async fn get_process(&self, params: &Id) -> Result<Process> {
        let id = params.id;
        self.read(move |db| db.get_process(id)?.ok_or(TrackerError::ProcessNotFound { id }))
            .await
    }

    /// Lists process summaries, newest first.
    ///
    /// Without a status filter every non-archived process is listed.
    pub async fn list_processes(&self, params: &ListProcesses) -> Result<ProcessSummaries> {
        let filter = ProcessFilter::try_from(params)?;
        let processes = self.read(move |db| db.list_processes(&filter)).await?;
        Ok(ProcessSummaries(
            processes.iter().map(ProcessSummary::from).collect(),
        ))
    }

    /// Edits a draft process. Omitted fields keep their values; the result
    /// lists the fields that were changed.
    pub async fn update_process(&self, params: &UpdateProcess) -> Result<UpdateResult<Process>> {
        let params = params.clone();
        let process_id = params.id;

        self.write(move |db, ctx| {
            db.update_process(process_id, |process| {
                let changed = editing::update_process(process, params, ctx.now)?;
                log::debug!("process {} updated fields {:?}", process.id, changed);
                let changes = changed.into_iter().map(String::from).collect();
                Ok((UpdateResult::with_changes(process.clone(), changes), Vec::new()))
            })
        })
        .await
    }

    /// Moves a draft process to active.
    pub async fn activate_process(&self, params: &Id) -> Result<Process> {
        self.mutate(params.id, |process, ctx| {
            engine::activate(process, ctx)?;
            Ok(Vec::new())
        })
        .await
    }

    /// Approves an active process whose steps are all completed.
    pub async fn approve_process(&self, params: &ApproveProcess) -> Result<Process> {
        let approver = params.approver.clone();
        self.mutate(params.id, move |process, ctx| {
            engine::approve(process, &approver, ctx)
        })
        .await
    }

    /// Archives an active or completed process.
    pub async fn archive_process(&self, params: &Id) -> Result<Process> {
        self.mutate(params.id, |process, ctx| {
            engine::archive(process, ctx)?;
            Ok(Vec::new())
        })
        .await
    }
}
