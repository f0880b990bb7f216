//! Step operations for the Tracker.

use super::Tracker;
use crate::{
    engine::{self, editing},
    error::{Result, TrackerError},
    models::{Process, Step},
    params::{AddStep, CompleteStep, RemoveStep, SwapSteps},
};

impl Tracker {
    /// Adds a step to a draft process and returns the stored step.
    pub async fn add_step(&self, params: &AddStep) -> Result<Step> {
        let params = params.clone();
        let process_id = params.process_id;

        let (process, step_id) = self
            .write(move |db, ctx| {
                db.update_process(process_id, |process| {
                    let step_id = editing::add_step(process, params, ctx.now)?;
                    Ok(((process.clone(), step_id), Vec::new()))
                })
            })
            .await?;

        process
            .step(&step_id)
            .cloned()
            .ok_or(TrackerError::StepNotFound {
                process_id,
                step_id,
            })
    }

    /// Removes a step from a draft process.
    pub async fn remove_step(&self, params: &RemoveStep) -> Result<Process> {
        let step_id = params.step_id.clone();
        self.mutate(params.process_id, move |process, ctx| {
            editing::remove_step(process, &step_id, ctx.now)?;
            Ok(Vec::new())
        })
        .await
    }

    /// Swaps the display order of two steps of a draft process.
    pub async fn swap_steps(&self, params: &SwapSteps) -> Result<Process> {
        let first = params.step1_id.clone();
        let second = params.step2_id.clone();
        self.mutate(params.process_id, move |process, ctx| {
            editing::swap_steps(process, &first, &second, ctx.now)?;
            Ok(Vec::new())
        })
        .await
    }

    /// Completes a step of an active process, activating its dependents and
    /// settling the process when every step is done.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use waypoint_core::{models::Evidence, params::CompleteStep, TrackerBuilder};
    /// # async {
    /// let tracker = TrackerBuilder::new().build().await?;
    /// let process = tracker
    ///     .complete_step(&CompleteStep {
    ///         process_id: 1,
    ///         step_id: "background-check".to_string(),
    ///         actor: "sam".to_string(),
    ///         evidence: vec![Evidence::CheckboxConfirmation { confirmed: true }],
    ///     })
    ///     .await?;
    /// println!("{}% done", process.progress());
    /// # Result::<(), waypoint_core::TrackerError>::Ok(())
    /// # };
    /// ```
    pub async fn complete_step(&self, params: &CompleteStep) -> Result<Process> {
        let CompleteStep {
            process_id,
            step_id,
            actor,
            evidence,
        } = params.clone();

        self.mutate(process_id, move |process, ctx| {
            engine::complete_step(process, &step_id, &actor, &evidence, ctx)
        })
        .await
    }
}
