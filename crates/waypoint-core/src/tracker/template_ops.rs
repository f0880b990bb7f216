//! Template operations for the Tracker.

use jiff::Timestamp;

use super::Tracker;
use crate::{
    display::Templates,
    engine::validation,
    error::{Result, TrackerError},
    models::{Process, Template},
    params::{CreateFromTemplate, Id},
};

impl Tracker {
    /// Saves a snapshot of a process as a reusable template.
    ///
    /// Any process can be saved regardless of its status. The template name
    /// is the process name with ` Template` appended and every step is reset
    /// to pending.
    pub async fn save_as_template(&self, params: &Id) -> Result<Template> {
        let process_id = params.id;

        self.write(move |db, ctx| {
            let process = db
                .get_process(process_id)?
                .ok_or(TrackerError::ProcessNotFound { id: process_id })?;
            let mut template = Template::snapshot(&process, ctx.now);
            template.id = db.create_template(&template)?;
            log::info!(
                "process {} saved as template {} '{}'",
                process_id,
                template.id,
                template.name
            );
            Ok((template, Vec::new()))
        })
        .await
    }

    /// Lists all templates, newest first.
    pub async fn list_templates(&self) -> Result<Templates> {
        let templates = self.read(|db| db.list_templates()).await?;
        Ok(Templates(templates))
    }

    /// Retrieves a template with its blueprint steps.
    pub async fn get_template(&self, params: &Id) -> Result<Template> {
        let id = params.id;
        self.read(move |db| db.get_template(id)?.ok_or(TrackerError::TemplateNotFound { id }))
            .await
    }

    /// Creates a new draft process from a template.
    ///
    /// Without a name the template's name is used with the ` Template`
    /// suffix stripped.
    pub async fn create_from_template(&self, params: &CreateFromTemplate) -> Result<Process> {
        let template = self.get_template(&Id { id: params.template_id }).await?;

        let name = params
            .name
            .as_deref()
            .map(|n| validation::required("name", n))
            .transpose()?;
        let created_by = validation::required("created_by", &params.created_by)?;

        let mut process = template.instantiate(name.as_deref(), &created_by, Timestamp::now());
        validation::validate_steps(&process.steps)?;

        let stored = process.clone();
        process.id = self
            .write(move |db, _ctx| Ok((db.create_process(&stored)?, Vec::new())))
            .await?;

        log::info!(
            "process {} '{}' created from template {}",
            process.id,
            process.name,
            template.id
        );
        Ok(process)
    }
}
