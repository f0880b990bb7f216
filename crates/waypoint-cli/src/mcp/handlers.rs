//! MCP tool handlers implementation

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use waypoint_core::{
    display::{CreateResult, OperationStatus},
    params as core,
    Tracker,
};

use super::errors::to_mcp_error;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text(content: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(
        content.to_string(),
    )]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    tracker: Tracker,
}

impl McpHandlers {
    pub fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    pub async fn create_process(
        &self,
        Parameters(params): Parameters<core::CreateProcess>,
    ) -> McpResult {
        debug!("create_process: {:?}", params);

        let process = self
            .tracker
            .create_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to create process", &e))?;
        text(CreateResult::new(process))
    }

    pub async fn list_processes(
        &self,
        Parameters(params): Parameters<core::ListProcesses>,
    ) -> McpResult {
        debug!("list_processes: {:?}", params);

        let processes = self
            .tracker
            .list_processes(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list processes", &e))?;

        let title = match params.status.as_deref() {
            Some(status) => format!("Processes ({})", status.to_lowercase()),
            None => "Processes".to_string(),
        };
        text(format!("# {title}\n\n{processes}"))
    }

    pub async fn show_process(&self, Parameters(params): Parameters<core::Id>) -> McpResult {
        debug!("show_process: {:?}", params);

        let process = self
            .tracker
            .get_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get process", &e))?;
        text(process)
    }

    pub async fn update_process(
        &self,
        Parameters(params): Parameters<core::UpdateProcess>,
    ) -> McpResult {
        debug!("update_process: {:?}", params);

        let result = self
            .tracker
            .update_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to update process", &e))?;
        text(result)
    }

    pub async fn activate_process(&self, Parameters(params): Parameters<core::Id>) -> McpResult {
        debug!("activate_process: {:?}", params);

        let process = self
            .tracker
            .activate_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to activate process", &e))?;
        text(OperationStatus::success(format!(
            "Activated process {} '{}'. Complete steps with 'complete_step'.",
            process.id, process.name
        )))
    }

    pub async fn approve_process(
        &self,
        Parameters(params): Parameters<core::ApproveProcess>,
    ) -> McpResult {
        debug!("approve_process: {:?}", params);

        let process = self
            .tracker
            .approve_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to approve process", &e))?;
        text(OperationStatus::success(format!(
            "Approved process {} '{}'; it is now {}.",
            process.id, process.name, process.status
        )))
    }

    pub async fn archive_process(&self, Parameters(params): Parameters<core::Id>) -> McpResult {
        debug!("archive_process: {:?}", params);

        let process = self
            .tracker
            .archive_process(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to archive process", &e))?;
        text(OperationStatus::success(format!(
            "Archived process {} '{}'.",
            process.id, process.name
        )))
    }

    pub async fn add_step(&self, Parameters(params): Parameters<core::AddStep>) -> McpResult {
        debug!("add_step: {:?}", params);

        let step = self
            .tracker
            .add_step(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to add step", &e))?;
        text(CreateResult::new(step))
    }

    pub async fn remove_step(&self, Parameters(params): Parameters<core::RemoveStep>) -> McpResult {
        debug!("remove_step: {:?}", params);

        let process = self
            .tracker
            .remove_step(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to remove step", &e))?;
        text(OperationStatus::success(format!(
            "Removed step '{}' from process {}; {} step(s) remain.",
            params.step_id,
            process.id,
            process.steps.len()
        )))
    }

    pub async fn swap_steps(&self, Parameters(params): Parameters<core::SwapSteps>) -> McpResult {
        debug!("swap_steps: {:?}", params);

        let process = self
            .tracker
            .swap_steps(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to swap steps", &e))?;
        text(process)
    }

    pub async fn complete_step(
        &self,
        Parameters(params): Parameters<core::CompleteStep>,
    ) -> McpResult {
        debug!("complete_step: {:?}", params);

        let process = self
            .tracker
            .complete_step(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to complete step", &e))?;
        text(format!(
            "Completed step '{}' ({}% done, process status: {}).\n\n{process}",
            params.step_id,
            process.progress(),
            process.status
        ))
    }

    pub async fn save_as_template(&self, Parameters(params): Parameters<core::Id>) -> McpResult {
        debug!("save_as_template: {:?}", params);

        let template = self
            .tracker
            .save_as_template(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to save template", &e))?;
        text(CreateResult::new(template))
    }

    pub async fn list_templates(&self) -> McpResult {
        debug!("list_templates");

        let templates = self
            .tracker
            .list_templates()
            .await
            .map_err(|e| to_mcp_error("Failed to list templates", &e))?;
        text(format!("# Templates\n\n{templates}"))
    }

    pub async fn show_template(&self, Parameters(params): Parameters<core::Id>) -> McpResult {
        debug!("show_template: {:?}", params);

        let template = self
            .tracker
            .get_template(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to get template", &e))?;
        text(template)
    }

    pub async fn create_from_template(
        &self,
        Parameters(params): Parameters<core::CreateFromTemplate>,
    ) -> McpResult {
        debug!("create_from_template: {:?}", params);

        let process = self
            .tracker
            .create_from_template(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to create process from template", &e))?;
        text(CreateResult::new(process))
    }

    pub async fn list_tasks(&self, Parameters(params): Parameters<core::ListTasks>) -> McpResult {
        debug!("list_tasks: {:?}", params);

        let tasks = self
            .tracker
            .list_tasks(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to list tasks", &e))?;
        text(format!("# Tasks\n\n{tasks}"))
    }

    pub async fn dashboard(&self) -> McpResult {
        let stats = self
            .tracker
            .dashboard()
            .await
            .map_err(|e| to_mcp_error("Failed to compute dashboard", &e))?;
        text(stats)
    }

    pub async fn check_overdue_steps(&self) -> McpResult {
        let flagged = self
            .tracker
            .check_overdue_steps()
            .await
            .map_err(|e| to_mcp_error("Overdue sweep failed", &e))?;
        text(OperationStatus::overdue_sweep(flagged))
    }
}
