//! MCP server implementation for Waypoint
//!
//! Exposes the tracker's operations as Model Context Protocol tools over
//! stdio. The overdue sweep runs for as long as the server does.

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};
use waypoint_core::{params as core, Tracker};

pub mod errors;
pub mod handlers;

pub use handlers::McpResult;

/// MCP server for Waypoint
#[derive(Clone)]
pub struct WaypointMcpServer {
    tracker: Tracker,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WaypointMcpServer {
    /// Create a new Waypoint MCP server
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.tracker.clone())
    }

    #[tool(
        name = "create_process",
        description = "Create a draft process. Requires name, department and created_by. Steps may be given up front, each with title and assignee (required), optional id (generated as step-N), depends_on (ids of steps whose completion activates it), relative_due_date {step_id, hours} anchored on one of its dependencies, due_date (RFC 3339) and requirements {upload, checkbox, text_confirmation}."
    )]
    async fn create_process(&self, params: Parameters<core::CreateProcess>) -> McpResult {
        self.handlers().create_process(params).await
    }

    #[tool(
        name = "list_processes",
        description = "List process summaries with progress, newest first. Filter by status ('draft', 'active', 'completed', 'archived') and department; archived processes are hidden unless requested."
    )]
    async fn list_processes(&self, params: Parameters<core::ListProcesses>) -> McpResult {
        self.handlers().list_processes(params).await
    }

    #[tool(
        name = "show_process",
        description = "Show a process with every step: status, assignee, dependencies, due dates, required evidence and completion details."
    )]
    async fn show_process(&self, params: Parameters<core::Id>) -> McpResult {
        self.handlers().show_process(params).await
    }

    #[tool(
        name = "update_process",
        description = "Edit a draft process. Omitted fields are unchanged; 'steps' replaces the whole step list. Fails once the process is active."
    )]
    async fn update_process(&self, params: Parameters<core::UpdateProcess>) -> McpResult {
        self.handlers().update_process(params).await
    }

    #[tool(
        name = "activate_process",
        description = "Start a draft process. It needs at least one step and a valid dependency graph. Steps without dependencies can then be completed directly."
    )]
    async fn activate_process(&self, params: Parameters<core::Id>) -> McpResult {
        self.handlers().activate_process(params).await
    }

    #[tool(
        name = "approve_process",
        description = "Approve an active process that requires approval once all of its steps are completed. The process becomes completed and its creator is notified."
    )]
    async fn approve_process(&self, params: Parameters<core::ApproveProcess>) -> McpResult {
        self.handlers().approve_process(params).await
    }

    #[tool(
        name = "archive_process",
        description = "Archive an active or completed process. Archived processes accept no further changes and are hidden from default listings."
    )]
    async fn archive_process(&self, params: Parameters<core::Id>) -> McpResult {
        self.handlers().archive_process(params).await
    }

    #[tool(
        name = "add_step",
        description = "Add a step to a draft process at an optional 0-based position (appended by default). Same step fields as in create_process."
    )]
    async fn add_step(&self, params: Parameters<core::AddStep>) -> McpResult {
        self.handlers().add_step(params).await
    }

    #[tool(
        name = "remove_step",
        description = "Remove a step from a draft process. Refused while other steps depend on it."
    )]
    async fn remove_step(&self, params: Parameters<core::RemoveStep>) -> McpResult {
        self.handlers().remove_step(params).await
    }

    #[tool(
        name = "swap_steps",
        description = "Swap the display order of two steps in a draft process. Dependencies are unaffected."
    )]
    async fn swap_steps(&self, params: Parameters<core::SwapSteps>) -> McpResult {
        self.handlers().swap_steps(params).await
    }

    #[tool(
        name = "complete_step",
        description = "Complete a step of an active process as 'actor'. Evidence items are tagged by kind: {\"kind\": \"upload_proof\", \"attachments\": [...]}, {\"kind\": \"checkbox_confirmation\", \"confirmed\": true}, {\"kind\": \"text_confirmation\", \"notes\": \"...\"}. Pending steps depending on it become in-progress and relative due dates start counting."
    )]
    async fn complete_step(&self, params: Parameters<core::CompleteStep>) -> McpResult {
        self.handlers().complete_step(params).await
    }

    #[tool(
        name = "save_as_template",
        description = "Save a process as a reusable template. Step progress, completion details and derived due dates are dropped."
    )]
    async fn save_as_template(&self, params: Parameters<core::Id>) -> McpResult {
        self.handlers().save_as_template(params).await
    }

    #[tool(name = "list_templates", description = "List saved process templates.")]
    async fn list_templates(&self) -> McpResult {
        self.handlers().list_templates().await
    }

    #[tool(name = "show_template", description = "Show a template with its steps.")]
    async fn show_template(&self, params: Parameters<core::Id>) -> McpResult {
        self.handlers().show_template(params).await
    }

    #[tool(
        name = "create_from_template",
        description = "Create a draft process from a template. Without a name the template name minus its ' Template' suffix is used."
    )]
    async fn create_from_template(
        &self,
        params: Parameters<core::CreateFromTemplate>,
    ) -> McpResult {
        self.handlers().create_from_template(params).await
    }

    #[tool(
        name = "list_tasks",
        description = "List the steps of all active processes. Filter by step status ('pending', 'in-progress', 'completed', 'overdue') and a case-insensitive search over step titles, descriptions and process names."
    )]
    async fn list_tasks(&self, params: Parameters<core::ListTasks>) -> McpResult {
        self.handlers().list_tasks(params).await
    }

    #[tool(
        name = "dashboard",
        description = "Count active and completed processes, templates and overdue steps."
    )]
    async fn dashboard(&self) -> McpResult {
        self.handlers().dashboard().await
    }

    #[tool(
        name = "check_overdue_steps",
        description = "Flag in-progress steps of active processes whose due date has passed and notify the admin. Also runs periodically while the server is up."
    )]
    async fn check_overdue_steps(&self) -> McpResult {
        self.handlers().check_overdue_steps().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WaypointMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "waypoint".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(r#"Waypoint tracks repeatable business processes (onboarding, procurement, audits) as ordered steps.

## Core Concepts
- **Processes** move through draft → active → completed → archived. Only drafts can be edited.
- **Steps** have an assignee, optional dependencies, due dates and required evidence. Status: pending, in-progress, completed, overdue.
- Completing a step moves every pending step that depends on it to in-progress; a relative due date starts counting at that moment.
- A process completes when all steps are done, or on `approve_process` when it requires approval.

## Typical Workflow
1. `create_process` with its steps (or `create_from_template`)
2. `activate_process`
3. `complete_step` as work gets done, supplying required evidence
4. `approve_process` if approval is required
5. `archive_process` when finished

## Tool Categories
- **Processes**: create_process, list_processes, show_process, update_process, activate_process, approve_process, archive_process
- **Steps**: add_step, remove_step, swap_steps, complete_step
- **Templates**: save_as_template, list_templates, show_template, create_from_template
- **Overview**: list_tasks, dashboard, check_overdue_steps"#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport until the client disconnects or
/// the process receives SIGINT/SIGTERM.
pub async fn run_stdio_server(server: WaypointMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Waypoint MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let sweep = server.tracker.start_overdue_sweep();

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    sweep.stop().await;
    info!("MCP server shutdown complete");
    Ok(())
}
