//! Command-line argument wrappers and their handlers.
//!
//! Each subcommand has a clap wrapper that converts into the matching core
//! parameter type, so the core crate stays free of clap:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Tracker → Display → Renderer
//! ```

use std::{fs, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use jiff::Timestamp;
use waypoint_core::{
    display::{CreateResult, OperationStatus},
    models::{Evidence, StepRequirements},
    params::*,
    Tracker,
};

use crate::renderer::TerminalRenderer;

// ============================================================================
// Process commands
// ============================================================================

/// Create a new draft process
#[derive(Args)]
pub struct CreateProcessArgs {
    /// Name of the process
    pub name: String,
    /// Owning department
    #[arg(long)]
    pub department: String,
    /// Optional description of the process
    #[arg(short, long)]
    pub description: Option<String>,
    /// Require an explicit approval once every step is completed
    #[arg(long)]
    pub requires_approval: bool,
    /// JSON file holding the step definitions (an array of steps)
    #[arg(long, value_name = "FILE")]
    pub steps: Option<PathBuf>,
}

/// List processes
#[derive(Args)]
pub struct ListProcessesArgs {
    /// Only processes in this status (draft, active, completed, archived)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Only processes of this department
    #[arg(long)]
    pub department: Option<String>,
}

impl From<ListProcessesArgs> for ListProcesses {
    fn from(val: ListProcessesArgs) -> Self {
        ListProcesses {
            status: val.status,
            department: val.department,
        }
    }
}

/// Edit a draft process
#[derive(Args)]
pub struct UpdateProcessArgs {
    /// ID of the draft process
    pub id: u64,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New department
    #[arg(long)]
    pub department: Option<String>,
    /// Whether completion requires approval
    #[arg(long, value_name = "BOOL")]
    pub requires_approval: Option<bool>,
    /// JSON file replacing the whole step list
    #[arg(long, value_name = "FILE")]
    pub steps: Option<PathBuf>,
}

/// Identify a process or template by ID
#[derive(Args)]
pub struct IdArgs {
    /// Unique identifier
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum ProcessCommands {
    /// Create a new draft process
    #[command(alias = "c")]
    Create(CreateProcessArgs),
    /// List processes (all but archived by default)
    #[command(aliases = ["l", "ls"])]
    List(ListProcessesArgs),
    /// Show a process with its steps
    #[command(alias = "s")]
    Show(IdArgs),
    /// Edit a draft process
    #[command(alias = "u")]
    Update(UpdateProcessArgs),
    /// Start a draft process
    Activate(IdArgs),
    /// Approve a process whose steps are all completed
    Approve(IdArgs),
    /// Archive an active or completed process
    Archive(IdArgs),
    /// Save a process as a reusable template
    #[command(name = "template")]
    SaveTemplate(IdArgs),
}

// ============================================================================
// Step commands
// ============================================================================

/// Add a step to a draft process
#[derive(Args)]
pub struct AddStepArgs {
    /// ID of the draft process
    pub process_id: u64,
    /// Title of the step
    pub title: String,
    /// Role or person responsible for the step
    #[arg(short, long)]
    pub assignee: String,
    /// Step identifier; generated as step-N when omitted
    #[arg(long)]
    pub id: Option<String>,
    /// Detailed description of the work
    #[arg(short, long)]
    pub description: Option<String>,
    /// Steps whose completion activates this one, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub depends_on: Vec<String>,
    /// Due date relative to a dependency, as STEP:HOURS
    #[arg(long, value_name = "STEP:HOURS", value_parser = parse_due_after)]
    pub due_after: Option<RelativeDueDateDraft>,
    /// Absolute due date (RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
    /// 0-based position; appended when omitted
    #[arg(short, long)]
    pub position: Option<u32>,
    /// Require at least one uploaded attachment on completion
    #[arg(long)]
    pub requires_upload: bool,
    /// Require the completion checkbox
    #[arg(long)]
    pub requires_checkbox: bool,
    /// Require a written confirmation on completion
    #[arg(long)]
    pub requires_text: bool,
}

impl From<AddStepArgs> for AddStep {
    fn from(val: AddStepArgs) -> Self {
        AddStep {
            process_id: val.process_id,
            position: val.position,
            step: StepDraft {
                id: val.id,
                title: val.title,
                description: val.description,
                assignee: val.assignee,
                requirements: StepRequirements {
                    upload: val.requires_upload,
                    checkbox: val.requires_checkbox,
                    text_confirmation: val.requires_text,
                },
                depends_on: val.depends_on,
                relative_due_date: val.due_after,
                due_date: val.due,
            },
        }
    }
}

fn parse_due_after(value: &str) -> std::result::Result<RelativeDueDateDraft, String> {
    let (step_id, hours) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected STEP:HOURS, got '{value}'"))?;
    let hours = hours
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid hours '{hours}': {e}"))?;
    Ok(RelativeDueDateDraft {
        step_id: step_id.trim().to_string(),
        hours,
    })
}

/// Identify a step within a process
#[derive(Args)]
pub struct StepRefArgs {
    /// ID of the process
    pub process_id: u64,
    /// ID of the step
    pub step_id: String,
}

impl From<StepRefArgs> for RemoveStep {
    fn from(val: StepRefArgs) -> Self {
        RemoveStep {
            process_id: val.process_id,
            step_id: val.step_id,
        }
    }
}

/// Swap the display order of two steps in a draft
#[derive(Args)]
pub struct SwapStepsArgs {
    /// ID of the draft process
    pub process_id: u64,
    /// First step
    pub step1_id: String,
    /// Second step
    pub step2_id: String,
}

impl From<SwapStepsArgs> for SwapSteps {
    fn from(val: SwapStepsArgs) -> Self {
        SwapSteps {
            process_id: val.process_id,
            step1_id: val.step1_id,
            step2_id: val.step2_id,
        }
    }
}

/// Complete a step of an active process
#[derive(Args)]
pub struct CompleteStepArgs {
    #[command(flatten)]
    pub step: StepRefArgs,
    /// Uploaded proof (file names or URLs), comma-separated
    #[arg(long, value_delimiter = ',')]
    pub attach: Vec<String>,
    /// Tick the completion checkbox
    #[arg(long)]
    pub confirm: bool,
    /// Written confirmation of how the step was completed
    #[arg(long)]
    pub notes: Option<String>,
}

impl CompleteStepArgs {
    fn into_params(self, actor: String) -> CompleteStep {
        let mut evidence = Vec::new();
        if !self.attach.is_empty() {
            evidence.push(Evidence::UploadProof {
                attachments: self.attach,
            });
        }
        if self.confirm {
            evidence.push(Evidence::CheckboxConfirmation { confirmed: true });
        }
        if let Some(notes) = self.notes {
            evidence.push(Evidence::TextConfirmation { notes });
        }

        CompleteStep {
            process_id: self.step.process_id,
            step_id: self.step.step_id,
            actor,
            evidence,
        }
    }
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Add a step to a draft process
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Remove a step from a draft process
    #[command(aliases = ["rm"])]
    Remove(StepRefArgs),
    /// Swap two steps of a draft process
    #[command(alias = "sw")]
    Swap(SwapStepsArgs),
    /// Complete a step, supplying the evidence it requires
    #[command(alias = "c")]
    Complete(CompleteStepArgs),
}

// ============================================================================
// Template and board commands
// ============================================================================

/// Create a draft process from a template
#[derive(Args)]
pub struct UseTemplateArgs {
    /// ID of the template
    pub template_id: u64,
    /// Name of the new process; the template name without its suffix when
    /// omitted
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List templates
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a template with its steps
    #[command(alias = "s")]
    Show(IdArgs),
    /// Create a draft process from a template
    #[command(alias = "u")]
    Use(UseTemplateArgs),
}

/// List steps of active processes
#[derive(Args)]
pub struct TaskArgs {
    /// Only steps in this status (pending, in-progress, completed, overdue)
    #[arg(short, long)]
    pub status: Option<String>,
    /// Case-insensitive search over step titles, descriptions and process
    /// names
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

impl From<TaskArgs> for ListTasks {
    fn from(val: TaskArgs) -> Self {
        ListTasks {
            status: val.status,
            search: val.search,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs CLI commands against a tracker and renders the results.
pub struct Cli {
    tracker: Tracker,
    renderer: TerminalRenderer,
    actor: Option<String>,
}

impl Cli {
    pub fn new(tracker: Tracker, renderer: TerminalRenderer, actor: Option<String>) -> Self {
        Self {
            tracker,
            renderer,
            actor,
        }
    }

    fn actor(&self) -> Result<String> {
        match self.actor.as_deref().map(str::trim) {
            Some(actor) if !actor.is_empty() => Ok(actor.to_string()),
            _ => bail!("This command needs an identity: pass --actor or set WAYPOINT_ACTOR"),
        }
    }

    pub async fn handle_process_command(&self, command: ProcessCommands) -> Result<()> {
        match command {
            ProcessCommands::Create(args) => {
                let steps = match &args.steps {
                    Some(path) => read_steps(path)?,
                    None => Vec::new(),
                };
                let params = CreateProcess {
                    name: args.name,
                    description: args.description,
                    department: args.department,
                    created_by: self.actor()?,
                    requires_admin_approval: args.requires_approval,
                    steps,
                };
                let process = self
                    .tracker
                    .create_process(&params)
                    .await
                    .context("Failed to create process")?;
                self.renderer.render(&CreateResult::new(process))
            }
            ProcessCommands::List(args) => self.list_processes(&args.into()).await,
            ProcessCommands::Show(args) => {
                let process = self
                    .tracker
                    .get_process(&args.into())
                    .await
                    .context("Failed to get process")?;
                self.renderer.render(&process)
            }
            ProcessCommands::Update(args) => {
                let steps = args.steps.as_deref().map(read_steps).transpose()?;
                let params = UpdateProcess {
                    id: args.id,
                    name: args.name,
                    description: args.description,
                    department: args.department,
                    requires_admin_approval: args.requires_approval,
                    steps,
                };
                let result = self
                    .tracker
                    .update_process(&params)
                    .await
                    .context("Failed to update process")?;
                self.renderer.render(&result)
            }
            ProcessCommands::Activate(args) => {
                let process = self
                    .tracker
                    .activate_process(&args.into())
                    .await
                    .context("Failed to activate process")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Activated process {} '{}'.",
                    process.id, process.name
                )))
            }
            ProcessCommands::Approve(args) => {
                let params = ApproveProcess {
                    id: args.id,
                    approver: self.actor()?,
                };
                let process = self
                    .tracker
                    .approve_process(&params)
                    .await
                    .context("Failed to approve process")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Approved process {} '{}'; it is now {}.",
                    process.id, process.name, process.status
                )))
            }
            ProcessCommands::Archive(args) => {
                let process = self
                    .tracker
                    .archive_process(&args.into())
                    .await
                    .context("Failed to archive process")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Archived process {} '{}'.",
                    process.id, process.name
                )))
            }
            ProcessCommands::SaveTemplate(args) => {
                let template = self
                    .tracker
                    .save_as_template(&args.into())
                    .await
                    .context("Failed to save template")?;
                self.renderer.render(&CreateResult::new(template))
            }
        }
    }

    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Add(args) => {
                let step = self
                    .tracker
                    .add_step(&args.into())
                    .await
                    .context("Failed to add step")?;
                self.renderer.render(&CreateResult::new(step))
            }
            StepCommands::Remove(args) => {
                let params: RemoveStep = args.into();
                self.tracker
                    .remove_step(&params)
                    .await
                    .context("Failed to remove step")?;
                self.renderer.render(&OperationStatus::success(format!(
                    "Removed step '{}' from process {}.",
                    params.step_id, params.process_id
                )))
            }
            StepCommands::Swap(args) => {
                let process = self
                    .tracker
                    .swap_steps(&args.into())
                    .await
                    .context("Failed to swap steps")?;
                self.renderer.render(&process)
            }
            StepCommands::Complete(args) => {
                let params = args.into_params(self.actor()?);
                let process = self
                    .tracker
                    .complete_step(&params)
                    .await
                    .context("Failed to complete step")?;
                let step = process
                    .step(&params.step_id)
                    .ok_or_else(|| anyhow!("Step '{}' missing after completion", params.step_id))?;
                self.renderer.render(&format!(
                    "Completed step '{}' of process {} ({}% done, status: {}).\n\n{step}",
                    step.id,
                    process.id,
                    process.progress(),
                    process.status
                ))
            }
        }
    }

    pub async fn handle_template_command(&self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::List => {
                let templates = self
                    .tracker
                    .list_templates()
                    .await
                    .context("Failed to list templates")?;
                self.renderer.render(&templates)
            }
            TemplateCommands::Show(args) => {
                let template = self
                    .tracker
                    .get_template(&args.into())
                    .await
                    .context("Failed to get template")?;
                self.renderer.render(&template)
            }
            TemplateCommands::Use(args) => {
                let params = CreateFromTemplate {
                    template_id: args.template_id,
                    name: args.name,
                    created_by: self.actor()?,
                };
                let process = self
                    .tracker
                    .create_from_template(&params)
                    .await
                    .context("Failed to create process from template")?;
                self.renderer.render(&CreateResult::new(process))
            }
        }
    }

    pub async fn list_processes(&self, params: &ListProcesses) -> Result<()> {
        let processes = self
            .tracker
            .list_processes(params)
            .await
            .context("Failed to list processes")?;

        let title = match params.status.as_deref() {
            Some(status) => format!("# Processes ({})", status.to_lowercase()),
            None => "# Processes".to_string(),
        };
        self.renderer.render(&format!("{title}\n\n{processes}"))
    }

    pub async fn list_tasks(&self, args: TaskArgs) -> Result<()> {
        let tasks = self
            .tracker
            .list_tasks(&args.into())
            .await
            .context("Failed to list tasks")?;
        self.renderer.render(&format!("# Tasks\n\n{tasks}"))
    }

    pub async fn dashboard(&self) -> Result<()> {
        let stats = self
            .tracker
            .dashboard()
            .await
            .context("Failed to compute dashboard")?;
        self.renderer.render(&stats)
    }

    pub async fn sweep(&self) -> Result<()> {
        let flagged = self
            .tracker
            .check_overdue_steps()
            .await
            .context("Overdue sweep failed")?;
        self.renderer.render(&OperationStatus::overdue_sweep(flagged))
    }

    /// Runs the periodic overdue sweep until Ctrl-C.
    pub async fn watch(&self) -> Result<()> {
        let sweep = self.tracker.start_overdue_sweep();
        self.renderer.render(&format!(
            "Watching for overdue steps every {}s at {} (Ctrl-C to stop)\n",
            self.tracker.sweep_interval().as_secs(),
            Timestamp::now().strftime("%Y-%m-%d %H:%M:%S UTC")
        ))?;

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
        sweep.stop().await;
        Ok(())
    }
}

/// Reads step definitions from a JSON file holding an array of steps.
fn read_steps(path: &std::path::Path) -> Result<Vec<StepDraft>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid step definitions in {}", path.display()))
}
