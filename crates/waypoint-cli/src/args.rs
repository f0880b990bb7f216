use std::{path::PathBuf, time::Duration};

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::cli::{ProcessCommands, StepCommands, TaskArgs, TemplateCommands};

/// Command-line interface for the Waypoint process tracker
///
/// Waypoint tracks repeatable business processes such as onboarding or
/// procurement as ordered steps with dependencies, deadlines and required
/// evidence. Completing a step opens the steps waiting on it; steps that run
/// past their due date are flagged by a periodic sweep.
#[derive(Parser)]
#[command(version, about, name = "wp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/waypoint/waypoint.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Identity recorded as creator, completer or approver
    #[arg(long, global = true, env = "WAYPOINT_ACTOR")]
    pub actor: Option<String>,

    /// Recipient of administrative notifications
    #[arg(long, global = true, env = "WAYPOINT_ADMIN", default_value = "admin")]
    pub admin: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Waypoint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage processes
    #[command(alias = "p")]
    Process {
        #[command(subcommand)]
        command: ProcessCommands,
    },
    /// Edit and complete steps
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Manage process templates
    #[command(alias = "t")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// List steps of active processes
    Tasks(TaskArgs),
    /// Show process and step counts
    Dashboard,
    /// Flag overdue steps once and exit
    Sweep,
    /// Run the overdue sweep periodically until interrupted
    Watch(SweepArgs),
    /// Start the MCP server (the overdue sweep runs alongside it)
    Serve(SweepArgs),
}

/// Options for commands running the periodic overdue sweep
#[derive(ClapArgs)]
pub struct SweepArgs {
    /// Seconds between two overdue sweeps
    #[arg(long, value_name = "SECONDS", default_value_t = 60)]
    pub sweep_interval: u64,
}

impl SweepArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Commands {
    /// Sweep interval requested on the command line, if the command runs the
    /// periodic sweep.
    pub fn sweep_interval(&self) -> Option<Duration> {
        match self {
            Commands::Watch(args) | Commands::Serve(args) => Some(args.interval()),
            _ => None,
        }
    }
}
