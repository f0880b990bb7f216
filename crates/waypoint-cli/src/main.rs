//! Waypoint CLI Application
//!
//! Command-line interface and MCP server for the Waypoint process tracker.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, WaypointMcpServer};
use renderer::TerminalRenderer;
use waypoint_core::{params::ListProcesses, TrackerBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        actor,
        admin,
        command,
    } = Args::parse();

    let mut builder = TrackerBuilder::new()
        .with_database_path(database_file)
        .with_admin_recipient(admin);
    if let Some(interval) = command.as_ref().and_then(Commands::sweep_interval) {
        builder = builder.with_sweep_interval(interval);
    }
    let tracker = builder
        .build()
        .await
        .context("Failed to initialize tracker")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Waypoint started");

    match command {
        Some(Serve(_)) => {
            info!("Starting Waypoint MCP server");
            run_stdio_server(WaypointMcpServer::new(tracker))
                .await
                .context("MCP server failed")
        }
        Some(Process { command }) => {
            Cli::new(tracker, renderer, actor)
                .handle_process_command(command)
                .await
        }
        Some(Step { command }) => {
            Cli::new(tracker, renderer, actor)
                .handle_step_command(command)
                .await
        }
        Some(Template { command }) => {
            Cli::new(tracker, renderer, actor)
                .handle_template_command(command)
                .await
        }
        Some(Tasks(args)) => Cli::new(tracker, renderer, actor).list_tasks(args).await,
        Some(Dashboard) => Cli::new(tracker, renderer, actor).dashboard().await,
        Some(Sweep) => Cli::new(tracker, renderer, actor).sweep().await,
        Some(Watch(_)) => Cli::new(tracker, renderer, actor).watch().await,
        None => {
            Cli::new(tracker, renderer, actor)
                .list_processes(&ListProcesses {
                    status: Some("active".to_string()),
                    department: None,
                })
                .await
        }
    }
}
