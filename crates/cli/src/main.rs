//! Pairwise CLI - Main Entry Point
//!
//! Loads comparison page fixtures, replays clicks and the page-load restore,
//! checks submissions and audits the rendered widget.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{audit, check, render, scenarios};
use config::CliConfig;

/// Pairwise - comparison widget selection controller
#[derive(Parser)]
#[command(name = "pairwise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file
    #[arg(long, env = "PAIRWISE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(long, global = true)]
    format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay clicks on a fixture and print the resulting state
    Render(render::RenderArgs),

    /// Print the state restored from a prior outcome
    Restore(render::RestoreArgs),

    /// Check whether the form would submit
    Check(check::CheckArgs),

    /// Audit ARIA markup of the widget
    Audit(audit::AuditArgs),

    /// Run YAML scenarios
    Scenarios(scenarios::ScenarioArgs),

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(pairwise_common::default_config_path);
    let config = CliConfig::load(&config_path)?;
    let format = cli.format.unwrap_or(config.format);

    match cli.command {
        Commands::Render(args) => render::execute(args, format)?,
        Commands::Restore(args) => render::execute_restore(args, format)?,
        Commands::Check(args) => check::execute(args, format)?,
        Commands::Audit(args) => {
            if audit::execute(args, format)? > 0 {
                std::process::exit(1);
            }
        }
        Commands::Scenarios(args) => {
            if scenarios::execute(args, &config.scenarios, format)? > 0 {
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("Pairwise CLI v{}", pairwise_common::VERSION);
        }
    }

    Ok(())
}
