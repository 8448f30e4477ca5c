//! clustergraph - point-in-time topology graphs of a container cluster
//!
//! Reads recorded orchestrator and container runtime metadata, builds the
//! context graph and prints it as DOT or JSON.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigSubcommand, GraphArgs};
use std::path::PathBuf;

/// clustergraph - point-in-time topology graphs of a container cluster
#[derive(Parser, Debug)]
#[command(name = "clustergraph")]
#[command(about = "Builds topology graphs of a container cluster and renders them as DOT or JSON", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Configuration file (defaults to the root config file)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Snapshot of cluster metadata (JSON or YAML)
    #[arg(long, short = 's')]
    snapshot: Option<PathBuf>,

    /// Output format: dot, context_graph or resources
    #[arg(long, short = 'f')]
    format: Option<String>,

    /// Render DOT nodes as filled shapes without labels
    #[arg(long)]
    no_labels: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Config { subcommand }) => {
            return cli::handle_config_command(subcommand, args.config.as_deref());
        }
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        None => {}
    }

    cli::init_logging(args.debug, args.log_file.as_deref())?;
    tracing::debug!("Debug logging enabled");

    let success = cli::run_graph(GraphArgs {
        config: args.config,
        snapshot: args.snapshot,
        format: args.format,
        no_labels: args.no_labels,
    })?;

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
