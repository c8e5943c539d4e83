//! blocktree CLI - Render work item snapshots as a blocking dependency tree.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "blocktree")]
#[command(author, version, about = "Blocking depth and dependency tree for work items")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Config file (defaults to ./blocktree.yml when present)
    #[arg(long, global = true, env = "BLOCKTREE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print items in blocking-tree order
    Tree {
        /// Snapshot file (`-` for stdin)
        file: Option<PathBuf>,

        /// Line width budget; titles are truncated to fit
        #[arg(long, short = 'w')]
        width: Option<usize>,

        /// Hide the depth column
        #[arg(long)]
        no_depth: bool,
    },

    /// Print blocking depth per item
    Depth {
        /// Snapshot file (`-` for stdin)
        file: Option<PathBuf>,
    },

    /// Show one item and its blockers
    Show {
        /// Work item ID
        id: String,

        /// Snapshot file (`-` for stdin)
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let mut config = config::Config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Tree {
            file,
            width,
            no_depth,
        } => {
            if width.is_some() {
                config.display.width = width;
            }
            if no_depth {
                config.display.show_depth = false;
            }
            commands::tree(file.as_deref(), &config, cli.format)
        }
        Commands::Depth { file } => commands::depth(file.as_deref(), &config, cli.format),
        Commands::Show { id, file } => commands::show(&id, file.as_deref(), &config, cli.format),
    }
}
