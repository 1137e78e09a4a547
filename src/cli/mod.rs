//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod apply;
pub mod args;
pub mod context;
pub mod destroy;
pub mod init;
pub mod lifecycle;
pub mod manifest;
pub mod refresh;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// dbtc - share dbt Cloud groups, notifications and license maps between owners
#[derive(Parser, Debug)]
#[command(name = "dbtc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json) [default: pretty]
    #[arg(
        long,
        global = true,
        env = "DBTC_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "DBTC_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DBTC_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize dbtc configuration
    Init,

    /// Show configuration status
    Status,

    /// Add or update this manifest's items, keeping everyone else's
    Apply {
        /// YAML manifest to apply
        #[arg(short = 'f', long = "file")]
        file: String,

        /// Ownership record (defaults to the manifest path with `.record.json`)
        #[arg(long)]
        record: Option<String>,

        /// Show the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Drop recorded items that were removed outside dbtc
    Refresh {
        /// Ownership record written by apply
        #[arg(long)]
        record: String,
    },

    /// Remove the recorded items, keeping everyone else's
    Destroy {
        /// Ownership record written by apply
        #[arg(long)]
        record: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Show the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}
