//! dbtc - partial ownership of shared dbt Cloud collections

use clap::Parser;
use log::LevelFilter;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod reconcile;
mod resources;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_module("dbtc", LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Apply {
            file,
            record,
            dry_run,
        } => cli::apply::run(&opts, &file, record.as_deref(), dry_run).await,
        Commands::Refresh { record } => cli::refresh::run(&opts, &record).await,
        Commands::Destroy {
            record,
            yes,
            dry_run,
        } => cli::destroy::run(&opts, &record, yes, dry_run).await,
    }
}
