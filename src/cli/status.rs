//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::client::DEFAULT_HOST_URL;
use crate::config::{Config, ENV_ACCOUNT_ID, ENV_HOST_URL, ENV_TOKEN};
use crate::error::{ConfigError, Error, Result};

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "dbtc Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match Config::load_resolved(opts.config_ref()) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::NotFound)) => {
            println!("{} Configuration not found", "✗".red());
            println!();
            println!("Run {} to create a configuration file,", "dbtc init".cyan());
            println!("or set {} and {}.", ENV_TOKEN, ENV_ACCOUNT_ID);
            println!();
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!("Config file: {}", "(none, using environment)".dimmed());
    }
    println!();

    if config.token.is_some() {
        println!("{} API token configured", "✓".green());
    } else {
        println!("{} API token not configured", "✗".red());
        println!("  → Run 'dbtc init' or set {}", ENV_TOKEN);
    }

    match config.account_id {
        Some(id) => println!("{} Account: {}", "✓".green(), id),
        None => {
            println!("{} Account ID not configured", "✗".red());
            println!("  → Run 'dbtc init' or set {}", ENV_ACCOUNT_ID);
        }
    }

    let host = config.host_url();
    if host == DEFAULT_HOST_URL {
        println!("{} API host: {}", "○".dimmed(), host);
    } else {
        println!("{} Custom API host: {}", "○".dimmed(), host.cyan());
        println!("  → Set in the config file or via {}", ENV_HOST_URL);
    }

    println!();
    Ok(())
}
