//! Init command implementation

use std::time::Duration;

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::{DEFAULT_HOST_URL, DbtCloudClient, GroupApi};
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the API host, account and service token, checks them with one
/// read-only call and saves the result.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to dbtc!".bold().green());
    println!("Let's set up your dbt Cloud configuration.\n");

    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();
    let theme = ColorfulTheme::default();

    let host_url: String = Input::with_theme(&theme)
        .with_prompt("dbt Cloud API URL")
        .default(config.host_url().to_string())
        .interact_text()?;

    let mut account_input = Input::<i64>::with_theme(&theme).with_prompt("Account ID");
    if let Some(id) = config.account_id {
        account_input = account_input.default(id);
    }
    let account_id = account_input.interact_text()?;

    let token: String = Password::with_theme(&theme)
        .with_prompt("Enter your dbt Cloud service token")
        .interact()?;

    println!("\n{}", "Checking access...".cyan());
    let client = DbtCloudClient::new(
        &host_url,
        token.clone(),
        account_id,
        Duration::from_secs(config.preferences.timeout_secs),
    )?;
    let groups = client.list_groups().await?;
    println!(
        "{} Token works, account {} has {} groups",
        "✓".green(),
        account_id,
        groups.len()
    );

    config.token = Some(token);
    config.account_id = Some(account_id);
    config.host_url = (host_url != DEFAULT_HOST_URL).then_some(host_url);
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "dbtc status".cyan());
    println!(
        "  {} - Preview a manifest",
        "dbtc apply -f perms.yaml --dry-run".cyan()
    );

    Ok(())
}
