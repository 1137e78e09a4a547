//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct holds the CLI/env layer; the config file is read later in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json), `None` when not given
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.dbtc/config.yaml)
    pub config: Option<String>,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
        }
    }

    /// Output format after falling back to the config file's preference.
    pub fn format_or(&self, preferred: Option<OutputFormat>) -> OutputFormat {
        self.format.or(preferred).unwrap_or_default()
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}
