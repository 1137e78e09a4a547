//! Configuration management for dbtc

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::client::{DEFAULT_HOST_URL, DEFAULT_TIMEOUT};
use crate::error::{ConfigError, Error, Result};

/// Environment variable holding the API token
pub const ENV_TOKEN: &str = "DBT_CLOUD_TOKEN";
/// Environment variable holding the account ID
pub const ENV_ACCOUNT_ID: &str = "DBT_CLOUD_ACCOUNT_ID";
/// Environment variable holding the API host URL
pub const ENV_HOST_URL: &str = "DBT_CLOUD_HOST_URL";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// dbt Cloud service token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// dbt Cloud account ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,

    /// API base URL, e.g. `https://emea.dbt.com/api` for a regional instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_url: Option<String>,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Output format used when neither `--format` nor `DBTC_FORMAT` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".dbtc").join("config.yaml"))
    }

    /// Resolve the config path from an explicit override or the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional path
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load the file (if any) and apply `DBT_CLOUD_*` overrides from the process environment.
    ///
    /// A missing file is fine as long as the environment supplies a token.
    pub fn load_resolved(path: Option<&str>) -> Result<Self> {
        Self::resolve_with(path, |name| std::env::var(name).ok())
    }

    fn resolve_with<F>(path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::load_at(path) {
            Ok(config) => config,
            Err(Error::Config(ConfigError::NotFound)) if lookup(ENV_TOKEN).is_some() => {
                Config::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Override file values with environment values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_TOKEN).filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }

        if let Some(raw) = lookup(ENV_ACCOUNT_ID).filter(|v| !v.is_empty()) {
            let account_id = raw.trim().parse::<i64>().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a number, got `{}`", ENV_ACCOUNT_ID, raw))
            })?;
            self.account_id = Some(account_id);
        }

        if let Some(host) = lookup(ENV_HOST_URL).filter(|h| !h.is_empty()) {
            self.host_url = Some(host);
        }

        Ok(())
    }

    /// Save configuration to an optional path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// API base URL in effect
    pub fn host_url(&self) -> &str {
        self.host_url.as_deref().unwrap_or(DEFAULT_HOST_URL)
    }

    /// Validate that required configuration is present
    pub fn validate(&self) -> Result<()> {
        if self.token.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingToken.into());
        }
        if self.account_id.is_none() {
            return Err(ConfigError::MissingAccountId.into());
        }
        Ok(())
    }
}
