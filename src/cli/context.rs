//! Command execution context
//!
//! Loads and validates configuration once and builds the API client every
//! lifecycle command shares.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::DbtCloudClient;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::reconcile::Reconciler;
use crate::resources::{
    GroupPartialPermissions, PartialLicenseMap, PartialNotification, ScimGroupPartialPermissions,
};

/// Context for command execution: the API client and output options.
pub struct CommandContext {
    pub client: Arc<DbtCloudClient>,
    pub account_id: i64,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load config (file plus `DBT_CLOUD_*` overrides), validate it and build the client.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or the token or account ID is missing.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_resolved(opts.config_ref())?;
        config.validate()?;

        let token = config.token.clone().ok_or(ConfigError::MissingToken)?;
        let account_id = config.account_id.ok_or(ConfigError::MissingAccountId)?;

        debug!("Using dbt Cloud at {} (account {})", config.host_url(), account_id);
        let client = DbtCloudClient::new(
            config.host_url(),
            token,
            account_id,
            Duration::from_secs(config.preferences.timeout_secs),
        )?;

        Ok(Self {
            client: Arc::new(client),
            account_id,
            format: opts.format_or(config.preferences.format),
        })
    }

    pub fn group_permissions(&self) -> Reconciler<GroupPartialPermissions<DbtCloudClient>> {
        Reconciler::new(GroupPartialPermissions::new(
            self.client.clone(),
            self.account_id,
        ))
    }

    pub fn scim_group_permissions(
        &self,
    ) -> Reconciler<ScimGroupPartialPermissions<DbtCloudClient>> {
        Reconciler::new(ScimGroupPartialPermissions::new(self.client.clone()))
    }

    pub fn notifications(&self) -> Reconciler<PartialNotification<DbtCloudClient>> {
        Reconciler::new(PartialNotification::new(
            self.client.clone(),
            self.account_id,
        ))
    }

    pub fn license_maps(&self) -> Reconciler<PartialLicenseMap<DbtCloudClient>> {
        Reconciler::new(PartialLicenseMap::new(self.client.clone(), self.account_id))
    }
}
