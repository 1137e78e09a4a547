//! Partial SSO group lists of a license map

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::client::LicenseMapApi;
use crate::client::models::{LicenseMap, NewLicenseMap, STATE_DELETED};
use crate::error::{ApiError, Result};
use crate::reconcile::{RemoteCollection, SameEntry};

/// License type a map assigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    Developer,
    ReadOnly,
    It,
    Analyst,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Developer => "developer",
            LicenseType::ReadOnly => "read_only",
            LicenseType::It => "it",
            LicenseType::Analyst => "analyst",
        }
    }
}

impl SameEntry for LicenseType {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} license map", self.as_str())
    }
}

/// Accessor for the SSO groups mapped to one license type.
pub struct PartialLicenseMap<C> {
    client: Arc<C>,
    account_id: i64,
}

impl<C: LicenseMapApi> PartialLicenseMap<C> {
    pub fn new(client: Arc<C>, account_id: i64) -> Self {
        Self { client, account_id }
    }

    async fn find(&self, license_type: LicenseType) -> Result<LicenseMap> {
        let mut matching: Vec<LicenseMap> = self
            .client
            .list_license_maps()
            .await?
            .into_iter()
            .filter(|m| m.state != STATE_DELETED && m.license_type == license_type.as_str())
            .collect();

        match matching.len() {
            0 => Err(ApiError::NotFound(license_type.to_string()).into()),
            1 => Ok(matching.remove(0)),
            n => Err(ApiError::Conflict(format!("{} maps exist for {}", n, license_type)).into()),
        }
    }
}

#[async_trait]
impl<C: LicenseMapApi> RemoteCollection for PartialLicenseMap<C> {
    type Key = LicenseType;
    type Item = String;

    async fn fetch(&self, key: &LicenseType) -> Result<Vec<String>> {
        Ok(self.find(*key).await?.sso_license_mapping_groups)
    }

    async fn replace(&self, key: &LicenseType, items: Vec<String>) -> Result<Vec<String>> {
        let mut map = self.find(*key).await?;
        map.sso_license_mapping_groups = items;

        let updated = self.client.update_license_map(map.id, map).await?;
        Ok(updated.sso_license_mapping_groups)
    }

    async fn provision(&self, key: &LicenseType, items: Vec<String>) -> Result<Vec<String>> {
        let created = self
            .client
            .create_license_map(NewLicenseMap {
                account_id: self.account_id,
                license_type: key.as_str().to_string(),
                sso_license_mapping_groups: items,
            })
            .await?;
        debug!("Created license map {} for {}", created.id, key);
        Ok(created.sso_license_mapping_groups)
    }

    async fn retire(&self, key: &LicenseType) -> Result<()> {
        let map = self.find(*key).await?;
        self.client.delete_license_map(map.id).await
    }
}
