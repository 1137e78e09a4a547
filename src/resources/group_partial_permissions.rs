//! Partial permissions of a group looked up by name
//!
//! Several callers may each declare some of the permissions of one group.
//! The group is created by whichever caller reaches it first and is
//! soft-deleted once the last caller's permissions are gone.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::permission::{PermissionGrant, grants_of, stored_of};
use crate::client::GroupApi;
use crate::client::models::{Group, NewGroup};
use crate::error::{ApiError, Result};
use crate::reconcile::{RemoteCollection, SameEntry, optional_set_eq};

/// Identity of the shared group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Exact group name
    pub name: String,

    #[serde(default)]
    pub assign_by_default: bool,

    #[serde(default)]
    pub sso_mapping_groups: Vec<String>,
}

impl fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group `{}`", self.name)
    }
}

/// Two declarations name the same group when name and settings agree; the
/// order of `sso_mapping_groups` does not matter.
impl SameEntry for GroupSpec {
    fn same_entry(&self, other: &Self) -> bool {
        self.name == other.name
            && self.assign_by_default == other.assign_by_default
            && optional_set_eq(
                Some(self.sso_mapping_groups.as_slice()),
                Some(other.sso_mapping_groups.as_slice()),
            )
    }
}

impl GroupSpec {
    /// Whether `group` was created with these settings.
    fn matches_settings(&self, group: &Group) -> bool {
        self.assign_by_default == group.assign_by_default
            && optional_set_eq(
                Some(self.sso_mapping_groups.as_slice()),
                Some(group.sso_mapping_groups.as_slice()),
            )
    }
}

/// Accessor for the permission list of a group found by name.
pub struct GroupPartialPermissions<C> {
    client: Arc<C>,
    account_id: i64,
}

impl<C: GroupApi> GroupPartialPermissions<C> {
    pub fn new(client: Arc<C>, account_id: i64) -> Self {
        Self { client, account_id }
    }

    /// Find the live group named by `key`, with its permissions.
    ///
    /// A same-named group with different settings is a conflict: every caller
    /// sharing the group has to declare it identically.
    async fn find(&self, key: &GroupSpec) -> Result<Group> {
        let mut matching: Vec<Group> = self
            .client
            .list_groups()
            .await?
            .into_iter()
            .filter(|g| g.name == key.name)
            .collect();

        let summary = match matching.len() {
            0 => return Err(ApiError::NotFound(key.to_string()).into()),
            1 => matching.remove(0),
            n => {
                return Err(ApiError::Conflict(format!(
                    "{} groups are named `{}`",
                    n, key.name
                ))
                .into());
            }
        };

        if !key.matches_settings(&summary) {
            return Err(ApiError::Conflict(format!(
                "{} exists with assign_by_default={} and sso_mapping_groups={:?}",
                key, summary.assign_by_default, summary.sso_mapping_groups
            ))
            .into());
        }

        debug!("Resolved {} to group {}", key, summary.id);
        self.client.get_group(summary.id).await
    }
}

#[async_trait]
impl<C: GroupApi> RemoteCollection for GroupPartialPermissions<C> {
    type Key = GroupSpec;
    type Item = PermissionGrant;

    async fn fetch(&self, key: &GroupSpec) -> Result<Vec<PermissionGrant>> {
        let group = self.find(key).await?;
        Ok(grants_of(&group.group_permissions))
    }

    async fn replace(
        &self,
        key: &GroupSpec,
        items: Vec<PermissionGrant>,
    ) -> Result<Vec<PermissionGrant>> {
        let group = self.find(key).await?;
        let stored = self
            .client
            .replace_group_permissions(group.id, stored_of(&items, group.account_id, group.id))
            .await?;
        Ok(grants_of(&stored))
    }

    async fn provision(
        &self,
        key: &GroupSpec,
        items: Vec<PermissionGrant>,
    ) -> Result<Vec<PermissionGrant>> {
        let group = self
            .client
            .create_group(NewGroup {
                account_id: self.account_id,
                name: key.name.clone(),
                assign_by_default: key.assign_by_default,
                sso_mapping_groups: key.sso_mapping_groups.clone(),
            })
            .await?;
        debug!("Created group {} for {}", group.id, key);

        if items.is_empty() {
            return Ok(Vec::new());
        }

        let stored = self
            .client
            .replace_group_permissions(group.id, stored_of(&items, self.account_id, group.id))
            .await?;
        Ok(grants_of(&stored))
    }

    async fn retire(&self, key: &GroupSpec) -> Result<()> {
        let group = self.find(key).await?;
        self.client.delete_group(group.id).await
    }
}
