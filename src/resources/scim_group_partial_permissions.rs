//! Partial permissions of an externally managed group
//!
//! SCIM groups are created and deleted by the identity provider. Callers
//! only ever touch the permission list, so a missing group is an error
//! and removing the last grant leaves the group with an empty list.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::permission::{PermissionGrant, grants_of, stored_of};
use crate::client::GroupApi;
use crate::error::Result;
use crate::reconcile::{RemoteCollection, SameEntry};

/// Id of a group owned by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScimGroup(pub i64);

impl fmt::Display for ScimGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SCIM group {}", self.0)
    }
}

impl SameEntry for ScimGroup {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }
}

pub struct ScimGroupPartialPermissions<C> {
    client: Arc<C>,
}

impl<C: GroupApi> ScimGroupPartialPermissions<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: GroupApi> RemoteCollection for ScimGroupPartialPermissions<C> {
    type Key = ScimGroup;
    type Item = PermissionGrant;

    async fn fetch(&self, key: &ScimGroup) -> Result<Vec<PermissionGrant>> {
        let group = self.client.get_group(key.0).await?;
        Ok(grants_of(&group.group_permissions))
    }

    async fn replace(
        &self,
        key: &ScimGroup,
        items: Vec<PermissionGrant>,
    ) -> Result<Vec<PermissionGrant>> {
        let group = self.client.get_group(key.0).await?;
        let stored = self
            .client
            .replace_group_permissions(group.id, stored_of(&items, group.account_id, group.id))
            .await?;
        Ok(grants_of(&stored))
    }
}
