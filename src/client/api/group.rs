//! Group API trait

use async_trait::async_trait;

use crate::client::models::{Group, GroupPermission, NewGroup};
use crate::error::Result;

/// Group management operations for the dbt Cloud API
#[async_trait]
pub trait GroupApi: Send + Sync {
    /// List all live groups of the account.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Get one group with its permissions.
    ///
    /// Soft-deleted groups are reported as `NotFound`.
    async fn get_group(&self, group_id: i64) -> Result<Group>;

    /// Create a group without permissions.
    async fn create_group(&self, request: NewGroup) -> Result<Group>;

    /// Replace the permission list of a group.
    ///
    /// The list is a complete replacement, not incremental.
    async fn replace_group_permissions(
        &self,
        group_id: i64,
        permissions: Vec<GroupPermission>,
    ) -> Result<Vec<GroupPermission>>;

    /// Soft-delete a group.
    async fn delete_group(&self, group_id: i64) -> Result<()>;
}
