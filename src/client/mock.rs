//! Mock dbt Cloud API client for testing
//!
//! Holds an in-memory account so reconciliation tests can run several
//! callers against the same shared objects and inspect what was written.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::api::{GroupApi, LicenseMapApi, NotificationApi};
use super::models::{
    Group, GroupPermission, LicenseMap, NewGroup, NewLicenseMap, Notification, STATE_ACTIVE,
    STATE_DELETED,
};
use crate::error::{ApiError, Result};

/// Account ID used by the mock
pub const MOCK_ACCOUNT_ID: i64 = 1;

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockDbtCloudClient::new()
///     .with_groups(vec![group(42, "analysts", vec![])])
///     .await;
///
/// let group = mock.get_group(42).await?;
/// assert_eq!(group.name, "analysts");
/// ```
#[derive(Clone, Default)]
pub struct MockDbtCloudClient {
    groups: Arc<Mutex<Vec<Group>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    license_maps: Arc<Mutex<Vec<LicenseMap>>>,
    next_id: Arc<Mutex<i64>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Error to return from the next write, after it was counted
    write_error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Payloads of every full-collection write
    captured_writes: Arc<Mutex<Vec<CapturedWrite>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_groups: usize,
    pub get_group: usize,
    pub create_group: usize,
    pub replace_group_permissions: usize,
    pub delete_group: usize,
    pub list_notifications: usize,
    pub get_notification: usize,
    pub create_notification: usize,
    pub update_notification: usize,
    pub delete_notification: usize,
    pub list_license_maps: usize,
    pub create_license_map: usize,
    pub update_license_map: usize,
    pub delete_license_map: usize,
}

impl CallCounts {
    /// Number of calls that wrote to the account.
    pub fn writes(&self) -> usize {
        self.create_group
            + self.replace_group_permissions
            + self.delete_group
            + self.create_notification
            + self.update_notification
            + self.delete_notification
            + self.create_license_map
            + self.update_license_map
            + self.delete_license_map
    }
}

/// A captured collection write for test assertions.
#[derive(Debug, Clone)]
pub enum CapturedWrite {
    GroupPermissions(i64, Vec<GroupPermission>),
    Notification(Notification),
    LicenseMap(LicenseMap),
}

impl MockDbtCloudClient {
    /// Create a new mock client with an empty account.
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(Mutex::new(1000)),
            ..Self::default()
        }
    }

    /// Seed groups.
    pub async fn with_groups(self, groups: Vec<Group>) -> Self {
        *self.groups.lock().await = groups;
        self
    }

    /// Seed notifications.
    pub async fn with_notifications(self, notifications: Vec<Notification>) -> Self {
        *self.notifications.lock().await = notifications;
        self
    }

    /// Seed license maps.
    pub async fn with_license_maps(self, maps: Vec<LicenseMap>) -> Self {
        *self.license_maps.lock().await = maps;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Configure an error to return on the next write call.
    /// Reads still succeed; the failed write is counted but changes nothing.
    pub async fn with_write_error(self, error: ApiError) -> Self {
        *self.write_error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured writes for test assertions.
    pub async fn captured_writes(&self) -> Vec<CapturedWrite> {
        self.captured_writes.lock().await.clone()
    }

    /// Snapshot of a group, including soft-deleted ones.
    pub async fn group(&self, group_id: i64) -> Option<Group> {
        self.groups
            .lock()
            .await
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
    }

    /// Snapshot of all groups, including soft-deleted ones.
    pub async fn groups(&self) -> Vec<Group> {
        self.groups.lock().await.clone()
    }

    /// Snapshot of all notifications, including soft-deleted ones.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    /// Snapshot of all license maps.
    pub async fn license_maps(&self) -> Vec<LicenseMap> {
        self.license_maps.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }

    async fn check_write_error(&self) -> Result<()> {
        match self.write_error.lock().await.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    async fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().await;
        *next += 1;
        *next
    }
}

fn not_found(what: &str, id: i64) -> crate::error::Error {
    ApiError::NotFound(format!("{} {}", what, id)).into()
}

// ============================================================================
// GroupApi Implementation
// ============================================================================

#[async_trait]
impl GroupApi for MockDbtCloudClient {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.check_error().await?;
        self.call_count.lock().await.list_groups += 1;

        Ok(self
            .groups
            .lock()
            .await
            .iter()
            .filter(|g| g.state != STATE_DELETED)
            .cloned()
            .collect())
    }

    async fn get_group(&self, group_id: i64) -> Result<Group> {
        self.check_error().await?;
        self.call_count.lock().await.get_group += 1;

        self.groups
            .lock()
            .await
            .iter()
            .find(|g| g.id == group_id && g.state != STATE_DELETED)
            .cloned()
            .ok_or_else(|| not_found("Group", group_id))
    }

    async fn create_group(&self, request: NewGroup) -> Result<Group> {
        self.check_error().await?;
        self.call_count.lock().await.create_group += 1;
        self.check_write_error().await?;

        let group = Group {
            id: self.allocate_id().await,
            account_id: request.account_id,
            name: request.name,
            state: STATE_ACTIVE,
            assign_by_default: request.assign_by_default,
            sso_mapping_groups: request.sso_mapping_groups,
            group_permissions: Vec::new(),
        };
        self.groups.lock().await.push(group.clone());
        Ok(group)
    }

    async fn replace_group_permissions(
        &self,
        group_id: i64,
        permissions: Vec<GroupPermission>,
    ) -> Result<Vec<GroupPermission>> {
        self.check_error().await?;
        self.call_count.lock().await.replace_group_permissions += 1;
        self.check_write_error().await?;
        self.captured_writes
            .lock()
            .await
            .push(CapturedWrite::GroupPermissions(group_id, permissions.clone()));

        let mut stored = Vec::with_capacity(permissions.len());
        for mut permission in permissions {
            if permission.id.is_none() {
                permission.id = Some(self.allocate_id().await);
            }
            stored.push(permission);
        }

        let mut groups = self.groups.lock().await;
        let group = groups
            .iter_mut()
            .find(|g| g.id == group_id && g.state != STATE_DELETED)
            .ok_or_else(|| not_found("Group", group_id))?;
        group.group_permissions = stored.clone();
        Ok(stored)
    }

    async fn delete_group(&self, group_id: i64) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.delete_group += 1;
        self.check_write_error().await?;

        let mut groups = self.groups.lock().await;
        let group = groups
            .iter_mut()
            .find(|g| g.id == group_id && g.state != STATE_DELETED)
            .ok_or_else(|| not_found("Group", group_id))?;
        group.state = STATE_DELETED;
        Ok(())
    }
}

// ============================================================================
// NotificationApi Implementation
// ============================================================================

#[async_trait]
impl NotificationApi for MockDbtCloudClient {
    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        self.check_error().await?;
        self.call_count.lock().await.list_notifications += 1;

        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|n| n.state != STATE_DELETED)
            .cloned()
            .collect())
    }

    async fn get_notification(&self, notification_id: i64) -> Result<Notification> {
        self.check_error().await?;
        self.call_count.lock().await.get_notification += 1;

        self.notifications
            .lock()
            .await
            .iter()
            .find(|n| n.id == Some(notification_id) && n.state != STATE_DELETED)
            .cloned()
            .ok_or_else(|| not_found("Notification", notification_id))
    }

    async fn create_notification(&self, mut notification: Notification) -> Result<Notification> {
        self.check_error().await?;
        self.call_count.lock().await.create_notification += 1;
        self.check_write_error().await?;

        notification.id = Some(self.allocate_id().await);
        self.captured_writes
            .lock()
            .await
            .push(CapturedWrite::Notification(notification.clone()));
        self.notifications.lock().await.push(notification.clone());
        Ok(notification)
    }

    async fn update_notification(
        &self,
        notification_id: i64,
        mut notification: Notification,
    ) -> Result<Notification> {
        self.check_error().await?;
        self.call_count.lock().await.update_notification += 1;
        self.check_write_error().await?;

        notification.id = Some(notification_id);
        self.captured_writes
            .lock()
            .await
            .push(CapturedWrite::Notification(notification.clone()));

        let mut notifications = self.notifications.lock().await;
        let stored = notifications
            .iter_mut()
            .find(|n| n.id == Some(notification_id) && n.state != STATE_DELETED)
            .ok_or_else(|| not_found("Notification", notification_id))?;
        *stored = notification.clone();
        Ok(notification)
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.delete_notification += 1;
        self.check_write_error().await?;

        let mut notifications = self.notifications.lock().await;
        let stored = notifications
            .iter_mut()
            .find(|n| n.id == Some(notification_id) && n.state != STATE_DELETED)
            .ok_or_else(|| not_found("Notification", notification_id))?;
        stored.state = STATE_DELETED;
        Ok(())
    }
}

// ============================================================================
// LicenseMapApi Implementation
// ============================================================================

#[async_trait]
impl LicenseMapApi for MockDbtCloudClient {
    async fn list_license_maps(&self) -> Result<Vec<LicenseMap>> {
        self.check_error().await?;
        self.call_count.lock().await.list_license_maps += 1;

        Ok(self.license_maps.lock().await.clone())
    }

    async fn create_license_map(&self, request: NewLicenseMap) -> Result<LicenseMap> {
        self.check_error().await?;
        self.call_count.lock().await.create_license_map += 1;
        self.check_write_error().await?;

        let map = LicenseMap {
            id: self.allocate_id().await,
            account_id: request.account_id,
            state: STATE_ACTIVE,
            license_type: request.license_type,
            sso_license_mapping_groups: request.sso_license_mapping_groups,
        };
        self.captured_writes
            .lock()
            .await
            .push(CapturedWrite::LicenseMap(map.clone()));
        self.license_maps.lock().await.push(map.clone());
        Ok(map)
    }

    async fn update_license_map(
        &self,
        license_map_id: i64,
        mut license_map: LicenseMap,
    ) -> Result<LicenseMap> {
        self.check_error().await?;
        self.call_count.lock().await.update_license_map += 1;
        self.check_write_error().await?;

        license_map.id = license_map_id;
        self.captured_writes
            .lock()
            .await
            .push(CapturedWrite::LicenseMap(license_map.clone()));

        let mut maps = self.license_maps.lock().await;
        let stored = maps
            .iter_mut()
            .find(|m| m.id == license_map_id)
            .ok_or_else(|| not_found("License map", license_map_id))?;
        *stored = license_map.clone();
        Ok(license_map)
    }

    async fn delete_license_map(&self, license_map_id: i64) -> Result<()> {
        self.check_error().await?;
        self.call_count.lock().await.delete_license_map += 1;
        self.check_write_error().await?;

        let mut maps = self.license_maps.lock().await;
        let before = maps.len();
        maps.retain(|m| m.id != license_map_id);
        if maps.len() == before {
            return Err(not_found("License map", license_map_id));
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Build a live group.
pub fn group(id: i64, name: &str, permissions: Vec<GroupPermission>) -> Group {
    Group {
        id,
        account_id: MOCK_ACCOUNT_ID,
        name: name.to_string(),
        state: STATE_ACTIVE,
        assign_by_default: false,
        sso_mapping_groups: Vec::new(),
        group_permissions: permissions,
    }
}

/// Build a stored permission grant of `group_id`.
pub fn stored_permission(
    id: i64,
    group_id: i64,
    permission_set: &str,
    project_id: Option<i64>,
) -> GroupPermission {
    GroupPermission {
        id: Some(id),
        account_id: MOCK_ACCOUNT_ID,
        group_id,
        permission_set: permission_set.to_string(),
        project_id,
        all_projects: project_id.is_none(),
        state: STATE_ACTIVE,
        writable_environment_categories: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_error_consumed_once() {
        let mock = MockDbtCloudClient::new()
            .with_groups(vec![group(1, "g", vec![])])
            .await
            .with_error(ApiError::ServerError("boom".to_string()))
            .await;

        assert!(mock.get_group(1).await.is_err());
        assert!(mock.get_group(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_deleted_group_hidden() {
        let mock = MockDbtCloudClient::new()
            .with_groups(vec![group(1, "g", vec![])])
            .await;

        mock.delete_group(1).await.unwrap();
        assert!(mock.get_group(1).await.unwrap_err().is_not_found());
        assert!(mock.list_groups().await.unwrap().is_empty());
        assert_eq!(mock.group(1).await.unwrap().state, STATE_DELETED);
    }

    #[tokio::test]
    async fn test_mock_assigns_permission_ids() {
        let mock = MockDbtCloudClient::new()
            .with_groups(vec![group(1, "g", vec![])])
            .await;

        let mut p = stored_permission(0, 1, "admin", None);
        p.id = None;
        let stored = mock.replace_group_permissions(1, vec![p]).await.unwrap();
        assert!(stored[0].id.is_some());
        assert_eq!(mock.call_counts().await.writes(), 1);
    }
}
