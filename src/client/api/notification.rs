//! Notification API trait

use async_trait::async_trait;

use crate::client::models::Notification;
use crate::error::Result;

/// Job notification operations for the dbt Cloud API
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// List all live notifications of the account.
    async fn list_notifications(&self) -> Result<Vec<Notification>>;

    /// Get one notification. Soft-deleted ones are reported as `NotFound`.
    async fn get_notification(&self, notification_id: i64) -> Result<Notification>;

    /// Create a notification.
    async fn create_notification(&self, notification: Notification) -> Result<Notification>;

    /// Overwrite a notification, including all four job lists.
    async fn update_notification(
        &self,
        notification_id: i64,
        notification: Notification,
    ) -> Result<Notification>;

    /// Soft-delete a notification.
    async fn delete_notification(&self, notification_id: i64) -> Result<()>;
}
