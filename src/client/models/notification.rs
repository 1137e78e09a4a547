//! Job notification models

use serde::{Deserialize, Serialize};

use super::active_state;

/// Delivery channel of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum NotificationType {
    /// Email to the dbt Cloud user
    Internal,
    /// Message to a Slack channel
    Slack,
    /// Email to an external address
    External,
}

impl TryFrom<i64> for NotificationType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NotificationType::Internal),
            2 => Ok(NotificationType::Slack),
            4 => Ok(NotificationType::External),
            other => Err(format!("unknown notification type {}", other)),
        }
    }
}

impl From<NotificationType> for i64 {
    fn from(value: NotificationType) -> Self {
        match value {
            NotificationType::Internal => 1,
            NotificationType::Slack => 2,
            NotificationType::External => 4,
        }
    }
}

/// Job notification with its four subscription lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub account_id: i64,

    /// User the notification belongs to
    pub user_id: i64,

    #[serde(default)]
    pub on_cancel: Vec<i64>,

    #[serde(default)]
    pub on_failure: Vec<i64>,

    #[serde(default)]
    pub on_warning: Vec<i64>,

    #[serde(default)]
    pub on_success: Vec<i64>,

    #[serde(default = "active_state")]
    pub state: i64,

    pub notification_type: NotificationType,

    #[serde(default)]
    pub slack_channel_id: Option<String>,

    #[serde(default)]
    pub slack_channel_name: Option<String>,

    #[serde(default)]
    pub external_email: Option<String>,
}
