//! Partial job subscriptions of a notification
//!
//! A notification carries four job id lists, one per run outcome. They are
//! treated as a single collection of `(event, job_id)` pairs so that
//! several callers can subscribe the same target to different jobs.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::client::NotificationApi;
use crate::client::models::{Notification, NotificationType, STATE_ACTIVE};
use crate::error::{ApiError, ManifestError, Result};
use crate::reconcile::{RemoteCollection, SameEntry};

/// Run outcome a subscription fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobEvent {
    OnSuccess,
    OnFailure,
    OnCancel,
    OnWarning,
}

impl JobEvent {
    pub const ALL: [JobEvent; 4] = [
        JobEvent::OnSuccess,
        JobEvent::OnFailure,
        JobEvent::OnCancel,
        JobEvent::OnWarning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobEvent::OnSuccess => "on_success",
            JobEvent::OnFailure => "on_failure",
            JobEvent::OnCancel => "on_cancel",
            JobEvent::OnWarning => "on_warning",
        }
    }

    fn list(self, notification: &Notification) -> &[i64] {
        match self {
            JobEvent::OnSuccess => &notification.on_success,
            JobEvent::OnFailure => &notification.on_failure,
            JobEvent::OnCancel => &notification.on_cancel,
            JobEvent::OnWarning => &notification.on_warning,
        }
    }

    fn list_mut(self, notification: &mut Notification) -> &mut Vec<i64> {
        match self {
            JobEvent::OnSuccess => &mut notification.on_success,
            JobEvent::OnFailure => &mut notification.on_failure,
            JobEvent::OnCancel => &mut notification.on_cancel,
            JobEvent::OnWarning => &mut notification.on_warning,
        }
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job a target is notified about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubscription {
    pub event: JobEvent,
    pub job_id: i64,
}

impl JobSubscription {
    pub fn new(event: JobEvent, job_id: i64) -> Self {
        Self { event, job_id }
    }
}

impl SameEntry for JobSubscription {
    fn same_entry(&self, other: &Self) -> bool {
        self.event == other.event && self.job_id == other.job_id
    }
}

/// Flatten the four job lists of a notification.
pub fn subscriptions_of(notification: &Notification) -> Vec<JobSubscription> {
    JobEvent::ALL
        .iter()
        .flat_map(|&event| {
            event
                .list(notification)
                .iter()
                .map(move |&job_id| JobSubscription::new(event, job_id))
        })
        .collect()
}

/// Overwrite the four job lists of `notification` with `subscriptions`.
pub fn set_subscriptions(notification: &mut Notification, subscriptions: &[JobSubscription]) {
    for event in JobEvent::ALL {
        event.list_mut(notification).clear();
    }
    for subscription in subscriptions {
        subscription
            .event
            .list_mut(notification)
            .push(subscription.job_id);
    }
}

/// Delivery channel as written in manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Internal,
    Slack,
    External,
}

impl From<Channel> for NotificationType {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Internal => NotificationType::Internal,
            Channel::Slack => NotificationType::Slack,
            Channel::External => NotificationType::External,
        }
    }
}

/// Delivery target identifying the shared notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub user_id: i64,

    #[serde(rename = "notification_type")]
    pub channel: Channel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_id: Option<String>,

    /// Only used when the notification is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_email: Option<String>,
}

impl fmt::Display for NotificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channel {
            Channel::Internal => write!(f, "email notification of user {}", self.user_id),
            Channel::Slack => write!(
                f,
                "slack notification of user {} to {}",
                self.user_id,
                self.slack_channel_id.as_deref().unwrap_or("?")
            ),
            Channel::External => write!(
                f,
                "external notification of user {} to {}",
                self.user_id,
                self.external_email.as_deref().unwrap_or("?")
            ),
        }
    }
}

impl SameEntry for NotificationTarget {
    fn same_entry(&self, other: &Self) -> bool {
        self.user_id == other.user_id
            && self.channel == other.channel
            && self.slack_channel_id == other.slack_channel_id
            && self.external_email == other.external_email
    }
}

impl NotificationTarget {
    /// Check that the target names its channel.
    pub fn validate(&self) -> std::result::Result<(), ManifestError> {
        match self.channel {
            Channel::Slack if self.slack_channel_id.is_none() => Err(ManifestError::Invalid(
                "slack notifications need a slack_channel_id".to_string(),
            )),
            Channel::External if self.external_email.is_none() => Err(ManifestError::Invalid(
                "external notifications need an external_email".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Whether `notification` delivers to this target.
    fn matches(&self, notification: &Notification) -> bool {
        if notification.user_id != self.user_id
            || notification.notification_type != NotificationType::from(self.channel)
        {
            return false;
        }
        match self.channel {
            Channel::Internal => true,
            Channel::Slack => notification.slack_channel_id == self.slack_channel_id,
            Channel::External => notification.external_email == self.external_email,
        }
    }

    fn new_notification(&self, account_id: i64) -> Notification {
        Notification {
            id: None,
            account_id,
            user_id: self.user_id,
            on_cancel: Vec::new(),
            on_failure: Vec::new(),
            on_warning: Vec::new(),
            on_success: Vec::new(),
            state: STATE_ACTIVE,
            notification_type: self.channel.into(),
            slack_channel_id: self.slack_channel_id.clone(),
            slack_channel_name: self.slack_channel_name.clone(),
            external_email: self.external_email.clone(),
        }
    }
}

/// Accessor for the job subscriptions of one notification target.
pub struct PartialNotification<C> {
    client: Arc<C>,
    account_id: i64,
}

impl<C: NotificationApi> PartialNotification<C> {
    pub fn new(client: Arc<C>, account_id: i64) -> Self {
        Self { client, account_id }
    }

    async fn find(&self, target: &NotificationTarget) -> Result<Notification> {
        let mut matching: Vec<Notification> = self
            .client
            .list_notifications()
            .await?
            .into_iter()
            .filter(|n| target.matches(n))
            .collect();

        match matching.len() {
            0 => Err(ApiError::NotFound(target.to_string()).into()),
            1 => Ok(matching.remove(0)),
            n => Err(ApiError::Conflict(format!("{} notifications match {}", n, target)).into()),
        }
    }

    fn id_of(notification: &Notification) -> Result<i64> {
        notification
            .id
            .ok_or_else(|| ApiError::InvalidResponse("notification without id".to_string()).into())
    }
}

#[async_trait]
impl<C: NotificationApi> RemoteCollection for PartialNotification<C> {
    type Key = NotificationTarget;
    type Item = JobSubscription;

    async fn fetch(&self, key: &NotificationTarget) -> Result<Vec<JobSubscription>> {
        let notification = self.find(key).await?;
        Ok(subscriptions_of(&notification))
    }

    async fn replace(
        &self,
        key: &NotificationTarget,
        items: Vec<JobSubscription>,
    ) -> Result<Vec<JobSubscription>> {
        let mut notification = self.find(key).await?;
        let id = Self::id_of(&notification)?;
        set_subscriptions(&mut notification, &items);

        let updated = self.client.update_notification(id, notification).await?;
        Ok(subscriptions_of(&updated))
    }

    async fn provision(
        &self,
        key: &NotificationTarget,
        items: Vec<JobSubscription>,
    ) -> Result<Vec<JobSubscription>> {
        let mut notification = key.new_notification(self.account_id);
        set_subscriptions(&mut notification, &items);

        let created = self.client.create_notification(notification).await?;
        debug!("Created notification {:?} for {}", created.id, key);
        Ok(subscriptions_of(&created))
    }

    async fn retire(&self, key: &NotificationTarget) -> Result<()> {
        let notification = self.find(key).await?;
        self.client
            .delete_notification(Self::id_of(&notification)?)
            .await
    }
}
