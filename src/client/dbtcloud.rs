//! dbt Cloud API client implementation

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{GroupApi, LicenseMapApi, NotificationApi};
use super::models::{
    Group, GroupPermission, LicenseMap, NewGroup, NewLicenseMap, Notification, STATE_DELETED,
};
use super::pagination::{MAX_PAGE_SIZE, PagedResponse, PaginationParams};
use super::rate_limit::ReactiveRateLimiter;
use crate::error::{ApiError, Result};

/// dbt Cloud API base URL (multi-tenant US region)
pub const DEFAULT_HOST_URL: &str = "https://cloud.getdbt.com/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `{ "data": ... }` envelope around every dbt Cloud response
#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// dbt Cloud API client bound to one account
pub struct DbtCloudClient {
    http: HttpClient,
    base_url: String,
    token: String,
    account_id: i64,
    rate_limiter: ReactiveRateLimiter,
}

impl DbtCloudClient {
    /// Create a new dbt Cloud API client
    pub fn new(
        host_url: &str,
        token: impl Into<String>,
        account_id: i64,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: host_url.trim_end_matches('/').to_string(),
            token: token.into(),
            account_id,
            rate_limiter: ReactiveRateLimiter::default(),
        })
    }

    fn v2(&self, path: &str) -> String {
        format!("/v2/accounts/{}{}", self.account_id, path)
    }

    fn v3(&self, path: &str) -> String {
        format!("/v3/accounts/{}{}", self.account_id, path)
    }

    /// Send a request and map non-success statuses to `ApiError`.
    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.rate_limiter.wait_if_active().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        match status {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .ok()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| path.to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::CONFLICT => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Conflict".to_string());
                Err(ApiError::Conflict(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                self.rate_limiter.activate();
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }

    /// Send a request and decode the `data` field of the response.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.send(method, path, query, body).await?;
        let envelope = response.json::<Envelope<T>>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(envelope.data)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, &[], None).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Walk every page of an offset-paginated list endpoint.
    async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut offset = 0;

        loop {
            let params = PaginationParams::new().limit(MAX_PAGE_SIZE).offset(offset);
            let page: PagedResponse<T> = self
                .send::<()>(Method::GET, path, &params.to_query_params(), None)
                .await?
                .json()
                .await
                .map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse page: {}", e))
                })?;

            let next = page.next_offset(offset);
            items.extend(page.data);

            match next {
                Some(next) => offset = next,
                None => break,
            }
        }

        debug!("Fetched {} items from {}", items.len(), path);
        Ok(items)
    }
}

fn deleted(what: &str, id: i64) -> crate::error::Error {
    ApiError::NotFound(format!("{} {} has been deleted", what, id)).into()
}

#[async_trait]
impl GroupApi for DbtCloudClient {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups: Vec<Group> = self.list_all(&self.v3("/groups/")).await?;
        Ok(groups
            .into_iter()
            .filter(|g| g.state != STATE_DELETED)
            .collect())
    }

    async fn get_group(&self, group_id: i64) -> Result<Group> {
        let group: Group = self.get(&self.v3(&format!("/groups/{}/", group_id))).await?;
        if group.state == STATE_DELETED {
            return Err(deleted("Group", group_id));
        }
        Ok(group)
    }

    async fn create_group(&self, request: NewGroup) -> Result<Group> {
        self.post(&self.v3("/groups/"), &request).await
    }

    async fn replace_group_permissions(
        &self,
        group_id: i64,
        permissions: Vec<GroupPermission>,
    ) -> Result<Vec<GroupPermission>> {
        self.post(
            &self.v3(&format!("/group-permissions/{}/", group_id)),
            &permissions,
        )
        .await
    }

    async fn delete_group(&self, group_id: i64) -> Result<()> {
        let mut group = self.get_group(group_id).await?;
        group.state = STATE_DELETED;
        let _: Group = self
            .post(&self.v3(&format!("/groups/{}/", group_id)), &group)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationApi for DbtCloudClient {
    async fn list_notifications(&self) -> Result<Vec<Notification>> {
        let notifications: Vec<Notification> = self.list_all(&self.v2("/notifications/")).await?;
        Ok(notifications
            .into_iter()
            .filter(|n| n.state != STATE_DELETED)
            .collect())
    }

    async fn get_notification(&self, notification_id: i64) -> Result<Notification> {
        let notification: Notification = self
            .get(&self.v2(&format!("/notifications/{}/", notification_id)))
            .await?;
        if notification.state == STATE_DELETED {
            return Err(deleted("Notification", notification_id));
        }
        Ok(notification)
    }

    async fn create_notification(&self, notification: Notification) -> Result<Notification> {
        self.post(&self.v2("/notifications/"), &notification).await
    }

    async fn update_notification(
        &self,
        notification_id: i64,
        notification: Notification,
    ) -> Result<Notification> {
        self.post(
            &self.v2(&format!("/notifications/{}/", notification_id)),
            &notification,
        )
        .await
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<()> {
        let mut notification = self.get_notification(notification_id).await?;
        notification.state = STATE_DELETED;
        self.update_notification(notification_id, notification)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl LicenseMapApi for DbtCloudClient {
    async fn list_license_maps(&self) -> Result<Vec<LicenseMap>> {
        self.list_all(&self.v3("/license-maps/")).await
    }

    async fn create_license_map(&self, request: NewLicenseMap) -> Result<LicenseMap> {
        self.post(&self.v3("/license-maps/"), &request).await
    }

    async fn update_license_map(
        &self,
        license_map_id: i64,
        license_map: LicenseMap,
    ) -> Result<LicenseMap> {
        self.post(
            &self.v3(&format!("/license-maps/{}/", license_map_id)),
            &license_map,
        )
        .await
    }

    async fn delete_license_map(&self, license_map_id: i64) -> Result<()> {
        self.send::<()>(
            Method::DELETE,
            &self.v3(&format!("/license-maps/{}/", license_map_id)),
            &[],
            None,
        )
        .await?;
        Ok(())
    }
}
