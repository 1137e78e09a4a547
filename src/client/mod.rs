//! dbt Cloud API client

pub mod api;
pub mod dbtcloud;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod rate_limit;

pub use api::{GroupApi, LicenseMapApi, NotificationApi};
pub use dbtcloud::{DEFAULT_HOST_URL, DEFAULT_TIMEOUT, DbtCloudClient};
#[cfg(test)]
pub use mock::MockDbtCloudClient;
