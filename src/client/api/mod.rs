//! API trait definitions split by responsibility
//!
//! This module organizes the dbt Cloud API surface into focused sub-traits:
//! - [`GroupApi`] - Groups and their permission grants
//! - [`NotificationApi`] - Job notifications
//! - [`LicenseMapApi`] - SSO license mappings

mod group;
mod license_map;
mod notification;

pub use group::GroupApi;
pub use license_map::LicenseMapApi;
pub use notification::NotificationApi;
