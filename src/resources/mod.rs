//! Partial resource kinds backed by dbt Cloud collections

pub mod group_partial_permissions;
pub mod partial_license_map;
pub mod partial_notification;
pub mod permission;
pub mod scim_group_partial_permissions;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use group_partial_permissions::{GroupPartialPermissions, GroupSpec};
pub use partial_license_map::{LicenseType, PartialLicenseMap};
pub use partial_notification::{JobSubscription, NotificationTarget, PartialNotification};
pub use permission::PermissionGrant;
pub use scim_group_partial_permissions::{ScimGroup, ScimGroupPartialPermissions};

/// Partial resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    GroupPartialPermissions,
    ScimGroupPartialPermissions,
    PartialNotification,
    PartialLicenseMap,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::GroupPartialPermissions => "group_partial_permissions",
            Kind::ScimGroupPartialPermissions => "scim_group_partial_permissions",
            Kind::PartialNotification => "partial_notification",
            Kind::PartialLicenseMap => "partial_license_map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
