//! dbt Cloud API data models
//!
//! Wire shapes of the account objects whose collections dbtc reconciles.

mod group;
mod license_map;
mod notification;

pub use group::{Group, GroupPermission, NewGroup};
pub use license_map::{LicenseMap, NewLicenseMap};
pub use notification::{Notification, NotificationType};

/// `state` value of a live object
pub const STATE_ACTIVE: i64 = 1;

/// `state` value of a soft-deleted object
pub const STATE_DELETED: i64 = 2;

pub(crate) fn active_state() -> i64 {
    STATE_ACTIVE
}
