//! Refresh command implementation

use std::path::Path;

use log::warn;

use crate::cli::lifecycle::refresh;
use crate::cli::manifest::{Declaration, remove_record, require_record, save_record};
use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::resources::Kind;

/// Run the refresh command
///
/// Drops recorded items that were removed outside dbtc. When the parent
/// itself is gone the record is deleted, so the next apply starts over.
pub async fn run(opts: &GlobalOptions, record_path: &str) -> Result<()> {
    let record_path = Path::new(record_path);
    let record = require_record(record_path)?;
    let label = record.key_label();

    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    let refreshed = match record {
        Declaration::GroupPartialPermissions { key, items } => refresh(
            &ctx.group_permissions(),
            Kind::GroupPartialPermissions,
            &key,
            items,
            format,
        )
        .await?
        .map(|items| Declaration::GroupPartialPermissions { key, items }),
        Declaration::ScimGroupPartialPermissions { key, items } => refresh(
            &ctx.scim_group_permissions(),
            Kind::ScimGroupPartialPermissions,
            &key,
            items,
            format,
        )
        .await?
        .map(|items| Declaration::ScimGroupPartialPermissions { key, items }),
        Declaration::PartialNotification { key, items } => refresh(
            &ctx.notifications(),
            Kind::PartialNotification,
            &key,
            items,
            format,
        )
        .await?
        .map(|items| Declaration::PartialNotification { key, items }),
        Declaration::PartialLicenseMap { key, items } => refresh(
            &ctx.license_maps(),
            Kind::PartialLicenseMap,
            &key,
            items,
            format,
        )
        .await?
        .map(|items| Declaration::PartialLicenseMap { key, items }),
    };

    match refreshed {
        Some(record) => save_record(record_path, &record),
        None => {
            warn!("{} no longer exists, removing {}", label, record_path.display());
            remove_record(record_path)
        }
    }
}
