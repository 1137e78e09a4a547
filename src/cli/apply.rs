//! Apply command implementation

use std::path::{Path, PathBuf};

use log::info;

use crate::cli::lifecycle::converge;
use crate::cli::manifest::{
    Declaration, Desired, default_record_path, load_manifest, load_record, pair, save_record,
};
use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::resources::Kind;

/// Run the apply command
///
/// Without a record this creates the caller's share; with one it moves the
/// share from the recorded items to the manifest's items. The new record is
/// written only after the remote write succeeded.
pub async fn run(
    opts: &GlobalOptions,
    manifest_path: &str,
    record_path: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let manifest_path = Path::new(manifest_path);
    let record_path = record_path
        .map(PathBuf::from)
        .unwrap_or_else(|| default_record_path(manifest_path));

    let manifest = load_manifest(manifest_path)?;
    let desired = pair(manifest, load_record(&record_path)?)?;

    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    let record = match desired {
        Desired::GroupPartialPermissions(p) => {
            let items = converge(
                &ctx.group_permissions(),
                Kind::GroupPartialPermissions,
                &p.key,
                p.planned,
                p.prior,
                dry_run,
                format,
            )
            .await?;
            Declaration::GroupPartialPermissions { key: p.key, items }
        }
        Desired::ScimGroupPartialPermissions(p) => {
            let items = converge(
                &ctx.scim_group_permissions(),
                Kind::ScimGroupPartialPermissions,
                &p.key,
                p.planned,
                p.prior,
                dry_run,
                format,
            )
            .await?;
            Declaration::ScimGroupPartialPermissions { key: p.key, items }
        }
        Desired::PartialNotification(p) => {
            let items = converge(
                &ctx.notifications(),
                Kind::PartialNotification,
                &p.key,
                p.planned,
                p.prior,
                dry_run,
                format,
            )
            .await?;
            Declaration::PartialNotification { key: p.key, items }
        }
        Desired::PartialLicenseMap(p) => {
            let items = converge(
                &ctx.license_maps(),
                Kind::PartialLicenseMap,
                &p.key,
                p.planned,
                p.prior,
                dry_run,
                format,
            )
            .await?;
            Declaration::PartialLicenseMap { key: p.key, items }
        }
    };

    if dry_run {
        return Ok(());
    }

    save_record(&record_path, &record)?;
    info!(
        "Recorded {} owned items of {} in {}",
        record.item_count(),
        record.key_label(),
        record_path.display()
    );
    Ok(())
}
