//! Destroy command implementation

use std::path::Path;

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cli::lifecycle::destroy;
use crate::cli::manifest::{Declaration, remove_record, require_record};
use crate::cli::{CommandContext, GlobalOptions};
use crate::error::Result;
use crate::resources::Kind;

/// Run the destroy command
///
/// Removes only the recorded items. Whoever removes the last item of a
/// group, notification or license map also deletes the parent.
pub async fn run(opts: &GlobalOptions, record_path: &str, yes: bool, dry_run: bool) -> Result<()> {
    let record_path = Path::new(record_path);
    let record = require_record(record_path)?;

    if !yes && !dry_run {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Remove {} owned items from {}?",
                record.item_count(),
                record.key_label()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    let ctx = CommandContext::new(opts)?;
    let format = ctx.format;

    match record {
        Declaration::GroupPartialPermissions { key, items } => {
            destroy(
                &ctx.group_permissions(),
                Kind::GroupPartialPermissions,
                &key,
                items,
                dry_run,
                format,
            )
            .await?
        }
        Declaration::ScimGroupPartialPermissions { key, items } => {
            destroy(
                &ctx.scim_group_permissions(),
                Kind::ScimGroupPartialPermissions,
                &key,
                items,
                dry_run,
                format,
            )
            .await?
        }
        Declaration::PartialNotification { key, items } => {
            destroy(
                &ctx.notifications(),
                Kind::PartialNotification,
                &key,
                items,
                dry_run,
                format,
            )
            .await?
        }
        Declaration::PartialLicenseMap { key, items } => {
            destroy(
                &ctx.license_maps(),
                Kind::PartialLicenseMap,
                &key,
                items,
                dry_run,
                format,
            )
            .await?
        }
    }

    if dry_run {
        return Ok(());
    }
    remove_record(record_path)
}
