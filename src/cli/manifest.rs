//! Manifests and ownership records
//!
//! A manifest is the YAML a user writes: the kind, the identity key of the
//! shared parent and the items this caller wants. A record is the JSON dbtc
//! writes after a successful apply, holding what the caller owns now. Both
//! share one shape so a record can be diffed against the next manifest.

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};
use crate::reconcile::SameEntry;
use crate::resources::{
    GroupSpec, JobSubscription, Kind, LicenseType, NotificationTarget, PermissionGrant, ScimGroup,
};

/// One caller's share of one kind of partial resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    GroupPartialPermissions {
        key: GroupSpec,
        #[serde(default)]
        items: Vec<PermissionGrant>,
    },
    ScimGroupPartialPermissions {
        key: ScimGroup,
        #[serde(default)]
        items: Vec<PermissionGrant>,
    },
    PartialNotification {
        key: NotificationTarget,
        #[serde(default)]
        items: Vec<JobSubscription>,
    },
    PartialLicenseMap {
        key: LicenseType,
        #[serde(default)]
        items: Vec<String>,
    },
}

impl Declaration {
    pub fn kind(&self) -> Kind {
        match self {
            Declaration::GroupPartialPermissions { .. } => Kind::GroupPartialPermissions,
            Declaration::ScimGroupPartialPermissions { .. } => Kind::ScimGroupPartialPermissions,
            Declaration::PartialNotification { .. } => Kind::PartialNotification,
            Declaration::PartialLicenseMap { .. } => Kind::PartialLicenseMap,
        }
    }

    /// Identity key as shown to users.
    pub fn key_label(&self) -> String {
        match self {
            Declaration::GroupPartialPermissions { key, .. } => key.to_string(),
            Declaration::ScimGroupPartialPermissions { key, .. } => key.to_string(),
            Declaration::PartialNotification { key, .. } => key.to_string(),
            Declaration::PartialLicenseMap { key, .. } => key.to_string(),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Declaration::GroupPartialPermissions { items, .. } => items.len(),
            Declaration::ScimGroupPartialPermissions { items, .. } => items.len(),
            Declaration::PartialNotification { items, .. } => items.len(),
            Declaration::PartialLicenseMap { items, .. } => items.len(),
        }
    }

    /// Reject declarations the API would refuse or misinterpret.
    pub fn validate(&self) -> std::result::Result<(), ManifestError> {
        match self {
            Declaration::GroupPartialPermissions { key, items } => {
                if key.name.trim().is_empty() {
                    return Err(ManifestError::Invalid(
                        "group name must not be empty".to_string(),
                    ));
                }
                items.iter().try_for_each(PermissionGrant::validate)
            }
            Declaration::ScimGroupPartialPermissions { items, .. } => {
                items.iter().try_for_each(PermissionGrant::validate)
            }
            Declaration::PartialNotification { key, .. } => key.validate(),
            Declaration::PartialLicenseMap { items, .. } => {
                match items.iter().find(|g| g.trim().is_empty()) {
                    Some(_) => Err(ManifestError::Invalid(
                        "SSO group names must not be empty".to_string(),
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

/// A manifest's key and items next to what its record says the caller owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Paired<K, T> {
    pub key: K,
    pub planned: Vec<T>,
    /// `None` until the first successful apply
    pub prior: Option<Vec<T>>,
}

/// A manifest matched against its record, per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Desired {
    GroupPartialPermissions(Paired<GroupSpec, PermissionGrant>),
    ScimGroupPartialPermissions(Paired<ScimGroup, PermissionGrant>),
    PartialNotification(Paired<NotificationTarget, JobSubscription>),
    PartialLicenseMap(Paired<LicenseType, String>),
}

fn paired<K, T>(
    key: K,
    planned: Vec<T>,
    record: Option<(K, Vec<T>)>,
) -> std::result::Result<Paired<K, T>, ManifestError>
where
    K: SameEntry + fmt::Display,
{
    let prior = match record {
        Some((recorded, _)) if !recorded.same_entry(&key) => {
            let (was, now) = (recorded.to_string(), key.to_string());
            let change = if was == now {
                format!("{} is declared with other settings than recorded", now)
            } else {
                format!("was {}, now {}", was, now)
            };
            return Err(ManifestError::KeyChanged(change));
        }
        Some((_, items)) => Some(items),
        None => None,
    };
    Ok(Paired {
        key,
        planned,
        prior,
    })
}

/// Match a manifest with the record of its previous apply.
///
/// The record must describe the same kind and the same identity key: moving
/// items to another parent is a destroy followed by a fresh apply.
pub fn pair(
    manifest: Declaration,
    record: Option<Declaration>,
) -> std::result::Result<Desired, ManifestError> {
    use Declaration as D;

    match (manifest, record) {
        (D::GroupPartialPermissions { key, items }, None) => {
            paired(key, items, None).map(Desired::GroupPartialPermissions)
        }
        (
            D::GroupPartialPermissions { key, items },
            Some(D::GroupPartialPermissions { key: old, items: prior }),
        ) => paired(key, items, Some((old, prior))).map(Desired::GroupPartialPermissions),

        (D::ScimGroupPartialPermissions { key, items }, None) => {
            paired(key, items, None).map(Desired::ScimGroupPartialPermissions)
        }
        (
            D::ScimGroupPartialPermissions { key, items },
            Some(D::ScimGroupPartialPermissions { key: old, items: prior }),
        ) => paired(key, items, Some((old, prior))).map(Desired::ScimGroupPartialPermissions),

        (D::PartialNotification { key, items }, None) => {
            paired(key, items, None).map(Desired::PartialNotification)
        }
        (
            D::PartialNotification { key, items },
            Some(D::PartialNotification { key: old, items: prior }),
        ) => paired(key, items, Some((old, prior))).map(Desired::PartialNotification),

        (D::PartialLicenseMap { key, items }, None) => {
            paired(key, items, None).map(Desired::PartialLicenseMap)
        }
        (
            D::PartialLicenseMap { key, items },
            Some(D::PartialLicenseMap { key: old, items: prior }),
        ) => paired(key, items, Some((old, prior))).map(Desired::PartialLicenseMap),

        (manifest, Some(record)) => Err(ManifestError::KindMismatch {
            record: record.kind().to_string(),
            manifest: manifest.kind().to_string(),
        }),
    }
}

/// Read and validate a YAML manifest.
pub fn load_manifest(path: &Path) -> Result<Declaration> {
    let contents = std::fs::read_to_string(path)?;
    let manifest: Declaration = serde_yaml::from_str(&contents)
        .map_err(|e| ManifestError::Invalid(format!("{}: {}", path.display(), e)))?;
    manifest.validate()?;
    debug!("Loaded {} manifest from {}", manifest.kind(), path.display());
    Ok(manifest)
}

/// Read a record, `None` when none was written yet.
pub fn load_record(path: &Path) -> Result<Option<Declaration>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Read a record that has to exist.
pub fn require_record(path: &Path) -> Result<Declaration> {
    load_record(path)?
        .ok_or_else(|| ManifestError::MissingRecord(path.display().to_string()).into())
}

pub fn save_record(path: &Path, record: &Declaration) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(record)?)?;
    debug!("Wrote {} record to {}", record.kind(), path.display());
    Ok(())
}

pub fn remove_record(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
        debug!("Removed record {}", path.display());
    }
    Ok(())
}

/// Record location used when `--record` is not given: `x.yaml` -> `x.record.json`.
pub fn default_record_path(manifest: &Path) -> PathBuf {
    manifest.with_extension("record.json")
}
