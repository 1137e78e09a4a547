//! Permission grant item shared by the group kinds

use serde::{Deserialize, Serialize};

use crate::client::models::{GroupPermission, STATE_ACTIVE, STATE_DELETED};
use crate::error::ManifestError;
use crate::reconcile::{SameEntry, optional_set_eq};

/// Environment categories accepted by `writable_environment_categories`
pub const ENVIRONMENT_CATEGORIES: [&str; 5] =
    ["all", "development", "staging", "production", "other"];

/// One permission grant as declared by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Id of the stored grant this item was read from
    #[serde(skip)]
    pub remote_id: Option<i64>,

    /// Permission set name, e.g. `developer` or `job_admin`
    pub permission_set: String,

    /// Project scope; required unless `all_projects` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,

    #[serde(default)]
    pub all_projects: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable_environment_categories: Option<Vec<String>>,
}

impl SameEntry for PermissionGrant {
    fn same_entry(&self, other: &Self) -> bool {
        self.permission_set == other.permission_set
            && self.project_id == other.project_id
            && self.all_projects == other.all_projects
            && optional_set_eq(
                self.writable_environment_categories.as_deref(),
                other.writable_environment_categories.as_deref(),
            )
    }
}

impl PermissionGrant {
    /// Grant scoped to every project.
    #[cfg(test)]
    pub fn account_wide(permission_set: &str) -> Self {
        Self {
            remote_id: None,
            permission_set: permission_set.to_string(),
            project_id: None,
            all_projects: true,
            writable_environment_categories: None,
        }
    }

    /// Grant scoped to one project.
    #[cfg(test)]
    pub fn for_project(permission_set: &str, project_id: i64) -> Self {
        Self {
            remote_id: None,
            permission_set: permission_set.to_string(),
            project_id: Some(project_id),
            all_projects: false,
            writable_environment_categories: None,
        }
    }

    /// Check a declared grant before sending it anywhere.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.permission_set.trim().is_empty() {
            return Err(ManifestError::Invalid(
                "permission_set must not be empty".to_string(),
            ));
        }

        if !self.all_projects && self.project_id.is_none() {
            return Err(ManifestError::Invalid(format!(
                "permission `{}` needs a project_id or all_projects: true",
                self.permission_set
            )));
        }

        if let Some(categories) = &self.writable_environment_categories {
            if let Some(unknown) = categories
                .iter()
                .find(|c| !ENVIRONMENT_CATEGORIES.contains(&c.as_str()))
            {
                return Err(ManifestError::Invalid(format!(
                    "unknown environment category `{}` (expected one of {})",
                    unknown,
                    ENVIRONMENT_CATEGORIES.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Convert a stored grant.
    pub fn from_stored(stored: &GroupPermission) -> Self {
        Self {
            remote_id: stored.id,
            permission_set: stored.permission_set.clone(),
            project_id: stored.project_id,
            all_projects: stored.all_projects,
            writable_environment_categories: stored.writable_environment_categories.clone(),
        }
    }

    /// Convert into the wire shape for a replace call.
    pub fn to_stored(&self, account_id: i64, group_id: i64) -> GroupPermission {
        GroupPermission {
            id: self.remote_id,
            account_id,
            group_id,
            permission_set: self.permission_set.clone(),
            project_id: self.project_id,
            all_projects: self.all_projects,
            state: STATE_ACTIVE,
            writable_environment_categories: self.writable_environment_categories.clone(),
        }
    }
}

/// Live grants of a stored permission list.
pub fn grants_of(stored: &[GroupPermission]) -> Vec<PermissionGrant> {
    stored
        .iter()
        .filter(|p| p.state != STATE_DELETED)
        .map(PermissionGrant::from_stored)
        .collect()
}

/// Wire shapes for writing `grants` to `group_id`.
pub fn stored_of(
    grants: &[PermissionGrant],
    account_id: i64,
    group_id: i64,
) -> Vec<GroupPermission> {
    grants
        .iter()
        .map(|g| g.to_stored(account_id, group_id))
        .collect()
}
