//! Group and group permission models

use serde::{Deserialize, Serialize};

use super::active_state;

/// Account group with its permission grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Group ID
    pub id: i64,

    /// Owning account
    pub account_id: i64,

    /// Group name (unique per account)
    pub name: String,

    /// 1 = active, 2 = deleted
    #[serde(default = "active_state")]
    pub state: i64,

    /// Whether new users join this group automatically
    #[serde(default)]
    pub assign_by_default: bool,

    /// SSO groups mapped onto this group
    #[serde(default)]
    pub sso_mapping_groups: Vec<String>,

    /// Permission grants of the group
    #[serde(default)]
    pub group_permissions: Vec<GroupPermission>,
}

/// Request body for creating a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub account_id: i64,
    pub name: String,
    pub assign_by_default: bool,
    pub sso_mapping_groups: Vec<String>,
}

/// One permission grant of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPermission {
    /// Grant ID (assigned by dbt Cloud)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub account_id: i64,

    pub group_id: i64,

    /// Permission set name, e.g. `developer` or `job_admin`
    pub permission_set: String,

    /// Project the grant is scoped to (absent for account-wide grants)
    #[serde(default)]
    pub project_id: Option<i64>,

    #[serde(default)]
    pub all_projects: bool,

    #[serde(default = "active_state")]
    pub state: i64,

    /// Environment categories the grant may write to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable_environment_categories: Option<Vec<String>>,
}
