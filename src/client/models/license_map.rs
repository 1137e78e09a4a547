//! License map models

use serde::{Deserialize, Serialize};

use super::active_state;

/// Mapping from SSO groups to a license type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseMap {
    pub id: i64,

    pub account_id: i64,

    #[serde(default = "active_state")]
    pub state: i64,

    /// `developer`, `read_only`, `it` or `analyst`
    pub license_type: String,

    #[serde(default)]
    pub sso_license_mapping_groups: Vec<String>,
}

/// Request body for creating a license map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLicenseMap {
    pub account_id: i64,
    pub license_type: String,
    pub sso_license_mapping_groups: Vec<String>,
}
