//! License map API trait

use async_trait::async_trait;

use crate::client::models::{LicenseMap, NewLicenseMap};
use crate::error::Result;

/// SSO license mapping operations for the dbt Cloud API
#[async_trait]
pub trait LicenseMapApi: Send + Sync {
    /// List all license maps of the account.
    async fn list_license_maps(&self) -> Result<Vec<LicenseMap>>;

    /// Create a license map.
    async fn create_license_map(&self, request: NewLicenseMap) -> Result<LicenseMap>;

    /// Overwrite a license map, including its SSO group list.
    async fn update_license_map(
        &self,
        license_map_id: i64,
        license_map: LicenseMap,
    ) -> Result<LicenseMap>;

    /// Delete a license map.
    async fn delete_license_map(&self, license_map_id: i64) -> Result<()>;
}
