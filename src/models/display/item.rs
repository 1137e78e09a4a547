//! One-line descriptions of collection items

use crate::resources::{JobSubscription, PermissionGrant};

/// Compact human-readable form of an item
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for PermissionGrant {
    fn describe(&self) -> String {
        let scope = match self.project_id {
            Some(id) if !self.all_projects => format!("project {}", id),
            _ => "all projects".to_string(),
        };

        match self.writable_environment_categories.as_deref() {
            Some(categories) if !categories.is_empty() => format!(
                "{} on {} (writes {})",
                self.permission_set,
                scope,
                categories.join(", ")
            ),
            _ => format!("{} on {}", self.permission_set, scope),
        }
    }
}

impl Describe for JobSubscription {
    fn describe(&self) -> String {
        format!("job {} {}", self.job_id, self.event)
    }
}

impl Describe for String {
    fn describe(&self) -> String {
        self.clone()
    }
}
