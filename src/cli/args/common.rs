//! Common CLI types shared across commands

use serde::{Deserialize, Serialize};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored summary of the changes
    #[default]
    Pretty,
    /// One row per item with its change marker
    Table,
    /// `{data, meta}` envelope for scripts
    Json,
}
