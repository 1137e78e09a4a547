//! Result of one lifecycle command

use std::fmt;

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use super::item::Describe;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::Formattable;
use crate::output::json::format_json;
use crate::output::table::format_table;
use crate::reconcile::predicate::same_entry;
use crate::reconcile::set_ops::difference_by;
use crate::reconcile::{Plan, SameEntry};
use crate::resources::Kind;

/// Lifecycle command that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Refresh,
    Destroy,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Refresh => "refresh",
            Action::Destroy => "destroy",
        };
        f.write_str(s)
    }
}

/// What a command did (or would do) to the caller's share of a collection.
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub kind: Kind,
    pub key: String,
    pub action: Action,
    pub dry_run: bool,

    /// Remote write a dry run would send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<&'static str>,

    pub added: Vec<T>,
    pub removed: Vec<T>,

    /// Items owned once the command has run
    pub items: Vec<T>,

    /// The remote parent no longer exists
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub gone: bool,
}

/// Table row of a report
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ChangeDisplay {
    #[tabled(rename = "CHANGE")]
    pub change: String,

    #[tabled(rename = "ITEM")]
    pub item: String,
}

impl<T: Clone + SameEntry> Report<T> {
    pub fn new(kind: Kind, key: &impl fmt::Display, action: Action) -> Self {
        Self {
            kind,
            key: key.to_string(),
            action,
            dry_run: false,
            write: None,
            added: Vec::new(),
            removed: Vec::new(),
            items: Vec::new(),
            gone: false,
        }
    }

    /// Report of a plan that was not applied.
    pub fn dry_run(
        kind: Kind,
        key: &impl fmt::Display,
        action: Action,
        plan: Plan<T>,
        items: Vec<T>,
    ) -> Self {
        Self {
            dry_run: true,
            write: Some(plan.write.name()),
            added: plan.added,
            removed: plan.removed,
            items,
            ..Self::new(kind, key, action)
        }
    }

    /// Owned items that were neither added nor removed.
    fn kept(&self) -> Vec<T> {
        difference_by(&self.items, &self.added, same_entry).only_in_a
    }

    fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && !self.gone
    }
}

impl<T: Clone + SameEntry + Describe> Report<T> {
    pub fn rows(&self) -> Vec<ChangeDisplay> {
        let row = |change: &str, item: &T| ChangeDisplay {
            change: change.to_string(),
            item: item.describe(),
        };

        self.added
            .iter()
            .map(|i| row("+", i))
            .chain(self.removed.iter().map(|i| row("-", i)))
            .chain(self.kept().iter().map(|i| row("=", i)))
            .collect()
    }

    fn pretty(&self) -> String {
        let mut lines = Vec::new();

        let mut header = format!("{} {} {}", self.action, self.kind, self.key)
            .bold()
            .to_string();
        if self.dry_run {
            header.push_str(&format!(" {}", "(dry run)".dimmed()));
        }
        lines.push(header);

        if self.gone {
            lines.push(format!(
                "{} {} no longer exists, record removed",
                "⚠".yellow(),
                self.key
            ));
            return lines.join("\n");
        }

        for item in &self.added {
            lines.push(format!("  {} {}", "+".green(), item.describe().green()));
        }
        for item in &self.removed {
            lines.push(format!("  {} {}", "-".red(), item.describe().red()));
        }
        for item in self.kept() {
            lines.push(format!("    {}", item.describe().dimmed()));
        }

        if self.is_unchanged() {
            lines.push(format!("{} Nothing to change", "✓".green()));
        }
        if let Some(write) = self.write {
            lines.push(format!("Remote write: {}", write.cyan()));
        }

        lines.join("\n")
    }
}

impl<T> Formattable for Report<T>
where
    T: Clone + SameEntry + Describe + Serialize,
{
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(format_json(self)?),
            OutputFormat::Table => Ok(format_table(&self.rows())),
            OutputFormat::Pretty => Ok(self.pretty()),
        }
    }
}
