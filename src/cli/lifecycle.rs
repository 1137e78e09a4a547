//! Lifecycle steps shared by apply, refresh and destroy
//!
//! Each step drives a [`Reconciler`] for one kind and prints a [`Report`].
//! The caller turns the returned items back into a record.

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::{Action, Describe, Report};
use crate::output::Formattable;
use crate::reconcile::predicate::same_entry;
use crate::reconcile::reconciler::local_changes;
use crate::reconcile::set_ops::difference_by;
use crate::reconcile::{Observed, Reconciler, RemoteCollection};
use crate::resources::Kind;

/// Items owned after a step, `None` when nothing is owned any more.
pub type Owned<T> = Option<Vec<T>>;

/// Create (no prior record) or update (prior record present).
pub async fn converge<R>(
    reconciler: &Reconciler<R>,
    kind: Kind,
    key: &R::Key,
    planned: Vec<R::Item>,
    prior: Option<Vec<R::Item>>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<Vec<R::Item>>
where
    R: RemoteCollection,
    R::Item: Describe + Serialize,
{
    let report = match prior {
        None if dry_run => {
            let plan = reconciler.plan_create(key, &planned).await?;
            Report::dry_run(kind, key, Action::Create, plan, planned)
        }
        None => {
            let owned = reconciler.create(key, planned).await?;
            let mut report = Report::new(kind, key, Action::Create);
            report.added = owned.clone();
            report.items = owned;
            report
        }
        Some(prior) if dry_run => {
            let plan = reconciler.plan_update(key, &prior, &planned).await?;
            Report::dry_run(kind, key, Action::Update, plan, planned)
        }
        Some(prior) => {
            let (added, removed) = local_changes(&prior, &planned);
            let owned = reconciler.update(key, &prior, planned).await?;
            let mut report = Report::new(kind, key, Action::Update);
            report.added = added;
            report.removed = removed;
            report.items = owned;
            report
        }
    };

    report.print(format)?;
    Ok(report.items)
}

/// Clip the recorded items to what is still present remotely.
pub async fn refresh<R>(
    reconciler: &Reconciler<R>,
    kind: Kind,
    key: &R::Key,
    prior: Vec<R::Item>,
    format: OutputFormat,
) -> Result<Owned<R::Item>>
where
    R: RemoteCollection,
    R::Item: Describe + Serialize,
{
    let mut report = Report::new(kind, key, Action::Refresh);

    let owned = match reconciler.read(key, &prior).await? {
        Observed::Present(present) => {
            report.removed = difference_by(&prior, &present, same_entry).only_in_a;
            report.items = present.clone();
            Some(present)
        }
        Observed::Gone => {
            report.removed = prior;
            report.gone = true;
            None
        }
    };

    report.print(format)?;
    Ok(owned)
}

/// Remove the recorded items, leaving everyone else's in place.
pub async fn destroy<R>(
    reconciler: &Reconciler<R>,
    kind: Kind,
    key: &R::Key,
    prior: Vec<R::Item>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()>
where
    R: RemoteCollection,
    R::Item: Describe + Serialize,
{
    let report = if dry_run {
        let plan = reconciler.plan_delete(key, &prior).await?;
        Report::dry_run(kind, key, Action::Destroy, plan, Vec::new())
    } else {
        reconciler.delete(key, &prior).await?;
        let mut report = Report::new(kind, key, Action::Destroy);
        report.removed = prior;
        report
    };

    report.print(format)
}
