//! Partial collection reconciler
//!
//! A caller owns only the items it declared. Every lifecycle operation reads
//! the full remote collection, works out the caller's share of it, and writes
//! back a full replacement that keeps every other caller's items untouched.
//!
//! There is no locking or version check on the remote side. Two callers that
//! read and write the same collection at the same moment can still overwrite
//! each other; re-reading right before every write keeps that window small.

use log::{debug, info};

use super::predicate::{SameEntry, same_entry};
use super::remote::RemoteCollection;
use super::set_ops::{difference_by, intersect_by, union_by};
use crate::error::Result;

/// Remote write chosen for a lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Write<T> {
    /// Nothing to send
    Skip,
    /// Overwrite the collection with these items
    Replace(Vec<T>),
    /// Create the missing parent holding these items
    Provision(Vec<T>),
    /// No items left for anyone: end the parent's lifecycle
    Retire,
}

impl<T> Write<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Write::Skip => "skip",
            Write::Replace(_) => "replace",
            Write::Provision(_) => "provision",
            Write::Retire => "retire",
        }
    }
}

/// Outcome of planning one lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<T> {
    /// Items this caller adds
    pub added: Vec<T>,
    /// Items this caller removes
    pub removed: Vec<T>,
    /// What will be sent to the remote side
    pub write: Write<T>,
}

impl<T> Plan<T> {
    fn skip() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            write: Write::Skip,
        }
    }

    /// True when applying the plan sends nothing.
    pub fn is_noop(&self) -> bool {
        matches!(self.write, Write::Skip)
    }
}

/// Result of reading a caller's share of the remote collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed<T> {
    /// Items of the prior state still present remotely
    Present(Vec<T>),
    /// The parent entity was deleted out-of-band
    Gone,
}

/// Decide the create write. `remote` is `None` when the parent is missing.
pub fn decide_create<T>(planned: &[T], remote: Option<&[T]>) -> Plan<T>
where
    T: SameEntry + Clone,
{
    let Some(remote) = remote else {
        return Plan {
            added: planned.to_vec(),
            removed: Vec::new(),
            write: Write::Provision(planned.to_vec()),
        };
    };

    let missing = difference_by(planned, remote, same_entry).only_in_a;
    if missing.is_empty() {
        return Plan::skip();
    }

    let combined = union_by(remote, &missing, same_entry);
    Plan {
        added: missing,
        removed: Vec::new(),
        write: Write::Replace(combined),
    }
}

/// Items `planned` adds and removes relative to `prior`.
pub fn local_changes<T>(prior: &[T], planned: &[T]) -> (Vec<T>, Vec<T>)
where
    T: SameEntry + Clone,
{
    let diff = difference_by(planned, prior, same_entry);
    (diff.only_in_a, diff.only_in_b)
}

/// Decide the update write against a freshly fetched `remote`.
pub fn decide_update<T>(prior: &[T], planned: &[T], remote: &[T]) -> Plan<T>
where
    T: SameEntry + Clone,
{
    let (added, removed) = local_changes(prior, planned);
    if added.is_empty() && removed.is_empty() {
        return Plan::skip();
    }

    let with_added = union_by(remote, &added, same_entry);
    let next = difference_by(&with_added, &removed, same_entry).only_in_a;
    Plan {
        added,
        removed,
        write: Write::Replace(next),
    }
}

/// Decide the delete write. `remote` is `None` when the parent is already gone.
///
/// When none of `prior` is left remotely and others still hold items, the
/// collection is not rewritten.
pub fn decide_delete<T>(prior: &[T], remote: Option<&[T]>) -> Plan<T>
where
    T: SameEntry + Clone,
{
    let Some(remote) = remote else {
        return Plan::skip();
    };

    let remaining = difference_by(remote, prior, same_entry).only_in_a;
    let removed = intersect_by(remote, prior, same_entry);
    let write = if remaining.is_empty() {
        Write::Retire
    } else if removed.is_empty() {
        Write::Skip
    } else {
        Write::Replace(remaining)
    };

    Plan {
        added: Vec::new(),
        removed,
        write,
    }
}

/// Drives create/read/update/delete for one kind of partial resource.
pub struct Reconciler<R> {
    remote: R,
}

impl<R: RemoteCollection> Reconciler<R> {
    /// Create a reconciler over a remote collection accessor.
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Fetch the collection, mapping a missing parent to `None`.
    async fn fetch_existing(&self, key: &R::Key) -> Result<Option<Vec<R::Item>>> {
        match self.remote.fetch(key).await {
            Ok(items) => Ok(Some(items)),
            Err(err) if err.is_not_found() => {
                debug!("{} not found remotely", key);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn apply(&self, key: &R::Key, write: Write<R::Item>) -> Result<()> {
        match write {
            Write::Skip => {
                debug!("No remote write needed for {}", key);
            }
            Write::Replace(items) => {
                info!("Replacing collection of {} ({} items)", key, items.len());
                self.remote.replace(key, items).await?;
            }
            Write::Provision(items) => {
                info!("Creating {} with {} items", key, items.len());
                self.remote.provision(key, items).await?;
            }
            Write::Retire => {
                info!("No items left in {}, retiring it", key);
                self.remote.retire(key).await?;
            }
        }
        Ok(())
    }

    /// Plan adding `planned` to the remote collection.
    pub async fn plan_create(&self, key: &R::Key, planned: &[R::Item]) -> Result<Plan<R::Item>> {
        let remote = self.fetch_existing(key).await?;
        let plan = decide_create(planned, remote.as_deref());
        debug!(
            "Create plan for {}: {} to add, noop={}",
            key,
            plan.added.len(),
            plan.is_noop()
        );
        Ok(plan)
    }

    /// Add `planned` to the remote collection. Returns the caller's new state.
    pub async fn create(&self, key: &R::Key, planned: Vec<R::Item>) -> Result<Vec<R::Item>> {
        let plan = self.plan_create(key, &planned).await?;
        self.apply(key, plan.write).await?;
        Ok(planned)
    }

    /// Clip `prior` down to the items still present remotely.
    pub async fn read(&self, key: &R::Key, prior: &[R::Item]) -> Result<Observed<R::Item>> {
        let Some(remote) = self.fetch_existing(key).await? else {
            return Ok(Observed::Gone);
        };

        let present = intersect_by(prior, &remote, same_entry);
        if present.len() < prior.len() {
            debug!(
                "{} of {} owned items were removed from {} outside dbtc",
                prior.len() - present.len(),
                prior.len(),
                key
            );
        }
        Ok(Observed::Present(present))
    }

    /// Plan moving the caller's share from `prior` to `planned`.
    ///
    /// Skips the fetch entirely when the two sets already match.
    pub async fn plan_update(
        &self,
        key: &R::Key,
        prior: &[R::Item],
        planned: &[R::Item],
    ) -> Result<Plan<R::Item>> {
        let (added, removed) = local_changes(prior, planned);
        if added.is_empty() && removed.is_empty() {
            debug!("Update plan for {}: no local changes", key);
            return Ok(Plan::skip());
        }

        let remote = self.remote.fetch(key).await?;
        let plan = decide_update(prior, planned, &remote);
        debug!(
            "Update plan for {}: {} to add, {} to remove",
            key,
            plan.added.len(),
            plan.removed.len()
        );
        Ok(plan)
    }

    /// Move the caller's share from `prior` to `planned`. Returns the new state.
    pub async fn update(
        &self,
        key: &R::Key,
        prior: &[R::Item],
        planned: Vec<R::Item>,
    ) -> Result<Vec<R::Item>> {
        let plan = self.plan_update(key, prior, &planned).await?;
        self.apply(key, plan.write).await?;
        Ok(planned)
    }

    /// Plan removing the caller's share.
    pub async fn plan_delete(&self, key: &R::Key, prior: &[R::Item]) -> Result<Plan<R::Item>> {
        let remote = self.fetch_existing(key).await?;
        let plan = decide_delete(prior, remote.as_deref());
        debug!(
            "Delete plan for {}: {} to remove, retire={}",
            key,
            plan.removed.len(),
            matches!(plan.write, Write::Retire)
        );
        Ok(plan)
    }

    /// Remove the caller's share, leaving other callers' items in place.
    pub async fn delete(&self, key: &R::Key, prior: &[R::Item]) -> Result<()> {
        let plan = self.plan_delete(key, prior).await?;
        self.apply(key, plan.write).await
    }
}
