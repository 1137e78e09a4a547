//! Partial collection reconciliation
//!
//! - [`set_ops`] - predicate-based difference, union and intersection
//! - [`predicate`] - the [`SameEntry`] identity trait and normalisation helpers
//! - [`remote`] - the [`RemoteCollection`] accessor seam
//! - [`reconciler`] - the create/read/update/delete lifecycle

pub mod predicate;
pub mod reconciler;
pub mod remote;
pub mod set_ops;

pub use predicate::{SameEntry, optional_set_eq};
pub use reconciler::{Observed, Plan, Reconciler};
pub use remote::RemoteCollection;
