//! Equality predicates for collection items
//!
//! Two items are "the same entry" when they describe the same logical grant,
//! regardless of ids or bookkeeping fields assigned by the remote side.
//!
//! Implementations must behave as an equivalence relation (reflexive,
//! symmetric, transitive). The set operations do not detect a predicate that
//! breaks this; with overlapping matches the first match wins.

/// Identity of a collection item for reconciliation purposes.
pub trait SameEntry {
    /// Whether `self` and `other` represent the same logical entry.
    fn same_entry(&self, other: &Self) -> bool;
}

impl SameEntry for String {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }
}

impl SameEntry for i64 {
    fn same_entry(&self, other: &Self) -> bool {
        self == other
    }
}

/// Closure form of [`SameEntry`] for the `set_ops` functions.
pub fn same_entry<T: SameEntry>(a: &T, b: &T) -> bool {
    a.same_entry(b)
}

/// Compare optional multi-value fields as sets.
///
/// An absent field equals an explicitly empty one; order and duplicates are
/// ignored.
pub fn optional_set_eq<S: PartialEq>(a: Option<&[S]>, b: Option<&[S]>) -> bool {
    let a = a.unwrap_or_default();
    let b = b.unwrap_or_default();

    a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}
