//! Predicate-based set algebra over plain slices
//!
//! Items are compared with a caller-supplied equality closure rather than
//! `PartialEq` or hashing, so every operation is a pairwise O(n·m) scan.
//! Output order always follows input order. When an item matches several
//! candidates the first match wins.

/// Items of each side that have no match on the other side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference<T> {
    /// Items of `a` with no match in `b`
    pub only_in_a: Vec<T>,
    /// Items of `b` with no match in `a`
    pub only_in_b: Vec<T>,
}

impl<T> Default for Difference<T> {
    fn default() -> Self {
        Self {
            only_in_a: Vec::new(),
            only_in_b: Vec::new(),
        }
    }
}

fn contains_by<T, F>(haystack: &[T], needle: &T, eq: &F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    haystack.iter().any(|candidate| eq(needle, candidate))
}

/// Compute the two one-sided differences of `a` and `b`.
pub fn difference_by<T, F>(a: &[T], b: &[T], eq: F) -> Difference<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let only_in_a = a
        .iter()
        .filter(|item| !contains_by(b, item, &eq))
        .cloned()
        .collect();

    let only_in_b = b
        .iter()
        .filter(|item| !a.iter().any(|candidate| eq(candidate, item)))
        .cloned()
        .collect();

    Difference {
        only_in_a,
        only_in_b,
    }
}

/// All of `a`, followed by the items of `b` that have no match in `a`.
///
/// Duplicates inside a single input are kept as they are.
pub fn union_by<T, F>(a: &[T], b: &[T], eq: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let mut combined = a.to_vec();
    combined.extend(
        b.iter()
            .filter(|item| !a.iter().any(|candidate| eq(candidate, item)))
            .cloned(),
    );
    combined
}

/// Items of `a` that have at least one match in `b`.
pub fn intersect_by<T, F>(a: &[T], b: &[T], eq: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    a.iter()
        .filter(|item| contains_by(b, item, &eq))
        .cloned()
        .collect()
}
