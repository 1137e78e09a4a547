//! Remote collection accessor trait

use std::fmt;

use async_trait::async_trait;

use super::predicate::SameEntry;
use crate::error::{ApiError, Result};

/// A collection stored remotely and shared by every caller that uses the same key.
///
/// `replace` must overwrite the whole collection; the reconciler relies on
/// this and never sends a partial update.
#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Identity of the parent entity owning the collection
    type Key: fmt::Display + Send + Sync;

    /// One entry of the collection
    type Item: SameEntry + Clone + fmt::Debug + Send + Sync;

    /// Fetch the full collection.
    ///
    /// Returns `ApiError::NotFound` when the parent entity does not exist.
    async fn fetch(&self, key: &Self::Key) -> Result<Vec<Self::Item>>;

    /// Overwrite the full collection, returning what the remote now stores.
    async fn replace(&self, key: &Self::Key, items: Vec<Self::Item>) -> Result<Vec<Self::Item>>;

    /// Create the parent entity holding `items`.
    ///
    /// Kinds whose parent is owned elsewhere keep the default, which reports
    /// the parent as missing.
    async fn provision(
        &self,
        key: &Self::Key,
        _items: Vec<Self::Item>,
    ) -> Result<Vec<Self::Item>> {
        Err(ApiError::NotFound(key.to_string()).into())
    }

    /// End the parent entity's lifecycle once no caller has items left in it.
    ///
    /// The default keeps the parent and writes an empty collection.
    async fn retire(&self, key: &Self::Key) -> Result<()> {
        self.replace(key, Vec::new()).await.map(|_| ())
    }
}
