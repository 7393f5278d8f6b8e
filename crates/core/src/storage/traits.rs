use std::sync::Arc;

use async_trait::async_trait;

use super::{Item, StoreError};

/// A sorted key-value table addressed by `(PK, SK)`.
///
/// Every item handed to or returned by a store carries string `PK` and `SK`
/// attributes. Implementations surface their own failures verbatim and do
/// not retry.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    /// Unconditionally writes an item, replacing any item with the same keys.
    async fn put_item(&self, item: Item) -> Result<(), StoreError>;

    /// Returns the item stored under exactly `(partition_key, sort_key)`.
    async fn get_item(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Item>, StoreError>;

    /// Returns every item of a partition in ascending sort-key order.
    async fn query_partition(&self, partition_key: &str) -> Result<Vec<Item>, StoreError>;

    /// Returns every child record stored under `sort_key`, across partitions,
    /// ordered by partition key.
    ///
    /// Backed by a sparse index keyed on `GSI1PK` (range key `PK`). Only
    /// items carrying `GSI1PK` are indexed, so metadata records never match.
    async fn query_inverted(&self, sort_key: &str) -> Result<Vec<Item>, StoreError>;
}

#[async_trait]
impl<S: OrderedStore + ?Sized> OrderedStore for Arc<S> {
    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        (**self).put_item(item).await
    }

    async fn get_item(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Item>, StoreError> {
        (**self).get_item(partition_key, sort_key).await
    }

    async fn query_partition(&self, partition_key: &str) -> Result<Vec<Item>, StoreError> {
        (**self).query_partition(partition_key).await
    }

    async fn query_inverted(&self, sort_key: &str) -> Result<Vec<Item>, StoreError> {
        (**self).query_inverted(sort_key).await
    }
}
