//! In-memory ordered store implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fairway_core::storage::{Item, OrderedStore, StoreError, INDEX_KEY_ATTR, PK_ATTR, SK_ATTR};

/// Primary table keyed by `(PK, SK)` plus the sparse child index
/// `(GSI1PK, PK, SK)`.
#[derive(Debug, Default)]
struct Tables {
    primary: BTreeMap<(String, String), Item>,
    inverted: BTreeSet<(String, String, String)>,
}

/// In-memory storage backend for testing.
///
/// Clones share the same tables. A write takes the lock once for both the
/// table and the index, so readers never see one without the other, and
/// reads always observe completed writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored items.
    pub async fn item_count(&self) -> usize {
        self.tables.read().await.primary.len()
    }

    /// Returns the number of items projected into the child index.
    pub async fn index_count(&self) -> usize {
        self.tables.read().await.inverted.len()
    }
}

fn key_attr(item: &Item, name: &'static str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or(StoreError::InvalidKey(name))
}

/// The index key, if the item is indexed at all.
fn index_key(item: &Item) -> Option<String> {
    item.get(INDEX_KEY_ATTR)
        .and_then(|value| value.as_s().ok())
        .cloned()
}

#[async_trait]
impl OrderedStore for InMemoryStore {
    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let pk = key_attr(&item, PK_ATTR)?;
        let sk = key_attr(&item, SK_ATTR)?;
        let new_index_key = index_key(&item);

        let mut tables = self.tables.write().await;
        let Tables { primary, inverted } = &mut *tables;

        if let Some(old_index_key) = primary.get(&(pk.clone(), sk.clone())).and_then(index_key) {
            inverted.remove(&(old_index_key, pk.clone(), sk.clone()));
        }
        if let Some(index_key) = new_index_key {
            inverted.insert((index_key, pk.clone(), sk.clone()));
        }
        primary.insert((pk, sk), item);
        Ok(())
    }

    async fn get_item(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Item>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .primary
            .get(&(partition_key.to_string(), sort_key.to_string()))
            .cloned())
    }

    async fn query_partition(&self, partition_key: &str) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .primary
            .range((partition_key.to_string(), String::new())..)
            .take_while(|((pk, _), _)| pk == partition_key)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn query_inverted(&self, sort_key: &str) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .inverted
            .range((sort_key.to_string(), String::new(), String::new())..)
            .take_while(|(index_key, _, _)| index_key == sort_key)
            .filter_map(|(_, pk, sk)| tables.primary.get(&(pk.clone(), sk.clone())))
            .cloned()
            .collect())
    }
}
