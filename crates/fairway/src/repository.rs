//! Aggregate store over a single sorted table.
//!
//! Writes are one `put_item` each; reads are one partition query or one
//! child-index query. Nothing is retried and nothing is rolled back: a
//! parent written before a failed child write stays written.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use fairway_core::identity::{IdentitySource, SystemIdentity};
use fairway_core::model::{ChildEntity, Entity, ParentEntity, RootEntity, User};
use fairway_core::storage::{
    decode, decode_list, email_lookup_record, encode_record, item_keys, item_to_email_lookup,
    keys, EncodingError, Item, OrderedStore, Result, StoreError, PK_ATTR,
};

/// A parent entity together with the children stored in its partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<P, C> {
    pub parent: P,
    pub children: Vec<C>,
}

/// Reads and writes typed aggregates through an [`OrderedStore`].
///
/// Holds no state besides its dependencies, so it can be shared freely
/// across tasks when `S` is.
#[derive(Clone)]
pub struct AggregateStore<S> {
    store: S,
    identity: Arc<dyn IdentitySource>,
}

impl<S: OrderedStore> AggregateStore<S> {
    /// Creates a store that stamps entities with UUIDv7 ids and the system clock.
    pub fn new(store: S) -> Self {
        Self::with_identity(store, SystemIdentity)
    }

    /// Creates a store with a custom identity source.
    pub fn with_identity(store: S, identity: impl IdentitySource + 'static) -> Self {
        Self {
            store,
            identity: Arc::new(identity),
        }
    }

    /// Returns the underlying ordered store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Stamps a new root entity and writes it as its partition's metadata record.
    pub async fn add_parent<P: RootEntity>(&self, mut parent: P) -> Result<P> {
        self.stamp(&mut parent);
        self.save_parent(&parent).await?;
        Ok(parent)
    }

    /// Stamps a new child and writes it into its parent's partition.
    pub async fn add_child<C: ChildEntity>(&self, parent_id: Uuid, mut child: C) -> Result<C> {
        self.stamp(&mut child);
        child.attach(parent_id);
        self.save_child(parent_id, &child).await?;
        Ok(child)
    }

    /// Writes a root entity as-is, replacing any record with the same id.
    pub async fn save_parent<P: RootEntity>(&self, parent: &P) -> Result<()> {
        let partition_key = keys::partition_key(P::TYPE, parent.id());
        self.put(parent, partition_key, keys::metadata_sort_key().to_string())
            .await
    }

    /// Writes a child as-is, replacing any record with the same id.
    ///
    /// This is the update path: callers overwrite the full record, e.g. to
    /// move an order to a new status. Last writer wins.
    pub async fn save_child<C: ChildEntity>(&self, parent_id: Uuid, child: &C) -> Result<()> {
        let partition_key = keys::partition_key(<C::Parent as Entity>::TYPE, parent_id);
        let sort_key = keys::sort_key(C::TYPE, child.id());
        self.put(child, partition_key, sort_key).await
    }

    /// Stamps a new user and writes it together with its email lookup record.
    ///
    /// The user record is written first. If the lookup write fails the user
    /// exists but is not findable by email.
    pub async fn add_user(&self, user: User) -> Result<User> {
        let user = self.add_parent(user).await?;
        self.save_email_lookup(&user).await?;
        Ok(user)
    }

    /// Writes a user as-is and points the lookup for its email at it.
    ///
    /// A lookup for a previous email is left behind; [`Self::get_user_by_email`]
    /// ignores lookups whose user no longer carries that email.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        self.save_parent(user).await?;
        self.save_email_lookup(user).await
    }

    async fn save_email_lookup(&self, user: &User) -> Result<()> {
        let item = email_lookup_record(&user.email, user.id);

        debug!(email = %user.email, user_id = %user.id, "Writing email lookup");

        self.store.put_item(item).await?;
        Ok(())
    }

    fn stamp<E: Entity>(&self, entity: &mut E) {
        entity.stamp(self.identity.new_id(), self.identity.now());
    }

    async fn put<E: Entity>(&self, entity: &E, partition_key: String, sort_key: String) -> Result<()> {
        debug!(
            entity_type = %E::TYPE,
            pk = %partition_key,
            sk = %sort_key,
            "Writing record"
        );

        let item = encode_record(entity, partition_key, sort_key)?;
        self.store.put_item(item).await?;
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Reads a root entity and all of its children with one partition query.
    ///
    /// Returns `Ok(None)` when the partition holds no records.
    pub async fn get_aggregate<P: RootEntity>(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<Aggregate<P, P::Child>>> {
        let partition_key = keys::partition_key(P::TYPE, parent_id);
        let items = self.store.query_partition(&partition_key).await?;

        debug!(pk = %partition_key, count = items.len(), "Read partition");

        let Some((metadata, children)) = items.split_first() else {
            return Ok(None);
        };

        // The sentinel sorts first, so anything else at index 0 means the
        // parent record is missing.
        let sort_key = item_keys(metadata).map(|(_, sk)| sk);
        if sort_key != Some(keys::metadata_sort_key()) {
            return Err(EncodingError::MissingMetadata { partition_key }.into());
        }

        Ok(Some(Aggregate {
            parent: decode(metadata)?,
            children: decode_list(children)?,
        }))
    }

    /// Looks a child up by its own id, without knowing its parent.
    ///
    /// Returns `Ok(None)` when no record carries the child's sort key. If the
    /// same id was saved under several parents, the record in the partition
    /// with the lowest key is returned.
    ///
    /// Goes through the child index, which DynamoDB keeps eventually
    /// consistent: right after [`Self::add_child`] this may still return
    /// `Ok(None)`. Only the in-memory store reads its own writes here.
    pub async fn get_child<C: ChildEntity>(&self, child_id: Uuid) -> Result<Option<C>> {
        let items = self.find_child_records::<C>(child_id).await?;

        if items.len() > 1 {
            debug!(
                entity_type = %C::TYPE,
                id = %child_id,
                count = items.len(),
                "Child id found under several parents, using the first"
            );
        }

        match items.first() {
            Some(item) => Ok(Some(decode(item)?)),
            None => Ok(None),
        }
    }

    /// Returns the id of the parent whose partition holds the given child.
    ///
    /// Same index and consistency as [`Self::get_child`].
    pub async fn get_parent_id<C: ChildEntity>(&self, child_id: Uuid) -> Result<Option<Uuid>> {
        let items = self.find_child_records::<C>(child_id).await?;
        let Some(item) = items.first() else {
            return Ok(None);
        };

        let (partition_key, _) = item_keys(item).ok_or(StoreError::InvalidKey(PK_ATTR))?;
        match keys::parse_key(partition_key) {
            Some((entity_type, id)) if entity_type == <C::Parent as Entity>::TYPE => Ok(Some(id)),
            _ => Err(EncodingError::InvalidField {
                field: PK_ATTR.to_string(),
                reason: format!("not a {} key: {}", <C::Parent as Entity>::TYPE, partition_key),
            }
            .into()),
        }
    }

    /// Reads the children of one type stored in a parent's partition, in
    /// sort-key order. The parent's own record is skipped.
    pub async fn get_children<C: ChildEntity>(&self, parent_id: Uuid) -> Result<Vec<C>> {
        let partition_key = keys::partition_key(<C::Parent as Entity>::TYPE, parent_id);
        let prefix = keys::child_sort_key_prefix(C::TYPE);
        let items = self.store.query_partition(&partition_key).await?;

        debug!(pk = %partition_key, count = items.len(), "Read partition");

        items
            .iter()
            .filter(|item| item_keys(item).is_some_and(|(_, sk)| sk.starts_with(prefix)))
            .map(|item| decode::<C>(item).map_err(Into::into))
            .collect()
    }

    /// Reads a parent that is itself stored as a child (an order) together
    /// with the children of its own partition (its items).
    ///
    /// Issues two queries: the child index for the parent, then its
    /// partition for the children.
    pub async fn get_nested_aggregate<P>(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<Aggregate<P, P::Child>>>
    where
        P: ParentEntity + ChildEntity,
    {
        let Some(parent) = self.get_child::<P>(parent_id).await? else {
            return Ok(None);
        };
        let children = self.get_children::<P::Child>(parent_id).await?;

        Ok(Some(Aggregate { parent, children }))
    }

    /// Looks a user up by exact email address.
    ///
    /// Reads the `EMAIL#` lookup record, then the user's metadata record.
    /// Both are primary-key reads, so no index is involved. Returns
    /// `Ok(None)` when no lookup exists or the user it names no longer has
    /// that email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let lookup_key = keys::email_partition_key(email);
        let Some(lookup) = self
            .store
            .get_item(&lookup_key, keys::metadata_sort_key())
            .await?
        else {
            return Ok(None);
        };

        let user_id = item_to_email_lookup(&lookup)?;
        let partition_key = keys::partition_key(User::TYPE, user_id);

        debug!(pk = %lookup_key, user_id = %user_id, "Resolved email lookup");

        let Some(metadata) = self
            .store
            .get_item(&partition_key, keys::metadata_sort_key())
            .await?
        else {
            return Ok(None);
        };

        let user: User = decode(&metadata)?;
        Ok((user.email == email).then_some(user))
    }

    async fn find_child_records<C: ChildEntity>(&self, child_id: Uuid) -> Result<Vec<Item>> {
        let sort_key = keys::sort_key(C::TYPE, child_id);
        let items = self.store.query_inverted(&sort_key).await?;

        debug!(sk = %sort_key, count = items.len(), "Read child index");

        Ok(items)
    }
}
