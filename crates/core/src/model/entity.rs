use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{EncodingError, Item};

use super::{Order, OrderItem, Product, ProductOption, User};

/// Discriminator stored on every record under the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    ProductOption,
    User,
    Order,
    OrderItem,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Product,
        EntityType::ProductOption,
        EntityType::User,
        EntityType::Order,
        EntityType::OrderItem,
    ];

    /// Returns the stored discriminator value.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Product => "product",
            EntityType::ProductOption => "product_option",
            EntityType::User => "user",
            EntityType::Order => "order",
            EntityType::OrderItem => "order_item",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EncodingError::UnknownEntityType(s.to_string()))
    }
}

/// A typed entity that can be stored in the shared table.
///
/// `to_item` produces the payload attributes only. Keys and the
/// discriminator are grafted on by [`crate::storage::encode_record`].
pub trait Entity: Clone + Send + Sync + Sized + 'static {
    const TYPE: EntityType;

    fn id(&self) -> Uuid;

    /// Assigns the identity and creation time chosen at write time.
    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>);

    /// Fails when a field has no stored representation, e.g. a NaN number.
    fn to_item(&self) -> Result<Item, EncodingError>;

    fn into_record(self) -> EntityRecord;

    /// Narrows a decoded record to this type, `None` for any other variant.
    fn from_record(record: EntityRecord) -> Option<Self>;
}

/// An entity that owns a partition of children.
pub trait ParentEntity: Entity {
    type Child: ChildEntity<Parent = Self>;
}

/// A parent whose own record lives in its partition under the metadata
/// sentinel, so a single range read yields the whole aggregate.
pub trait RootEntity: ParentEntity {}

/// An entity stored inside its parent's partition.
pub trait ChildEntity: Entity {
    type Parent: ParentEntity;

    /// Records the owning parent on the child payload, if it carries one.
    fn attach(&mut self, _parent_id: Uuid) {}
}

/// Tagged union over every entity kind stored in the table.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Product(Product),
    ProductOption(ProductOption),
    User(User),
    Order(Order),
    OrderItem(OrderItem),
}

impl EntityRecord {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityRecord::Product(_) => EntityType::Product,
            EntityRecord::ProductOption(_) => EntityType::ProductOption,
            EntityRecord::User(_) => EntityType::User,
            EntityRecord::Order(_) => EntityType::Order,
            EntityRecord::OrderItem(_) => EntityType::OrderItem,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            EntityRecord::Product(p) => p.id,
            EntityRecord::ProductOption(o) => o.id,
            EntityRecord::User(u) => u.id,
            EntityRecord::Order(o) => o.id,
            EntityRecord::OrderItem(i) => i.id,
        }
    }
}
