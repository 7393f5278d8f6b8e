use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{order_item_to_item, order_to_item, user_to_item, EncodingError, Item};

use super::{ChildEntity, Entity, EntityRecord, EntityType, ParentEntity, RootEntity};

/// A customer account. Orders are stored in the user's partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "createdUtc")]
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub email: String,
}

impl User {
    /// Creates an unsaved user. Identity is assigned when it is stored.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

/// An order placed by a user.
///
/// Stored as a child of its user and addressable by its own id through the
/// inverted index. Its items live in a partition keyed by the order id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "createdUtc")]
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub shipping_address: String,
    /// Order total in minor currency units.
    pub total_amount: i64,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(shipping_address: impl Into<String>, total_amount: i64) -> Self {
        Self {
            shipping_address: shipping_address.into(),
            total_amount,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }
}

/// A line of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    #[serde(rename = "createdUtc")]
    pub created_at: DateTime<Utc>,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_id: Option<Uuid>,
    pub quantity: u32,
    /// Price per unit in minor currency units.
    pub unit_price: i64,
}

impl OrderItem {
    pub fn new(product_id: Uuid, quantity: u32, unit_price: i64) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
            ..Default::default()
        }
    }

    pub fn with_option(mut self, option_id: Uuid) -> Self {
        self.option_id = Some(option_id);
        self
    }

    /// Line total in minor currency units, saturating at the `i64` bounds.
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }
}

impl Entity for User {
    const TYPE: EntityType = EntityType::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn to_item(&self) -> Result<Item, EncodingError> {
        user_to_item(self)
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::User(self)
    }

    fn from_record(record: EntityRecord) -> Option<Self> {
        match record {
            EntityRecord::User(user) => Some(user),
            _ => None,
        }
    }
}

impl ParentEntity for User {
    type Child = Order;
}

impl RootEntity for User {}

impl Entity for Order {
    const TYPE: EntityType = EntityType::Order;

    fn id(&self) -> Uuid {
        self.id
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn to_item(&self) -> Result<Item, EncodingError> {
        order_to_item(self)
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::Order(self)
    }

    fn from_record(record: EntityRecord) -> Option<Self> {
        match record {
            EntityRecord::Order(order) => Some(order),
            _ => None,
        }
    }
}

impl ChildEntity for Order {
    type Parent = User;

    fn attach(&mut self, parent_id: Uuid) {
        self.user_id = parent_id;
    }
}

impl ParentEntity for Order {
    type Child = OrderItem;
}

impl Entity for OrderItem {
    const TYPE: EntityType = EntityType::OrderItem;

    fn id(&self) -> Uuid {
        self.id
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn to_item(&self) -> Result<Item, EncodingError> {
        order_item_to_item(self)
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::OrderItem(self)
    }

    fn from_record(record: EntityRecord) -> Option<Self> {
        match record {
            EntityRecord::OrderItem(item) => Some(item),
            _ => None,
        }
    }
}

impl ChildEntity for OrderItem {
    type Parent = Order;

    fn attach(&mut self, parent_id: Uuid) {
        self.order_id = parent_id;
    }
}
