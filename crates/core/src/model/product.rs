use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::{option_to_item, product_to_item, EncodingError, Item};

use super::{ChildEntity, Entity, EntityRecord, EntityType, ParentEntity, RootEntity};

/// A catalog product. Its options are stored in the same partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[serde(rename = "createdUtc")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in minor currency units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    /// Shipping weight in grams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "thumbNail", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Product {
    /// Creates an unsaved product. Identity is assigned when it is stored.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// A purchasable variant of a product (size, shaft, socket, color).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: Uuid,
    #[serde(rename = "createdUtc")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft_stiffness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ProductOption {
    /// Creates an option with only its size set.
    pub fn sized(size: impl Into<String>) -> Self {
        Self {
            size: Some(size.into()),
            ..Default::default()
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_shaft_stiffness(mut self, stiffness: f64) -> Self {
        self.shaft_stiffness = Some(stiffness);
        self
    }

    pub fn with_socket(mut self, socket: impl Into<String>) -> Self {
        self.socket = Some(socket.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Entity for Product {
    const TYPE: EntityType = EntityType::Product;

    fn id(&self) -> Uuid {
        self.id
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn to_item(&self) -> Result<Item, EncodingError> {
        product_to_item(self)
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::Product(self)
    }

    fn from_record(record: EntityRecord) -> Option<Self> {
        match record {
            EntityRecord::Product(product) => Some(product),
            _ => None,
        }
    }
}

impl ParentEntity for Product {
    type Child = ProductOption;
}

impl RootEntity for Product {}

impl Entity for ProductOption {
    const TYPE: EntityType = EntityType::ProductOption;

    fn id(&self) -> Uuid {
        self.id
    }

    fn stamp(&mut self, id: Uuid, created_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
    }

    fn to_item(&self) -> Result<Item, EncodingError> {
        option_to_item(self)
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::ProductOption(self)
    }

    fn from_record(record: EntityRecord) -> Option<Self> {
        match record {
            EntityRecord::ProductOption(option) => Some(option),
            _ => None,
        }
    }
}

impl ChildEntity for ProductOption {
    type Parent = Product;
}
