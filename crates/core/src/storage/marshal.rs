//! Attribute map conversion functions.
//!
//! Pure functions for converting between [`Item`] maps and entity types.
//! Encoding is sparse: `None` fields are left out of the map instead of being
//! written as null or zero, so older records stay readable when optional
//! fields are added.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::identity::{format_timestamp, parse_timestamp};
use crate::model::{
    Entity, EntityRecord, EntityType, Order, OrderItem, OrderStatus, Product, ProductOption, User,
};

use super::error::EncodingError;
use super::item::{AttributeValue, Item, INDEX_KEY_ATTR, PK_ATTR, SK_ATTR, TYPE_ATTR};
use super::keys;

// ============================================================================
// Generic encode / decode
// ============================================================================

/// Encode an entity's payload attributes.
pub fn encode<E: Entity>(entity: &E) -> Result<Item, EncodingError> {
    entity.to_item()
}

/// Encode an entity as a storable record: payload plus the keys and the
/// discriminator, which are not part of the entity itself.
///
/// Records stored under a child sort key also get `GSI1PK`, so only
/// children are projected into the child index.
pub fn encode_record<E: Entity>(
    entity: &E,
    partition_key: impl Into<String>,
    sort_key: impl Into<String>,
) -> Result<Item, EncodingError> {
    let mut item = entity.to_item()?;
    let sort_key = sort_key.into();

    // Keys
    item.insert(
        PK_ATTR.to_string(),
        AttributeValue::S(partition_key.into()),
    );
    if sort_key != keys::METADATA_SORT_KEY {
        item.insert(
            INDEX_KEY_ATTR.to_string(),
            AttributeValue::S(sort_key.clone()),
        );
    }
    item.insert(SK_ATTR.to_string(), AttributeValue::S(sort_key));

    // Entity type
    item.insert(
        TYPE_ATTR.to_string(),
        AttributeValue::S(E::TYPE.as_str().to_string()),
    );

    Ok(item)
}

/// Decode a record into the expected entity type.
pub fn decode<E: Entity>(item: &Item) -> Result<E, EncodingError> {
    let record = EntityRecord::from_item(item)?;
    let found = record.entity_type();
    E::from_record(record).ok_or(EncodingError::TypeMismatch {
        expected: E::TYPE,
        found,
    })
}

/// Decode a list of records, failing on the first one that does not decode.
pub fn decode_list<E: Entity>(items: &[Item]) -> Result<Vec<E>, EncodingError> {
    items.iter().map(decode).collect()
}

impl EntityRecord {
    /// Decode any record by its discriminator.
    pub fn from_item(item: &Item) -> Result<Self, EncodingError> {
        let entity_type: EntityType = get_string(item, TYPE_ATTR)?.parse()?;

        match entity_type {
            EntityType::Product => item_to_product(item).map(EntityRecord::Product),
            EntityType::ProductOption => item_to_option(item).map(EntityRecord::ProductOption),
            EntityType::User => item_to_user(item).map(EntityRecord::User),
            EntityType::Order => item_to_order(item).map(EntityRecord::Order),
            EntityType::OrderItem => item_to_order_item(item).map(EntityRecord::OrderItem),
        }
    }
}

// ============================================================================
// Email lookup
// ============================================================================

/// Build the record that maps an email address to its user.
///
/// Lives in its own `EMAIL#` partition under the metadata sort key, so it is
/// neither part of an aggregate nor projected into the child index.
pub fn email_lookup_record(email: &str, user_id: Uuid) -> Item {
    let mut item = Item::new();

    item.insert(
        PK_ATTR.to_string(),
        AttributeValue::S(keys::email_partition_key(email)),
    );
    item.insert(
        SK_ATTR.to_string(),
        AttributeValue::S(keys::METADATA_SORT_KEY.to_string()),
    );
    item.insert("email".to_string(), AttributeValue::S(email.to_string()));
    item.insert("userId".to_string(), AttributeValue::S(user_id.to_string()));

    item
}

/// Read the user id out of an email lookup record.
pub fn item_to_email_lookup(item: &Item) -> Result<Uuid, EncodingError> {
    get_uuid(item, "userId")
}

// ============================================================================
// Product conversions
// ============================================================================

/// Convert a Product to its payload attributes.
pub fn product_to_item(product: &Product) -> Result<Item, EncodingError> {
    let mut item = Item::new();

    put_identity(&mut item, product.id, &product.created_at);
    item.insert("name".to_string(), AttributeValue::S(product.name.clone()));
    put_optional_string(&mut item, "description", &product.description);
    put_optional_i64(&mut item, "price", product.price);
    put_optional_i64(&mut item, "weight", product.weight);
    put_optional_string(&mut item, "image", &product.image);
    put_optional_string(&mut item, "thumbNail", &product.thumbnail);

    Ok(item)
}

/// Convert payload attributes to a Product.
pub fn item_to_product(item: &Item) -> Result<Product, EncodingError> {
    Ok(Product {
        id: get_uuid(item, "id")?,
        created_at: get_datetime(item, "createdUtc")?,
        name: get_string(item, "name")?,
        description: get_optional_string(item, "description")?,
        price: get_optional_i64(item, "price")?,
        weight: get_optional_i64(item, "weight")?,
        image: get_optional_string(item, "image")?,
        thumbnail: get_optional_string(item, "thumbNail")?,
    })
}

// ============================================================================
// Product option conversions
// ============================================================================

/// Convert a ProductOption to its payload attributes.
pub fn option_to_item(option: &ProductOption) -> Result<Item, EncodingError> {
    let mut item = Item::new();

    put_identity(&mut item, option.id, &option.created_at);
    put_optional_i64(&mut item, "stock", option.stock);
    put_optional_f64(&mut item, "shaftStiffness", option.shaft_stiffness)?;
    put_optional_string(&mut item, "size", &option.size);
    put_optional_string(&mut item, "socket", &option.socket);
    put_optional_string(&mut item, "color", &option.color);

    Ok(item)
}

/// Convert payload attributes to a ProductOption.
pub fn item_to_option(item: &Item) -> Result<ProductOption, EncodingError> {
    Ok(ProductOption {
        id: get_uuid(item, "id")?,
        created_at: get_datetime(item, "createdUtc")?,
        stock: get_optional_i64(item, "stock")?,
        shaft_stiffness: get_optional_f64(item, "shaftStiffness")?,
        size: get_optional_string(item, "size")?,
        socket: get_optional_string(item, "socket")?,
        color: get_optional_string(item, "color")?,
    })
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to its payload attributes.
pub fn user_to_item(user: &User) -> Result<Item, EncodingError> {
    let mut item = Item::new();

    put_identity(&mut item, user.id, &user.created_at);
    item.insert(
        "firstName".to_string(),
        AttributeValue::S(user.first_name.clone()),
    );
    item.insert(
        "lastName".to_string(),
        AttributeValue::S(user.last_name.clone()),
    );
    put_optional_string(&mut item, "userName", &user.user_name);
    item.insert("email".to_string(), AttributeValue::S(user.email.clone()));

    Ok(item)
}

/// Convert payload attributes to a User.
pub fn item_to_user(item: &Item) -> Result<User, EncodingError> {
    Ok(User {
        id: get_uuid(item, "id")?,
        created_at: get_datetime(item, "createdUtc")?,
        first_name: get_string(item, "firstName")?,
        last_name: get_string(item, "lastName")?,
        user_name: get_optional_string(item, "userName")?,
        email: get_string(item, "email")?,
    })
}

// ============================================================================
// Order conversions
// ============================================================================

/// Convert an Order to its payload attributes.
pub fn order_to_item(order: &Order) -> Result<Item, EncodingError> {
    let mut item = Item::new();

    put_identity(&mut item, order.id, &order.created_at);
    item.insert(
        "userId".to_string(),
        AttributeValue::S(order.user_id.to_string()),
    );
    item.insert(
        "shippingAddress".to_string(),
        AttributeValue::S(order.shipping_address.clone()),
    );
    item.insert(
        "totalAmount".to_string(),
        AttributeValue::N(order.total_amount.to_string()),
    );
    item.insert(
        "status".to_string(),
        AttributeValue::S(status_to_string(&order.status).to_string()),
    );

    Ok(item)
}

/// Convert payload attributes to an Order.
pub fn item_to_order(item: &Item) -> Result<Order, EncodingError> {
    Ok(Order {
        id: get_uuid(item, "id")?,
        created_at: get_datetime(item, "createdUtc")?,
        user_id: get_uuid(item, "userId")?,
        shipping_address: get_string(item, "shippingAddress")?,
        total_amount: get_i64(item, "totalAmount")?,
        status: parse_status(&get_string(item, "status")?)?,
    })
}

// ============================================================================
// Order item conversions
// ============================================================================

/// Convert an OrderItem to its payload attributes.
pub fn order_item_to_item(order_item: &OrderItem) -> Result<Item, EncodingError> {
    let mut item = Item::new();

    put_identity(&mut item, order_item.id, &order_item.created_at);
    item.insert(
        "orderId".to_string(),
        AttributeValue::S(order_item.order_id.to_string()),
    );
    item.insert(
        "productId".to_string(),
        AttributeValue::S(order_item.product_id.to_string()),
    );
    if let Some(option_id) = order_item.option_id {
        item.insert(
            "optionId".to_string(),
            AttributeValue::S(option_id.to_string()),
        );
    }
    item.insert(
        "quantity".to_string(),
        AttributeValue::N(order_item.quantity.to_string()),
    );
    item.insert(
        "unitPrice".to_string(),
        AttributeValue::N(order_item.unit_price.to_string()),
    );

    Ok(item)
}

/// Convert payload attributes to an OrderItem.
pub fn item_to_order_item(item: &Item) -> Result<OrderItem, EncodingError> {
    let quantity = get_i64(item, "quantity")?;
    let quantity = u32::try_from(quantity).map_err(|e| EncodingError::InvalidField {
        field: "quantity".to_string(),
        reason: e.to_string(),
    })?;

    Ok(OrderItem {
        id: get_uuid(item, "id")?,
        created_at: get_datetime(item, "createdUtc")?,
        order_id: get_uuid(item, "orderId")?,
        product_id: get_uuid(item, "productId")?,
        option_id: get_optional_string(item, "optionId")?
            .map(|s| parse_uuid("optionId", &s))
            .transpose()?,
        quantity,
        unit_price: get_i64(item, "unitPrice")?,
    })
}

// ============================================================================
// Status conversions
// ============================================================================

/// Convert OrderStatus to string.
pub fn status_to_string(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Paid => "paid",
        OrderStatus::Shipped => "shipped",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

/// Parse OrderStatus from string.
pub fn parse_status(s: &str) -> Result<OrderStatus, EncodingError> {
    match s.to_lowercase().as_str() {
        "pending" => Ok(OrderStatus::Pending),
        "paid" => Ok(OrderStatus::Paid),
        "shipped" => Ok(OrderStatus::Shipped),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(EncodingError::InvalidField {
            field: "status".to_string(),
            reason: format!("unknown order status {}", s),
        }),
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn put_identity(item: &mut Item, id: Uuid, created_at: &DateTime<Utc>) {
    item.insert("id".to_string(), AttributeValue::S(id.to_string()));
    item.insert(
        "createdUtc".to_string(),
        AttributeValue::S(format_timestamp(created_at)),
    );
}

fn put_optional_string(item: &mut Item, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::S(value.clone()));
    }
}

fn put_optional_i64(item: &mut Item, key: &str, value: Option<i64>) {
    if let Some(value) = value {
        item.insert(key.to_string(), AttributeValue::N(value.to_string()));
    }
}

/// DynamoDB numbers have no NaN or infinity, so those are rejected here
/// rather than by the store.
fn put_optional_f64(item: &mut Item, key: &str, value: Option<f64>) -> Result<(), EncodingError> {
    if let Some(value) = value {
        if !value.is_finite() {
            return Err(invalid(key, format!("not a finite number: {}", value)));
        }
        item.insert(key.to_string(), AttributeValue::N(value.to_string()));
    }
    Ok(())
}

fn invalid(key: &str, reason: impl Into<String>) -> EncodingError {
    EncodingError::InvalidField {
        field: key.to_string(),
        reason: reason.into(),
    }
}

/// Get an optional string attribute. Present with another kind is an error.
fn get_optional_string(item: &Item, key: &str) -> Result<Option<String>, EncodingError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_s()
            .map(|s| Some(s.clone()))
            .map_err(|other| invalid(key, format!("expected S, found {}", other.kind()))),
    }
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, EncodingError> {
    get_optional_string(item, key)?.ok_or_else(|| EncodingError::MissingField(key.to_string()))
}

/// Get an optional number attribute in its decimal string form.
fn get_optional_number<'a>(item: &'a Item, key: &str) -> Result<Option<&'a str>, EncodingError> {
    match item.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_n()
            .map(|n| Some(n.as_str()))
            .map_err(|other| invalid(key, format!("expected N, found {}", other.kind()))),
    }
}

fn get_optional_i64(item: &Item, key: &str) -> Result<Option<i64>, EncodingError> {
    get_optional_number(item, key)?
        .map(|n| n.parse::<i64>().map_err(|e| invalid(key, e.to_string())))
        .transpose()
}

fn get_i64(item: &Item, key: &str) -> Result<i64, EncodingError> {
    get_optional_i64(item, key)?.ok_or_else(|| EncodingError::MissingField(key.to_string()))
}

fn get_optional_f64(item: &Item, key: &str) -> Result<Option<f64>, EncodingError> {
    get_optional_number(item, key)?
        .map(|n| n.parse::<f64>().map_err(|e| invalid(key, e.to_string())))
        .transpose()
}

fn parse_uuid(key: &str, s: &str) -> Result<Uuid, EncodingError> {
    Uuid::parse_str(s).map_err(|e| invalid(key, format!("invalid UUID: {}", e)))
}

/// Get a required UUID attribute.
fn get_uuid(item: &Item, key: &str) -> Result<Uuid, EncodingError> {
    parse_uuid(key, &get_string(item, key)?)
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, EncodingError> {
    let s = get_string(item, key)?;
    parse_timestamp(&s).map_err(|e| invalid(key, format!("invalid datetime: {}", e)))
}
