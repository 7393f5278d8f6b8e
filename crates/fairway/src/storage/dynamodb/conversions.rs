//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between SDK `AttributeValue` maps and the
//! SDK-free [`Item`] representation. Testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use fairway_core::storage::{AttributeValue, Item, StoreError};

/// An item as the SDK sends and receives it.
pub type SdkItem = HashMap<String, SdkValue>;

// ============================================================================
// Outbound
// ============================================================================

/// Convert an item to its SDK representation.
pub fn to_sdk_item(item: Item) -> SdkItem {
    item.into_iter()
        .map(|(name, value)| (name, to_sdk_value(value)))
        .collect()
}

fn to_sdk_value(value: AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(s) => SdkValue::S(s),
        AttributeValue::N(n) => SdkValue::N(n),
        AttributeValue::Bool(b) => SdkValue::Bool(b),
        AttributeValue::L(values) => SdkValue::L(values.into_iter().map(to_sdk_value).collect()),
        AttributeValue::M(map) => SdkValue::M(to_sdk_item(map)),
        AttributeValue::Null(n) => SdkValue::Null(n),
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// Convert an SDK item back to an [`Item`].
///
/// Binary and set attributes are never written by this crate, so finding
/// one means the table holds foreign data.
pub fn from_sdk_item(item: SdkItem) -> Result<Item, StoreError> {
    item.into_iter()
        .map(|(name, value)| {
            let value = from_sdk_value(&name, value)?;
            Ok((name, value))
        })
        .collect()
}

fn from_sdk_value(name: &str, value: SdkValue) -> Result<AttributeValue, StoreError> {
    match value {
        SdkValue::S(s) => Ok(AttributeValue::S(s)),
        SdkValue::N(n) => Ok(AttributeValue::N(n)),
        SdkValue::Bool(b) => Ok(AttributeValue::Bool(b)),
        SdkValue::L(values) => values
            .into_iter()
            .map(|v| from_sdk_value(name, v))
            .collect::<Result<Vec<_>, _>>()
            .map(AttributeValue::L),
        SdkValue::M(map) => from_sdk_item(map).map(AttributeValue::M),
        SdkValue::Null(n) => Ok(AttributeValue::Null(n)),
        other => Err(StoreError::QueryFailed(format!(
            "Unsupported attribute type for {}: {:?}",
            name, other
        ))),
    }
}
