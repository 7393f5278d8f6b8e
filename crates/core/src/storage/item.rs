//! Attribute-map representation of stored records.
//!
//! Mirrors the DynamoDB data model closely enough that a backend can convert
//! one-to-one, while keeping this crate free of any SDK dependency.

use std::collections::HashMap;

/// Partition key attribute.
pub const PK_ATTR: &str = "PK";
/// Sort key attribute.
pub const SK_ATTR: &str = "SK";
/// Hash key of the sparse child index. Present on child records only.
pub const INDEX_KEY_ATTR: &str = "GSI1PK";
/// Entity discriminator attribute.
pub const TYPE_ATTR: &str = "type";

/// A single stored record.
pub type Item = HashMap<String, AttributeValue>;

/// A stored attribute value.
///
/// Numbers are kept as their decimal string form, as DynamoDB does, so no
/// precision is lost between encode and decode.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    L(Vec<AttributeValue>),
    M(HashMap<String, AttributeValue>),
    Null(bool),
}

impl AttributeValue {
    pub fn as_s(&self) -> Result<&String, &AttributeValue> {
        match self {
            AttributeValue::S(s) => Ok(s),
            other => Err(other),
        }
    }

    pub fn as_n(&self) -> Result<&String, &AttributeValue> {
        match self {
            AttributeValue::N(n) => Ok(n),
            other => Err(other),
        }
    }

    pub fn as_bool(&self) -> Result<&bool, &AttributeValue> {
        match self {
            AttributeValue::Bool(b) => Ok(b),
            other => Err(other),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::L(_) => "L",
            AttributeValue::M(_) => "M",
            AttributeValue::Null(_) => "NULL",
        }
    }
}

/// Returns the `(PK, SK)` pair of an item when both are string attributes.
pub fn item_keys(item: &Item) -> Option<(&str, &str)> {
    let pk = item.get(PK_ATTR)?.as_s().ok()?;
    let sk = item.get(SK_ATTR)?.as_s().ok()?;
    Some((pk.as_str(), sk.as_str()))
}
