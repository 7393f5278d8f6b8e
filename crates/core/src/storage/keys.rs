//! Composite key generation for the single-table layout.
//!
//! Pure functions, no side effects. A parent and all of its children share a
//! partition key; the sort key distinguishes the parent's own record (the
//! metadata sentinel) from its children.
//!
//! | Record          | PK                   | SK                 |
//! |-----------------|----------------------|--------------------|
//! | Product         | `PRODUCT#<product>`  | `METADATA#`        |
//! | Product option  | `PRODUCT#<product>`  | `OPTION#<option>`  |
//! | User            | `USER#<user>`        | `METADATA#`        |
//! | Order           | `USER#<user>`        | `ORDER#<order>`    |
//! | Order item      | `ORDER#<order>`      | `ITEM#<item>`      |
//! | Email lookup    | `EMAIL#<email>`      | `METADATA#`        |
//!
//! Child records also carry their sort key under `GSI1PK`, the hash key of
//! the sparse child index. Metadata records never do.

use uuid::Uuid;

use crate::model::EntityType;

// ============================================================================
// Key prefixes
// ============================================================================

pub const KEY_DELIMITER: char = '#';

pub const PRODUCT_PREFIX: &str = "PRODUCT#";
pub const OPTION_PREFIX: &str = "OPTION#";
pub const USER_PREFIX: &str = "USER#";
pub const ORDER_PREFIX: &str = "ORDER#";
pub const ITEM_PREFIX: &str = "ITEM#";
pub const EMAIL_PREFIX: &str = "EMAIL#";

/// Sort key of a root parent's own record. Sorts before every child prefix
/// that shares a partition with metadata.
pub const METADATA_SORT_KEY: &str = "METADATA#";

/// Returns the key prefix for an entity type.
pub fn entity_prefix(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Product => PRODUCT_PREFIX,
        EntityType::ProductOption => OPTION_PREFIX,
        EntityType::User => USER_PREFIX,
        EntityType::Order => ORDER_PREFIX,
        EntityType::OrderItem => ITEM_PREFIX,
    }
}

/// Generate the partition key shared by a parent and its children.
///
/// Pattern: `<PARENT_PREFIX><parent_id>`
pub fn partition_key(parent_type: EntityType, parent_id: Uuid) -> String {
    format!("{}{parent_id}", entity_prefix(parent_type))
}

/// Generate the sort key of a child record.
///
/// Pattern: `<CHILD_PREFIX><child_id>`
pub fn sort_key(child_type: EntityType, child_id: Uuid) -> String {
    format!("{}{child_id}", entity_prefix(child_type))
}

/// Sort key of a parent's own record.
pub fn metadata_sort_key() -> &'static str {
    METADATA_SORT_KEY
}

/// Generate the partition key of a user's email lookup record.
///
/// Pattern: `EMAIL#<email>`
pub fn email_partition_key(email: &str) -> String {
    format!("{EMAIL_PREFIX}{email}")
}

/// Sort key prefix matching every child of the given type in a partition.
pub fn child_sort_key_prefix(child_type: EntityType) -> &'static str {
    entity_prefix(child_type)
}

/// Splits a key at its first delimiter into the type segment and the id.
///
/// `"PRODUCT#abc"` yields `("PRODUCT", "abc")`; the sentinel yields
/// `("METADATA", "")`.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(KEY_DELIMITER)
}

/// Parses a partition or sort key back into its entity type and id.
pub fn parse_key(key: &str) -> Option<(EntityType, Uuid)> {
    let (segment, id) = split_key(key)?;
    let entity_type = EntityType::ALL.into_iter().find(|t| {
        entity_prefix(*t)
            .strip_suffix(KEY_DELIMITER)
            .is_some_and(|prefix| prefix == segment)
    })?;
    let id = Uuid::parse_str(id).ok()?;
    Some((entity_type, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    #[test]
    fn test_product_pk() {
        let product_id = id("550e8400-e29b-41d4-a716-446655440001");
        assert_eq!(
            partition_key(EntityType::Product, product_id),
            "PRODUCT#550e8400-e29b-41d4-a716-446655440001"
        );
    }

    #[test]
    fn test_option_sk() {
        let option_id = id("550e8400-e29b-41d4-a716-446655440002");
        assert_eq!(
            sort_key(EntityType::ProductOption, option_id),
            "OPTION#550e8400-e29b-41d4-a716-446655440002"
        );
    }

    #[test]
    fn test_user_and_order_keys() {
        let user_id = id("550e8400-e29b-41d4-a716-446655440003");
        let order_id = id("550e8400-e29b-41d4-a716-446655440004");

        assert_eq!(
            partition_key(EntityType::User, user_id),
            "USER#550e8400-e29b-41d4-a716-446655440003"
        );
        assert_eq!(
            sort_key(EntityType::Order, order_id),
            "ORDER#550e8400-e29b-41d4-a716-446655440004"
        );
        assert_eq!(
            partition_key(EntityType::Order, order_id),
            "ORDER#550e8400-e29b-41d4-a716-446655440004"
        );
    }

    #[test]
    fn test_order_item_sk() {
        let item_id = id("550e8400-e29b-41d4-a716-446655440005");
        assert_eq!(
            sort_key(EntityType::OrderItem, item_id),
            "ITEM#550e8400-e29b-41d4-a716-446655440005"
        );
    }

    #[test]
    fn test_email_partition_key() {
        assert_eq!(
            email_partition_key("jd.smith@gmail.com"),
            "EMAIL#jd.smith@gmail.com"
        );
    }

    #[test]
    fn test_email_key_is_not_an_entity_key() {
        assert_eq!(parse_key(&email_partition_key("jd.smith@gmail.com")), None);
    }

    #[test]
    fn test_metadata_sort_key() {
        assert_eq!(metadata_sort_key(), "METADATA#");
    }

    #[test]
    fn test_metadata_sorts_before_children_of_root_partitions() {
        let ids = [
            Uuid::nil(),
            Uuid::max(),
            id("00000000-0000-7000-8000-000000000000"),
            id("ffffffff-ffff-7fff-bfff-ffffffffffff"),
        ];

        for child_type in [EntityType::ProductOption, EntityType::Order] {
            for child_id in ids {
                assert!(metadata_sort_key() < sort_key(child_type, child_id).as_str());
            }
        }
    }

    #[test]
    fn test_child_sort_keys_follow_id_order() {
        let earlier = id("01890a5d-ac96-774b-bcce-b302099a8057");
        let later = id("01890a5d-ac97-7000-8000-000000000000");

        assert!(
            sort_key(EntityType::ProductOption, earlier)
                < sort_key(EntityType::ProductOption, later)
        );
    }

    #[test]
    fn test_child_sort_key_prefix() {
        assert_eq!(child_sort_key_prefix(EntityType::ProductOption), "OPTION#");
        assert_eq!(child_sort_key_prefix(EntityType::OrderItem), "ITEM#");
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("PRODUCT#abc"), Some(("PRODUCT", "abc")));
        assert_eq!(split_key("METADATA#"), Some(("METADATA", "")));
        assert_eq!(split_key("nodelimiter"), None);
    }

    #[test]
    fn test_parse_key_round_trip() {
        let user_id = id("550e8400-e29b-41d4-a716-446655440003");
        let key = partition_key(EntityType::User, user_id);

        assert_eq!(parse_key(&key), Some((EntityType::User, user_id)));
        assert_eq!(parse_key(METADATA_SORT_KEY), None);
        assert_eq!(parse_key("USER#not-a-uuid"), None);
        assert_eq!(parse_key("BASKET#550e8400-e29b-41d4-a716-446655440003"), None);
    }
}
