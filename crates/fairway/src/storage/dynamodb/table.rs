//! Table provisioning.
//!
//! [`table_definition`] is pure data; [`create_table`] and [`delete_table`]
//! carry it out against DynamoDB.

use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, IndexStatus, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use fairway_core::storage::{StoreError, INDEX_KEY_ATTR, PK_ATTR, SK_ATTR};
use tracing::{debug, info};

use super::error::map_table_error;

/// Name of the sparse global secondary index over child records.
pub const INVERTED_INDEX: &str = "InvertedIndex";

const MAX_WAIT_ATTEMPTS: u32 = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// Schema of the shared table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub table_name: String,
    pub partition_key: &'static str,
    pub sort_key: &'static str,
    pub indexes: Vec<IndexDefinition>,
}

/// A global secondary index projecting every attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub name: &'static str,
    pub partition_key: &'static str,
    pub sort_key: &'static str,
}

/// Returns the table layout: string `PK`/`SK` keys plus the child index.
///
/// The index hashes on `GSI1PK`, which only child records carry, so parent
/// metadata records stay out of it.
pub fn table_definition(table_name: impl Into<String>) -> TableDefinition {
    TableDefinition {
        table_name: table_name.into(),
        partition_key: PK_ATTR,
        sort_key: SK_ATTR,
        indexes: vec![IndexDefinition {
            name: INVERTED_INDEX,
            partition_key: INDEX_KEY_ATTR,
            sort_key: PK_ATTR,
        }],
    }
}

fn build_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::WriteFailed(err.to_string())
}

fn key_schema(partition_key: &str, sort_key: &str) -> Result<Vec<KeySchemaElement>, StoreError> {
    Ok(vec![
        KeySchemaElement::builder()
            .attribute_name(partition_key)
            .key_type(KeyType::Hash)
            .build()
            .map_err(build_error)?,
        KeySchemaElement::builder()
            .attribute_name(sort_key)
            .key_type(KeyType::Range)
            .build()
            .map_err(build_error)?,
    ])
}

/// Creates the table and waits until it and its index are active.
pub async fn create_table(client: &Client, definition: &TableDefinition) -> Result<(), StoreError> {
    let mut key_names = vec![definition.partition_key, definition.sort_key];
    for index in &definition.indexes {
        for name in [index.partition_key, index.sort_key] {
            if !key_names.contains(&name) {
                key_names.push(name);
            }
        }
    }

    let attribute_definitions = key_names
        .into_iter()
        .map(|name| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(build_error)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut request = client
        .create_table()
        .table_name(&definition.table_name)
        .set_key_schema(Some(key_schema(
            definition.partition_key,
            definition.sort_key,
        )?))
        .set_attribute_definitions(Some(attribute_definitions))
        .billing_mode(BillingMode::PayPerRequest);

    for index in &definition.indexes {
        request = request.global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(index.name)
                .set_key_schema(Some(key_schema(index.partition_key, index.sort_key)?))
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()
                .map_err(build_error)?,
        );
    }

    request
        .send()
        .await
        .map_err(|e| map_table_error(e, "CreateTable"))?;

    info!(table = %definition.table_name, "Created table, waiting for it to become active");
    wait_for_table_active(client, &definition.table_name).await?;
    info!(table = %definition.table_name, "Table is active");

    Ok(())
}

/// Deletes the table.
pub async fn delete_table(client: &Client, table_name: &str) -> Result<(), StoreError> {
    client
        .delete_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| map_table_error(e, "DeleteTable"))?;

    info!(table = %table_name, "Deleted table");
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<(), StoreError> {
    for attempt in 1..=MAX_WAIT_ATTEMPTS {
        let response = client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_table_error(e, "DescribeTable"))?;

        if let Some(table) = response.table() {
            let table_active = table.table_status() == Some(&TableStatus::Active);
            let indexes_active = table
                .global_secondary_indexes()
                .iter()
                .all(|gsi| gsi.index_status() == Some(&IndexStatus::Active));

            if table_active && indexes_active {
                return Ok(());
            }
        }

        debug!(table = %table_name, attempt, "Table not active yet");
        tokio::time::sleep(WAIT_DELAY).await;
    }

    Err(StoreError::WriteFailed(format!(
        "Table {} did not become active",
        table_name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_definition_keys() {
        let definition = table_definition("fairway");

        assert_eq!(definition.table_name, "fairway");
        assert_eq!(definition.partition_key, "PK");
        assert_eq!(definition.sort_key, "SK");
    }

    #[test]
    fn test_child_index_is_keyed_on_sparse_attribute() {
        let definition = table_definition("fairway");

        assert_eq!(
            definition.indexes,
            vec![IndexDefinition {
                name: "InvertedIndex",
                partition_key: "GSI1PK",
                sort_key: "PK",
            }]
        );
    }

    #[test]
    fn test_key_schema() {
        let schema = key_schema("SK", "PK").unwrap();

        assert_eq!(schema[0].attribute_name(), "SK");
        assert_eq!(schema[0].key_type(), &KeyType::Hash);
        assert_eq!(schema[1].attribute_name(), "PK");
        assert_eq!(schema[1].key_type(), &KeyType::Range);
    }
}
