//! DynamoDB ordered store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, instrument};

use fairway_core::storage::{Item, OrderedStore, StoreError, INDEX_KEY_ATTR, PK_ATTR, SK_ATTR};

use super::conversions::{from_sdk_item, to_sdk_item, SdkItem};
use super::error::{map_get_item_error, map_put_item_error, map_query_error};
use super::table::{self, INVERTED_INDEX};
use crate::config::StoreConfig;

/// DynamoDB-based ordered store.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a store from configuration.
    ///
    /// Uses the AWS SDK default credential chain with the configured region,
    /// and the endpoint override when one is set (local DynamoDB).
    pub async fn connect(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        debug!(target_env = %config.target_display(), "Connecting to DynamoDB");

        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Creates the table with its child index and waits until it is active.
    pub async fn create_table(&self) -> Result<(), StoreError> {
        table::create_table(&self.client, &table::table_definition(&self.table_name)).await
    }

    /// Deletes the table.
    pub async fn delete_table(&self) -> Result<(), StoreError> {
        table::delete_table(&self.client, &self.table_name).await
    }

    /// Runs a query to completion, following `LastEvaluatedKey` across pages.
    async fn query_all(
        &self,
        index_name: Option<&str>,
        key_attr: &str,
        key: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key: Option<SdkItem> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .set_index_name(index_name.map(str::to_string))
                .key_condition_expression(format!("{} = :key", key_attr))
                .expression_attribute_values(":key", AttributeValue::S(key.to_string()))
                .scan_index_forward(true)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(map_query_error)?;

            for item in result.items.unwrap_or_default() {
                items.push(from_sdk_item(item)?);
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl OrderedStore for DynamoDbStore {
    #[instrument(skip(self, item), fields(table = %self.table_name))]
    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        let item: HashMap<String, AttributeValue> = to_sdk_item(item);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get_item(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PK_ATTR, AttributeValue::S(partition_key.to_string()))
            .key(SK_ATTR, AttributeValue::S(sort_key.to_string()))
            .send()
            .await
            .map_err(map_get_item_error)?;

        result.item.map(from_sdk_item).transpose()
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn query_partition(&self, partition_key: &str) -> Result<Vec<Item>, StoreError> {
        let items = self.query_all(None, PK_ATTR, partition_key).await?;
        debug!(count = items.len(), "Queried partition");
        Ok(items)
    }

    /// Index reads are eventually consistent: a child written moments ago
    /// may not be visible yet.
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn query_inverted(&self, sort_key: &str) -> Result<Vec<Item>, StoreError> {
        let items = self
            .query_all(Some(INVERTED_INDEX), INDEX_KEY_ATTR, sort_key)
            .await?;
        debug!(count = items.len(), "Queried inverted index");
        Ok(items)
    }
}
