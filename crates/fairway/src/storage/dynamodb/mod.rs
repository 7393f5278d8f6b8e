//! DynamoDB storage backend implementation.
//!
//! Stores every record in one table with string `PK`/`SK` keys and a sparse
//! global secondary index over child records, using `aws-sdk-dynamodb`.

mod conversions;
mod error;
mod store;
mod table;

pub use store::DynamoDbStore;
pub use table::{table_definition, IndexDefinition, TableDefinition, INVERTED_INDEX};
