//! Single-table aggregate store.
//!
//! [`AggregateStore`] writes products, users, orders and their children into
//! one sorted table through an [`fairway_core::storage::OrderedStore`] and
//! reads whole aggregates back with a single partition query.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): [`storage::inmemory::InMemoryStore`]
//! - `dynamodb`: [`storage::dynamodb::DynamoDbStore`] using `aws-sdk-dynamodb`
//!
//! ```rust,ignore
//! use fairway::{storage::inmemory::InMemoryStore, AggregateStore};
//! use fairway_core::model::{Product, ProductOption};
//!
//! let store = AggregateStore::new(InMemoryStore::new());
//! let product = store.add_parent(Product::new("Driver")).await?;
//! store.add_child(product.id, ProductOption::sized("Tall")).await?;
//!
//! let aggregate = store.get_aggregate::<Product>(product.id).await?;
//! ```

pub mod config;
pub mod repository;
pub mod storage;

pub use config::StoreConfig;
pub use repository::{Aggregate, AggregateStore};
