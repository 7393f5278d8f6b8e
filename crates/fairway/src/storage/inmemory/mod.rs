//! In-memory ordered store for testing.
//!
//! Keeps the primary table and the inverted index as sorted maps wrapped in
//! `Arc<RwLock<_>>`, so partition and index queries come back in the same
//! order DynamoDB returns them. Data is lost when the last clone is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use fairway::storage::inmemory::InMemoryStore;
//! use fairway::AggregateStore;
//!
//! let store = AggregateStore::new(InMemoryStore::new());
//! ```

mod store;

pub use store::InMemoryStore;
