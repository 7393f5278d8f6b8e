//! Ordered store backends.
//!
//! Concrete implementations of [`fairway_core::storage::OrderedStore`],
//! selected at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): sorted in-process maps behind a `tokio` lock
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! Both backends may be enabled at once; the in-memory store is what the
//! test suite runs against.
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p fairway --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p fairway --features dynamodb"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
