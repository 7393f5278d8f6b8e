//! Functional core for the fairway single-table store.
//!
//! Entity types, the composite key codec and the attribute-map marshaller
//! live here. Nothing in this crate performs I/O; the store itself is an
//! [`storage::OrderedStore`] implemented by the `fairway` crate.

pub mod identity;
pub mod model;
pub mod storage;
