//! The store client — thin wrapper over the backing relational service.
//!
//! The client exposes exactly the query surface the external store offers:
//! single-table equality, greater-or-equal range, id-in-set filters, one
//! ordering column, inserts, updates, and deletes. No joins, no cross-table
//! transactions, no business logic. Everything richer — reassembly, owner
//! chains, predicate composition — lives in [`crate::adapter`].

pub mod connection;
pub mod query;

pub use connection::{
    new_file, new_in_memory, ConnectionConfig, ConnectionPool, PooledConnection,
};
pub use query::{Row, StoreClient};
