//! Error types for the persistence adapter.
//!
//! [`StoreError`] distinguishes the four failure kinds callers need to tell
//! apart: not-found (including "parent exists, dependent missing"), schema
//! drift, partial composite writes, and validation failures. Nothing here is
//! fatal to the process — a failed operation never leaves the adapter unable
//! to serve the next request.

use thiserror::Error;

/// Errors that can occur during adapter operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// No reassembled template for the requested id. Also covers the case
    /// where the flagged meeting row exists but its minutes row is missing.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// Requested distribution was not found.
    #[error("distribution not found: {0}")]
    DistributionNotFound(String),

    /// Requested contact was not found.
    #[error("contact not found: {0}")]
    ContactNotFound(String),

    /// Requested organization was not found.
    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    /// Requested meeting was not found.
    #[error("meeting not found: {0}")]
    MeetingNotFound(String),

    /// The backing store is missing a column the adapter expects.
    #[error(
        "schema drift: table `{table}` has no column `{column}`; \
         apply the backing-store migration that adds it to re-enable the dependent feature"
    )]
    SchemaDrift {
        /// Table the adapter queried.
        table: String,
        /// Column the store reported missing.
        column: String,
    },

    /// The parent physical row was written but a dependent write failed,
    /// leaving an orphan parent row in place.
    #[error("partial write: {entity} parent row {parent_id} committed but dependent write failed: {source}")]
    PartialWrite {
        /// Logical entity being written.
        entity: &'static str,
        /// Id of the committed parent row.
        parent_id: String,
        /// The dependent-write failure.
        #[source]
        source: Box<StoreError>,
    },

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {constraint}")]
    Conflict {
        /// The violated constraint (table.column).
        constraint: String,
    },

    /// Caller-supplied data failed a precondition; nothing was written.
    #[error("validation failure: {0}")]
    Validation(String),
}

impl StoreError {
    /// Whether this error is the schema-drift condition the adapter
    /// degrades on instead of propagating.
    pub fn is_schema_drift(&self) -> bool {
        matches!(self, Self::SchemaDrift { .. })
    }

    /// Whether this error is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Convenience type alias for adapter results.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
