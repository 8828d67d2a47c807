//! Composite-write policy.
//!
//! Logical entities span multiple physical tables, and the store client has
//! no cross-table transaction primitive. The sequencing policy is fixed:
//!
//! - parent row first; if that write fails, abort and report — nothing was
//!   committed;
//! - dependent row second; if that write fails the parent row is left in
//!   place as an orphan and the failure surfaces as
//!   [`StoreError::PartialWrite`], never masked as a total failure.
//!
//! Callers therefore treat composite creates as at-least-attempted, not
//! all-or-nothing.

use tracing::warn;

use crate::errors::{Result, StoreError};

/// Wrap a dependent-write result that ran after a committed parent row.
///
/// On failure, logs the orphan and converts the error into
/// [`StoreError::PartialWrite`] carrying the parent id and the underlying
/// cause.
pub(crate) fn dependent<T>(
    entity: &'static str,
    parent_id: &str,
    result: Result<T>,
) -> Result<T> {
    result.map_err(|source| {
        warn!(
            entity,
            parent_id,
            error = %source,
            "dependent write failed after parent row committed, orphan left in place"
        );
        StoreError::PartialWrite {
            entity,
            parent_id: parent_id.to_string(),
            source: Box::new(source),
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
