//! Case Log port: Trait for the remote append-only case store.

use crate::domain::CaseLogRecord;

/// Trait for appending opted-in cases to the research log.
///
/// Appends are best-effort, not idempotent, and never retried: a transient
/// failure drops that one entry, nothing more.
pub trait CaseLog: Send + Sync {
    /// Error type for append operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one record as a new row at the end of the remote table.
    ///
    /// # Errors
    /// Returns error if serialization, authentication, or the network
    /// operation fails.
    fn append(&self, record: &CaseLogRecord) -> Result<(), Self::Error>;
}
