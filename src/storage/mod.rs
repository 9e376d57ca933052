//! Storage backends for scraped show records.
//!
//! Every parsed show is dispatched to each configured sink in order:
//! - `LocalExport` writes one pretty-printed JSON file per show
//! - `DocumentStore` upserts the record into a SQLite document table
//!
//! The export directory is the primary output. The document store is
//! best-effort and a write failure there never invalidates a record.

pub mod docstore;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Show;

// Re-export for convenience
pub use docstore::DocumentStore;
pub use local::{LocalExport, SkipLedger};

/// Trait for show record sinks.
#[async_trait]
pub trait ShowSink: Send + Sync {
    /// Persist one parsed show record.
    async fn store_show(&self, show: &Show) -> Result<()>;

    /// Sink name used in log lines.
    fn name(&self) -> &'static str;

    /// Whether a write failure invalidates the record. Failures in a
    /// required sink send the record to the skip ledger; optional sinks
    /// only log.
    fn required(&self) -> bool {
        true
    }
}
