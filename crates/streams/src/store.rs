use std::time::Duration;

use async_trait::async_trait;

use crate::{Result, id::RecordId};

/// One record read back from a stream: its id plus flat string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub id: RecordId,
    pub fields: Vec<(String, String)>,
}

impl StreamRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Append-only, per-key ordered log with cursor-based blocking reads and
/// delete-by-id.
///
/// Implementations must tolerate concurrent callers; the producer appends
/// from many inbound events at once while the consumer loop reads.
#[async_trait]
pub trait StreamStore: Send + Sync {
    /// Append a record. Fields are flat string pairs; callers pre-serialize
    /// anything structured (lists are JSON-encoded). Returns the id the store
    /// assigned, which equals `id` unless it was [`RecordId::auto`].
    async fn append(
        &self,
        stream: &str,
        id: &RecordId,
        fields: &[(String, String)],
    ) -> Result<RecordId>;

    /// Read up to `max_count` records appended after `after`, in append
    /// order. Returns immediately when matching records exist; otherwise
    /// blocks up to `block` and returns `Ok(None)` on timeout, which is not
    /// an error.
    async fn read_blocking(
        &self,
        stream: &str,
        after: &RecordId,
        block: Duration,
        max_count: usize,
    ) -> Result<Option<Vec<StreamRecord>>>;

    /// Delete a record by id. Idempotent: deleting a missing id returns a
    /// zero count, not an error.
    async fn delete(&self, stream: &str, id: &RecordId) -> Result<u64>;
}
