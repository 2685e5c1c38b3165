use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use {async_trait::async_trait, tokio::sync::Notify};

use crate::{
    Result,
    id::RecordId,
    store::{StreamRecord, StreamStore},
};

/// In-memory [`StreamStore`] with the same blocking-read semantics as the
/// Redis implementation. Used by tests and local experiments.
#[derive(Clone, Default)]
pub struct MemoryStreamStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    streams: Mutex<HashMap<String, Vec<StreamRecord>>>,
    appended: Notify,
}

impl MemoryStreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_after(
        &self,
        stream: &str,
        after: &RecordId,
        max_count: usize,
    ) -> Option<Vec<StreamRecord>> {
        let streams = self.lock();
        let entries = streams.get(stream)?;
        let cursor = after.parts();
        let batch: Vec<StreamRecord> = entries
            .iter()
            .filter(|record| record.id.parts() > cursor)
            .take(max_count)
            .cloned()
            .collect();
        if batch.is_empty() { None } else { Some(batch) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<StreamRecord>>> {
        self.inner
            .streams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Store-assigned id: current millis, bumped past the stream tail so ids
/// stay strictly increasing even within one millisecond.
fn next_id(entries: &[StreamRecord]) -> RecordId {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    let (last_millis, last_seq) = entries
        .last()
        .map(|record| record.id.parts())
        .unwrap_or((0, 0));
    if now > last_millis {
        RecordId::new(format!("{now}-0"))
    } else {
        RecordId::new(format!("{last_millis}-{}", last_seq + 1))
    }
}

#[async_trait]
impl StreamStore for MemoryStreamStore {
    async fn append(
        &self,
        stream: &str,
        id: &RecordId,
        fields: &[(String, String)],
    ) -> Result<RecordId> {
        let assigned = {
            let mut streams = self.lock();
            let entries = streams.entry(stream.to_string()).or_default();
            let assigned = if id.is_auto() {
                next_id(entries)
            } else {
                id.clone()
            };
            entries.push(StreamRecord {
                id: assigned.clone(),
                fields: fields.to_vec(),
            });
            assigned
        };
        self.inner.appended.notify_waiters();
        Ok(assigned)
    }

    async fn read_blocking(
        &self,
        stream: &str,
        after: &RecordId,
        block: Duration,
        max_count: usize,
    ) -> Result<Option<Vec<StreamRecord>>> {
        let deadline = tokio::time::Instant::now() + block;
        loop {
            // Arm the notification before checking so an append between the
            // check and the await cannot be missed.
            let appended = self.inner.appended.notified();
            if let Some(batch) = self.take_after(stream, after, max_count) {
                return Ok(Some(batch));
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::select! {
                _ = appended => {},
                _ = tokio::time::sleep_until(deadline) => return Ok(None),
            }
        }
    }

    async fn delete(&self, stream: &str, id: &RecordId) -> Result<u64> {
        let mut streams = self.lock();
        let Some(entries) = streams.get_mut(stream) else {
            return Ok(0);
        };
        let before = entries.len();
        entries.retain(|record| record.id != *id);
        Ok((before - entries.len()) as u64)
    }
}
