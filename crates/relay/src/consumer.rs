//! Result consumer loop.
//!
//! A cancellable task owns the cursor and feeds result records, in arrival
//! order, into a bounded channel. The loop is an explicit two-state machine:
//! `Reading` blocks on the store; a transient read failure moves it to
//! `Backoff`, which waits a fixed delay and returns to `Reading` with the
//! cursor unchanged. Read timeouts are not failures and stay in `Reading`.

use std::{sync::Arc, time::Duration};

use {
    courier_config::StreamsConfig,
    courier_streams::{RecordId, StreamRecord, StreamStore},
    tokio::{sync::mpsc, task::JoinHandle},
    tokio_util::sync::CancellationToken,
    tracing::{debug, warn},
};

enum State {
    Reading,
    Backoff,
}

/// Blocking reader of the result stream.
///
/// One listener per deployment: concurrent listeners would race the same
/// cursor space and double-deliver. The cursor is process-local and starts at
/// the beginning of the stream, so a restart re-delivers anything an earlier
/// run did not clean up.
pub struct ResultListener {
    store: Arc<dyn StreamStore>,
    stream: String,
    read_block: Duration,
    read_count: usize,
    retry_delay: Duration,
    feed_buffer: usize,
}

impl ResultListener {
    pub fn new(store: Arc<dyn StreamStore>, streams: &StreamsConfig) -> Self {
        Self {
            store,
            stream: streams.results.clone(),
            read_block: streams.read_block(),
            read_count: streams.read_count,
            retry_delay: streams.retry_delay(),
            feed_buffer: streams.feed_buffer.max(1),
        }
    }

    /// Spawn the read loop and hand back its feed.
    pub fn spawn(self) -> ResultFeed {
        let (sender, receiver) = mpsc::channel(self.feed_buffer);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(self.run(sender, cancel.clone()));
        ResultFeed {
            receiver,
            cancel,
            handle,
        }
    }

    async fn run(self, sender: mpsc::Sender<StreamRecord>, cancel: CancellationToken) {
        let mut cursor = RecordId::beginning();
        let mut state = State::Reading;

        loop {
            if sender.is_closed() {
                // Receiver dropped: the caller abandoned the sequence.
                break;
            }
            match state {
                State::Reading => {
                    let read = tokio::select! {
                        _ = cancel.cancelled() => break,
                        read = self.store.read_blocking(
                            &self.stream,
                            &cursor,
                            self.read_block,
                            self.read_count,
                        ) => read,
                    };
                    match read {
                        Ok(Some(records)) => {
                            for record in records {
                                let id = record.id.clone();
                                tokio::select! {
                                    _ = cancel.cancelled() => return,
                                    sent = sender.send(record) => {
                                        if sent.is_err() {
                                            return;
                                        }
                                    }
                                }
                                cursor = id;
                            }
                        }
                        // Block timeout: nothing new, same cursor.
                        Ok(None) => {}
                        Err(error) => {
                            warn!(
                                %error,
                                stream = %self.stream,
                                "failed to read from result stream, backing off"
                            );
                            state = State::Backoff;
                        }
                    }
                }
                State::Backoff => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                    state = State::Reading;
                }
            }
        }
        debug!(stream = %self.stream, "result listener stopped");
    }
}

/// Receiving end of the consumer loop.
pub struct ResultFeed {
    receiver: mpsc::Receiver<StreamRecord>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ResultFeed {
    /// Next result record, in arrival order. `None` once the listener has
    /// stopped and drained.
    pub async fn recv(&mut self) -> Option<StreamRecord> {
        self.receiver.recv().await
    }

    /// Token a host process can use to stop the listener.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the listener and wait for it to wind down.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use {
        async_trait::async_trait,
        courier_streams::{Error, MemoryStreamStore, Result},
    };

    use super::*;

    fn config() -> StreamsConfig {
        StreamsConfig {
            read_block_ms: 100,
            retry_delay_ms: 5000,
            ..Default::default()
        }
    }

    async fn push_result(store: &MemoryStreamStore, stream: &str, id: &str, n: &str) {
        let fields = vec![("result".to_string(), n.to_string())];
        store
            .append(stream, &RecordId::new(id), &fields)
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn yields_records_in_push_order_exactly_once() {
        let store = MemoryStreamStore::new();
        let streams = config();
        for n in 1..=5 {
            push_result(&store, &streams.results, &format!("{n}-0"), &n.to_string()).await;
        }

        let mut feed = ResultListener::new(Arc::new(store.clone()), &streams).spawn();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(feed.recv().await.unwrap().id);
        }
        assert_eq!(
            seen,
            (1..=5)
                .map(|n| RecordId::new(format!("{n}-0")))
                .collect::<Vec<_>>()
        );

        // Later appends keep flowing from the advanced cursor.
        push_result(&store, &streams.results, "6-0", "6").await;
        assert_eq!(feed.recv().await.unwrap().id, RecordId::new("6-0"));

        feed.shutdown().await;
    }

    /// Store wrapper that fails the first `failures` reads, then delegates.
    struct FlakyStore {
        inner: MemoryStreamStore,
        failures: AtomicUsize,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl StreamStore for FlakyStore {
        async fn append(
            &self,
            stream: &str,
            id: &RecordId,
            fields: &[(String, String)],
        ) -> Result<RecordId> {
            self.inner.append(stream, id, fields).await
        }

        async fn read_blocking(
            &self,
            stream: &str,
            after: &RecordId,
            block: Duration,
            max_count: usize,
        ) -> Result<Option<Vec<StreamRecord>>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok()
            {
                return Err(Error::message("injected read failure"));
            }
            self.inner.read_blocking(stream, after, block, max_count).await
        }

        async fn delete(&self, stream: &str, id: &RecordId) -> Result<u64> {
            self.inner.delete(stream, id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_read_failure_backs_off_once_then_resumes() {
        let streams = config();
        let memory = MemoryStreamStore::new();
        push_result(&memory, &streams.results, "1-0", "1").await;

        let store = Arc::new(FlakyStore {
            inner: memory,
            failures: AtomicUsize::new(1),
            reads: AtomicUsize::new(0),
        });

        let started = tokio::time::Instant::now();
        let mut feed = ResultListener::new(store.clone(), &streams).spawn();

        // The record arrives despite the injected failure, read from the
        // unchanged beginning cursor after exactly one backoff period.
        let record = feed.recv().await.unwrap();
        assert_eq!(record.id, RecordId::new("1-0"));
        let elapsed = started.elapsed();
        assert!(elapsed >= streams.retry_delay());
        assert!(elapsed < streams.retry_delay() * 2, "single backoff only");
        assert!(store.reads.load(Ordering::SeqCst) >= 2);

        feed.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_a_blocked_listener() {
        let store = MemoryStreamStore::new();
        let feed = ResultListener::new(Arc::new(store), &config()).spawn();
        // No records: the listener is parked in a blocking read.
        feed.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_ends_the_loop() {
        let store = MemoryStreamStore::new();
        let streams = config();
        push_result(&store, &streams.results, "1-0", "1").await;

        let ResultFeed {
            receiver,
            cancel: _cancel,
            handle,
        } = ResultListener::new(Arc::new(store), &streams).spawn();
        drop(receiver);
        handle.await.unwrap();
    }
}
