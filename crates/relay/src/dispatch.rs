//! Delivery of consumed results back to their originating conversations.

use std::sync::Arc;

use {
    courier_config::StreamsConfig,
    courier_streams::{StreamRecord, StreamStore},
    tracing::{debug, warn},
};

use crate::{
    chat::{ChannelKind, ChatClient},
    cleanup,
    consumer::ResultFeed,
    record::TaskResult,
};

/// Sequentially delivers each result record and cleans up after it.
pub struct ResultDispatcher {
    store: Arc<dyn StreamStore>,
    chat: Arc<dyn ChatClient>,
    streams: StreamsConfig,
}

impl ResultDispatcher {
    pub fn new(
        store: Arc<dyn StreamStore>,
        chat: Arc<dyn ChatClient>,
        streams: StreamsConfig,
    ) -> Self {
        Self {
            store,
            chat,
            streams,
        }
    }

    /// Drain the feed until the listener stops. Strictly sequential: the
    /// next record is not taken until this one's delivery and cleanup are
    /// done, so delivery order matches stream order.
    pub async fn run(self, mut feed: ResultFeed) {
        while let Some(record) = feed.recv().await {
            self.dispatch(record).await;
        }
        debug!("result feed closed, dispatcher exiting");
    }

    /// Handle one result record.
    ///
    /// Containment rule: whatever goes wrong here affects this record only.
    /// Malformed records are skipped without cleanup; an unresolvable or
    /// non-text destination skips the record (never the loop); delivery and
    /// cleanup failures are logged and swallowed.
    pub async fn dispatch(&self, record: StreamRecord) {
        // Not actionable without full correlation; leave the record in the
        // stream untouched.
        let Some(result) = TaskResult::from_record(&record) else {
            return;
        };

        match self.chat.channel_kind(&result.channel_id).await {
            Ok(Some(ChannelKind::Text)) => {}
            Ok(_) => {
                warn!(
                    channel_id = %result.channel_id,
                    result_id = %result.id,
                    "result destination is not a text channel, skipping record"
                );
                return;
            }
            Err(error) => {
                warn!(
                    channel_id = %result.channel_id,
                    result_id = %result.id,
                    %error,
                    "failed to resolve result destination, skipping record"
                );
                return;
            }
        }

        if !result.text.is_empty()
            && let Err(error) = self
                .chat
                .send_reply(&result.channel_id, &result.message_id, &result.text)
                .await
        {
            // Best-effort delivery: invisible to the user, still cleaned up.
            warn!(
                channel_id = %result.channel_id,
                message_id = %result.message_id,
                %error,
                "failed to deliver result reply"
            );
        }

        cleanup::remove_pair(
            self.store.as_ref(),
            &self.streams,
            &result.request_id,
            &result.id,
        )
        .await;
    }
}
