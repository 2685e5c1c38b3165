//! Discord event handler for serenity.
//!
//! Receives gateway events, gates them, and turns the eligible ones into
//! task requests. Also owns the lifecycle of the result consumer: once the
//! gateway is ready, the listener/dispatcher pair is spawned so results can
//! flow back into their originating channels.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use {
    courier_config::StreamsConfig,
    courier_relay::{InboundMessage, ResultDispatcher, ResultListener, check_eligibility, producer},
    courier_streams::StreamStore,
    serenity::{
        all::{ChannelId, Context, EventHandler, GuildId, Message, MessageId, Ready, UserId},
        async_trait,
    },
    tracing::{debug, error, info, warn},
};

use crate::{backfill, client::DiscordChatClient, event};

/// Reply sent to the user when their request could not be enqueued.
const SUBMIT_FAILURE_REPLY: &str = "Sorry, there was an error processing your request.";

/// Event names carried in the request payload.
const EVENT_MESSAGE_CREATE: &str = "messageCreate";
const EVENT_MESSAGE_DELETE: &str = "messageDelete";

/// Handler for Discord gateway events.
pub struct CourierHandler {
    store: Arc<dyn StreamStore>,
    streams: StreamsConfig,
    bot_user_id: AtomicU64,
    consumer_started: AtomicBool,
}

impl CourierHandler {
    pub fn new(store: Arc<dyn StreamStore>, streams: StreamsConfig) -> Self {
        Self {
            store,
            streams,
            bot_user_id: AtomicU64::new(0),
            consumer_started: AtomicBool::new(false),
        }
    }

    fn bot_user_id(&self) -> Option<UserId> {
        match self.bot_user_id.load(Ordering::Relaxed) {
            0 => None,
            id => Some(UserId::new(id)),
        }
    }

    /// Submit an inbound message as a task request, notifying the author on
    /// failure when a reply target is available.
    async fn submit_request(
        &self,
        ctx: &Context,
        event_name: &str,
        inbound: &InboundMessage,
        instruction: Option<&str>,
        reply_to: Option<&Message>,
    ) {
        if let Err(error) = producer::submit(
            self.store.as_ref(),
            &self.streams,
            event_name,
            inbound,
            instruction,
        )
        .await
        {
            error!(
                %error,
                channel_id = %inbound.channel_id,
                message_id = %inbound.message_id,
                "failed to enqueue task request"
            );
            if let Some(message) = reply_to
                && let Err(reply_error) = message.reply(&ctx.http, SUBMIT_FAILURE_REPLY).await
            {
                warn!(%reply_error, "failed to send failure reply");
            }
        }
    }
}

#[async_trait]
impl EventHandler for CourierHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.bot_user_id.store(ready.user.id.get(), Ordering::Relaxed);
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord gateway ready"
        );

        // One consumer per process; `ready` fires again on reconnect.
        if !self.consumer_started.swap(true, Ordering::SeqCst) {
            let chat = Arc::new(DiscordChatClient::new(ctx.http.clone()));
            let feed = ResultListener::new(Arc::clone(&self.store), &self.streams).spawn();
            let dispatcher =
                ResultDispatcher::new(Arc::clone(&self.store), chat, self.streams.clone());
            tokio::spawn(dispatcher.run(feed));
            info!(stream = %self.streams.results, "result consumer started");
        }
    }

    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        debug!(guild_count = guilds.len(), "discord cache ready");
        let bot_user_id = self.bot_user_id();
        tokio::spawn(async move {
            backfill::warm_caches(&ctx, bot_user_id).await;
        });
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let inbound = event::from_live_message(&ctx, &msg, self.bot_user_id());
        if let Err(reason) = check_eligibility(&inbound) {
            debug!(
                %reason,
                channel_id = %inbound.channel_id,
                "dropping ineligible message"
            );
            return;
        }

        self.submit_request(&ctx, EVENT_MESSAGE_CREATE, &inbound, None, Some(&msg))
            .await;
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        // Deletions arrive as bare ids; only a cached copy can tell us what
        // was deleted and by whom. Uncached deletions map to a partial
        // event, which the gate drops.
        let cached = ctx
            .cache
            .message(channel_id, deleted_message_id)
            .map(|message| (*message).clone());
        let inbound = match cached {
            Some(ref message) => {
                let mut inbound = event::from_live_message(&ctx, message, self.bot_user_id());
                inbound.channel = event::channel_context(
                    &ctx,
                    guild_id.or(message.guild_id),
                    channel_id,
                    self.bot_user_id(),
                );
                inbound
            }
            None => event::partial_deletion(channel_id, deleted_message_id),
        };

        if let Err(reason) = check_eligibility(&inbound) {
            debug!(
                %reason,
                channel_id = %inbound.channel_id,
                "dropping ineligible deletion event"
            );
            return;
        }

        let instruction = format!(
            "The request \"{}\" was deleted by its author. Cancel the corresponding task.",
            inbound.content
        );
        // The original message is gone; there is nothing to reply to on
        // failure.
        self.submit_request(
            &ctx,
            EVENT_MESSAGE_DELETE,
            &inbound,
            Some(&instruction),
            None,
        )
        .await;
    }
}
