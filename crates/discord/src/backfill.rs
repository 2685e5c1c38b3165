//! Cache warm-up after connecting.
//!
//! Fetches member lists for every guild (so `groupMembers` is accurate) and
//! recent history for every private, bot-viewable text channel (messages
//! sent while the relay was offline). Best-effort: failures are logged and
//! never fatal.

use {
    courier_relay::ChannelKind,
    serenity::{
        all::{ChannelId, Context, UserId},
        builder::GetMessages,
    },
    tracing::{debug, warn},
};

use crate::event;

/// Messages fetched per channel during backfill.
const BACKFILL_LIMIT: u8 = 100;

pub async fn warm_caches(ctx: &Context, bot_user_id: Option<UserId>) {
    let guild_ids = ctx.cache.guilds();

    for guild_id in &guild_ids {
        match guild_id.members(&ctx.http, None, None).await {
            Ok(members) => debug!(
                guild_id = guild_id.get(),
                count = members.len(),
                "fetched guild members"
            ),
            Err(error) => warn!(
                guild_id = guild_id.get(),
                %error,
                "failed to fetch guild members"
            ),
        }
    }

    // Collect targets synchronously; cache references must not be held
    // across the fetches below.
    let mut targets: Vec<ChannelId> = Vec::new();
    for guild_id in &guild_ids {
        let channel_ids: Vec<ChannelId> = match ctx.cache.guild(*guild_id) {
            Some(guild) => guild.channels.keys().copied().collect(),
            None => continue,
        };
        for channel_id in channel_ids {
            let context = event::channel_context(ctx, Some(*guild_id), channel_id, bot_user_id);
            if context.kind == ChannelKind::Text
                && context.bot_can_view
                && !context.visible_to_everyone
            {
                targets.push(channel_id);
            }
        }
    }

    for channel_id in targets {
        match channel_id
            .messages(&ctx.http, GetMessages::new().limit(BACKFILL_LIMIT))
            .await
        {
            Ok(messages) => debug!(
                channel_id = channel_id.get(),
                count = messages.len(),
                "fetched channel history"
            ),
            Err(error) => warn!(
                channel_id = channel_id.get(),
                %error,
                "failed to fetch channel history"
            ),
        }
    }
}
