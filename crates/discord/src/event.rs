//! Mapping serenity gateway events into the relay's event model.
//!
//! Everything here reads the gateway cache synchronously; nothing awaits
//! while a cache reference is held.

use {
    courier_relay::{ChannelContext, ChannelKind, InboundMessage},
    serenity::all::{
        ChannelId, ChannelType, Context, GuildId, Message, MessageId, Permissions, RoleId, User,
        UserId,
    },
};

use crate::visibility;

/// A message received live from the gateway (never partial).
pub fn from_live_message(
    ctx: &Context,
    msg: &Message,
    bot_user_id: Option<UserId>,
) -> InboundMessage {
    InboundMessage {
        message_id: msg.id.to_string(),
        channel_id: msg.channel_id.to_string(),
        content: msg.content.clone(),
        sender: display_name(&msg.author),
        author_is_service: msg.author.bot,
        partial: false,
        channel: channel_context(ctx, msg.guild_id, msg.channel_id, bot_user_id),
    }
}

/// A deletion whose message is no longer cached: all the platform gives us
/// are ids, so the record is partial and the gate drops it.
pub fn partial_deletion(channel_id: ChannelId, message_id: MessageId) -> InboundMessage {
    InboundMessage {
        message_id: message_id.to_string(),
        channel_id: channel_id.to_string(),
        content: String::new(),
        sender: String::new(),
        author_is_service: false,
        partial: true,
        channel: ChannelContext::unknown(),
    }
}

/// Resolve a channel's kind, visibility, and member list from the cache.
///
/// Anything that cannot be resolved (DM, uncached guild, unknown channel)
/// maps to [`ChannelContext::unknown`], which fails eligibility.
pub fn channel_context(
    ctx: &Context,
    guild_id: Option<GuildId>,
    channel_id: ChannelId,
    bot_user_id: Option<UserId>,
) -> ChannelContext {
    let Some(guild_id) = guild_id else {
        return ChannelContext::unknown();
    };
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return ChannelContext::unknown();
    };
    let Some(channel) = guild.channels.get(&channel_id) else {
        return ChannelContext::unknown();
    };

    let kind = match channel.kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Voice => ChannelKind::Voice,
        _ => ChannelKind::Other,
    };

    // The everyone role's id equals the guild id.
    let everyone_id = RoleId::new(guild_id.get());
    let visible_to_everyone = guild
        .roles
        .get(&everyone_id)
        .map(|role| {
            visibility::role_can_view(role.permissions, &channel.permission_overwrites, everyone_id)
        })
        .unwrap_or(false);

    let bot_member = bot_user_id.and_then(|user_id| guild.members.get(&user_id));
    let bot_can_view = bot_member
        .map(|member| {
            guild
                .user_permissions_in(channel, member)
                .contains(Permissions::VIEW_CHANNEL)
        })
        .unwrap_or(false);

    let members = guild
        .members
        .values()
        .filter(|member| !member.user.bot)
        .filter(|member| {
            guild
                .user_permissions_in(channel, member)
                .contains(Permissions::VIEW_CHANNEL)
        })
        .map(|member| display_name(&member.user))
        .collect();

    ChannelContext {
        kind,
        bot_can_view,
        visible_to_everyone,
        members,
    }
}

/// Display name with a fallback to the account username.
pub fn display_name(user: &User) -> String {
    user.global_name
        .clone()
        .unwrap_or_else(|| user.name.clone())
}
