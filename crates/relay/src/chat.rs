//! The chat-platform collaborator seam.
//!
//! The relay never talks to a chat platform directly; platform crates map
//! their events into [`InboundMessage`] and implement [`ChatClient`] for the
//! outbound direction.

use async_trait::async_trait;

use crate::Result;

/// Coarse channel classification. Only [`ChannelKind::Text`] channels can
/// carry requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Other,
}

/// What the relay needs to know about an event's channel: its kind, who can
/// see it, and who is in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelContext {
    pub kind: ChannelKind,
    /// The bot itself can view the channel.
    pub bot_can_view: bool,
    /// The default/everyone role can view the channel. Public channels are
    /// never relayed.
    pub visible_to_everyone: bool,
    /// Display names of the channel's non-service members, in platform order.
    pub members: Vec<String>,
}

impl ChannelContext {
    /// Context for a channel the platform could not resolve. Fails every
    /// eligibility check.
    pub fn unknown() -> Self {
        Self {
            kind: ChannelKind::Other,
            bot_can_view: false,
            visible_to_everyone: false,
            members: Vec::new(),
        }
    }
}

/// A platform-neutral inbound chat event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub message_id: String,
    pub channel_id: String,
    pub content: String,
    /// Author display name.
    pub sender: String,
    /// The author is a bot/service account.
    pub author_is_service: bool,
    /// The platform delivered an incomplete record (e.g. a deletion of an
    /// uncached message).
    pub partial: bool,
    pub channel: ChannelContext,
}

/// Outbound operations the dispatcher needs from the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Resolve a channel by id. `Ok(None)` means the channel does not exist.
    async fn channel_kind(&self, channel_id: &str) -> Result<Option<ChannelKind>>;

    /// Deliver `text` as a reply to `reply_to` in `channel_id`. The reference
    /// is relaxed: delivery must not fail merely because the original message
    /// was deleted in the meantime.
    async fn send_reply(&self, channel_id: &str, reply_to: &str, text: &str) -> Result<()>;
}
