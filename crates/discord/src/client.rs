//! Outbound chat client over the Discord HTTP API.

use std::sync::Arc;

use {
    async_trait::async_trait,
    courier_relay::{ChannelKind, ChatClient, Error as RelayError, Result as RelayResult},
    serenity::{
        all::{Channel, ChannelId, ChannelType},
        http::{Http, HttpError},
    },
    tracing::debug,
};

use crate::error::InvalidId;

/// [`ChatClient`] implementation used by the result dispatcher.
pub struct DiscordChatClient {
    http: Arc<Http>,
}

impl DiscordChatClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatClient for DiscordChatClient {
    async fn channel_kind(&self, channel_id: &str) -> RelayResult<Option<ChannelKind>> {
        let Some(id) = parse_snowflake(channel_id).map(ChannelId::new) else {
            return Ok(None);
        };
        match self.http.get_channel(id).await {
            Ok(Channel::Guild(channel)) => Ok(Some(match channel.kind {
                ChannelType::Text => ChannelKind::Text,
                ChannelType::Voice => ChannelKind::Voice,
                _ => ChannelKind::Other,
            })),
            Ok(_) => Ok(Some(ChannelKind::Other)),
            Err(serenity::Error::Http(HttpError::UnsuccessfulRequest(response)))
                if response.status_code.as_u16() == 404 =>
            {
                debug!(channel_id, "result destination channel no longer exists");
                Ok(None)
            }
            Err(error) => Err(RelayError::chat("fetch channel", error)),
        }
    }

    async fn send_reply(&self, channel_id: &str, reply_to: &str, text: &str) -> RelayResult<()> {
        let Some(id) = parse_snowflake(channel_id).map(ChannelId::new) else {
            return Err(RelayError::chat(
                "send reply",
                InvalidId::channel(channel_id),
            ));
        };

        let mut body = serde_json::json!({ "content": text });
        // Relaxed reference: the reply must go through even if the original
        // message was deleted in the meantime.
        if let Some(reply_to) = parse_snowflake(reply_to) {
            body["message_reference"] = serde_json::json!({
                "channel_id": channel_id,
                "message_id": reply_to.to_string(),
                "fail_if_not_exists": false,
            });
        }

        self.http
            .send_message(id, Vec::new(), &body)
            .await
            .map_err(|error| RelayError::chat("send reply", error))?;
        Ok(())
    }
}

/// Discord snowflakes are nonzero u64s; anything else does not name a
/// Discord entity.
fn parse_snowflake(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflakes_are_nonzero_u64s() {
        assert_eq!(parse_snowflake("123456789"), Some(123456789));
        assert_eq!(parse_snowflake("0"), None);
        assert_eq!(parse_snowflake("c1"), None);
        assert_eq!(parse_snowflake(""), None);
        assert_eq!(parse_snowflake("-5"), None);
    }
}
