//! Request producer: one inbound event, one appended record.

use {courier_config::StreamsConfig, courier_streams::StreamStore, tracing::debug};

use crate::{
    Result,
    chat::{ChannelKind, InboundMessage},
    error::Error,
    record::TaskRequest,
};

/// Append a task request for `message` to the request stream.
///
/// Enforces the structural precondition first: requests exist only for
/// text-capable channels, even when called directly without the eligibility
/// gate. Exactly one append, no retry; an append failure surfaces to the
/// caller, who owes the originating user a notification.
pub async fn submit(
    store: &dyn StreamStore,
    streams: &StreamsConfig,
    event: &str,
    message: &InboundMessage,
    instruction: Option<&str>,
) -> Result<()> {
    if message.channel.kind != ChannelKind::Text {
        return Err(Error::not_text_channel(&message.channel_id));
    }

    let request = TaskRequest::from_message(event, message, instruction);
    store
        .append(&streams.requests, &request.request_id, &request.to_fields())
        .await?;
    debug!(
        request_id = %request.request_id,
        channel_id = %request.channel_id,
        event,
        "appended task request"
    );
    Ok(())
}
