//! Discord integration for the courier relay.
//!
//! Maps serenity gateway events into the relay's platform-neutral event
//! model, submits eligible messages as task requests, and implements the
//! outbound [`courier_relay::ChatClient`] over the Discord HTTP API.

pub mod backfill;
pub mod client;
pub mod error;
pub mod event;
pub mod handler;
pub mod visibility;

use std::sync::Arc;

use {
    courier_config::{DiscordConfig, StreamsConfig},
    courier_streams::StreamStore,
    secrecy::ExposeSecret,
    serenity::all::GatewayIntents,
};

pub use {
    client::DiscordChatClient,
    error::{Error, Result},
    handler::CourierHandler,
};

/// How many messages serenity keeps per channel so deletions of recent
/// messages can still be resolved to their content.
const MESSAGE_CACHE_LIMIT: usize = 500;

/// Gateway intents the relay needs: guild/channel metadata, member lists
/// for `groupMembers`, and message content for instructions.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
}

/// Build the serenity client wired to the relay.
///
/// The returned client has not started yet; `Client::start` runs the gateway
/// connection until the process exits.
pub async fn build_client(
    discord: &DiscordConfig,
    store: Arc<dyn StreamStore>,
    streams: StreamsConfig,
) -> Result<serenity::Client> {
    let handler = CourierHandler::new(store, streams);
    let mut cache_settings = serenity::cache::Settings::default();
    cache_settings.max_messages = MESSAGE_CACHE_LIMIT;
    let client = serenity::Client::builder(discord.token.expose_secret(), intents())
        .event_handler(handler)
        .cache_settings(cache_settings)
        .await?;
    Ok(client)
}
