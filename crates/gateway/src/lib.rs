//! Composition root: stream store + health endpoint + Discord client.

pub mod server;

use std::{net::Ipv4Addr, sync::Arc};

use {
    anyhow::Context as _,
    courier_config::CourierConfig,
    courier_streams::RedisStreamStore,
    tracing::{error, info},
};

pub use server::build_app;

/// Run the relay until the gateway connection ends.
///
/// Startup order matches the delivery contract: the store connection is
/// established first (fatal if unreachable), the health endpoint comes up
/// next, and the Discord client starts last — its `ready` event spawns the
/// result consumer.
pub async fn run(config: CourierConfig) -> anyhow::Result<()> {
    let store = Arc::new(
        RedisStreamStore::connect(&config.redis)
            .await
            .context("stream store unreachable")?,
    );
    info!(host = %config.redis.host, port = config.redis.port, "connected to stream store");

    let listener =
        tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server.port))
            .await
            .context("failed to bind health endpoint")?;
    info!(port = config.server.port, "health endpoint listening");
    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, build_app()).await {
            error!(%error, "health server exited");
        }
    });

    let mut client =
        courier_discord::build_client(&config.discord, store, config.streams.clone())
            .await
            .context("failed to build discord client")?;
    client.start().await.context("discord client error")?;
    Ok(())
}
