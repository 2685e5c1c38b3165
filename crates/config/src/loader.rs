//! Environment-variable loading.
//!
//! Variable names match the original deployment contract: `REDIS_HOST`,
//! `REDIS_PORT`, `REDIS_USERNAME`, `REDIS_PASSWORD`, `STREAM_REQUESTS`,
//! `STREAM_RESULTS`, `DISCORD_TOKEN`, `PORT`.

use secrecy::Secret;

use crate::{
    error::{Context, Result},
    schema::{CourierConfig, DEFAULT_PORT},
};

/// Load configuration from the process environment (reading a `.env` file
/// first, if present).
pub fn load() -> Result<CourierConfig> {
    dotenvy::dotenv().ok();
    from_vars(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary variable source. Unset variables
/// fall back to the schema defaults.
pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<CourierConfig> {
    let mut config = CourierConfig::default();

    if let Some(host) = get("REDIS_HOST") {
        config.redis.host = host;
    }
    if let Some(port) = get("REDIS_PORT") {
        config.redis.port = port.parse().context("invalid REDIS_PORT")?;
    }
    config.redis.username = get("REDIS_USERNAME");
    config.redis.password = get("REDIS_PASSWORD").map(Secret::new);

    if let Some(requests) = get("STREAM_REQUESTS") {
        config.streams.requests = requests;
    }
    if let Some(results) = get("STREAM_RESULTS") {
        config.streams.results = results;
    }

    if let Some(token) = get("DISCORD_TOKEN") {
        config.discord.token = Secret::new(token);
    }

    config.server.port = get("PORT")
        .and_then(|raw| parse_port(&raw))
        .unwrap_or(DEFAULT_PORT);

    Ok(config)
}

/// A usable listen port, or `None` for anything unparseable or zero.
fn parse_port(raw: &str) -> Option<u16> {
    raw.parse::<u16>().ok().filter(|port| *port != 0)
}
