//! Explicit configuration for the courier relay.
//!
//! Every component receives its configuration section at construction time;
//! environment variables are read in exactly one place, [`loader`].

pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::load,
    schema::{CourierConfig, DiscordConfig, RedisConfig, ServerConfig, StreamsConfig},
};
