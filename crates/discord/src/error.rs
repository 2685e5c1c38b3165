use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Gateway(#[from] serenity::Error),

    #[error(transparent)]
    Relay(#[from] courier_relay::Error),
}

/// A chat-platform id that is not a Discord snowflake.
#[derive(Debug, Error)]
#[error("invalid {what} id: {value}")]
pub struct InvalidId {
    pub what: &'static str,
    pub value: String,
}

impl InvalidId {
    #[must_use]
    pub fn channel(value: impl Into<String>) -> Self {
        Self {
            what: "channel",
            value: value.into(),
        }
    }
}
