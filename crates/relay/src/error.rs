use std::error::Error as StdError;

use thiserror::Error;

/// Crate-wide result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural precondition on the producer: requests exist only for
    /// text-capable channels. Surfaced synchronously so the caller can
    /// notify the originating user.
    #[error("tasks can only be initiated from text channels (channel {channel_id})")]
    NotTextChannel { channel_id: String },

    /// The stream store rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] courier_streams::Error),

    /// Wrapped failure from the chat-platform client.
    #[error("chat client error: {context}: {source}")]
    Chat {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn not_text_channel(channel_id: impl Into<String>) -> Self {
        Self::NotTextChannel {
            channel_id: channel_id.into(),
        }
    }

    #[must_use]
    pub fn chat(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Chat {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
