use thiserror::Error;

/// Crate-wide result type for stream store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The store was unreachable at startup. Fatal; never retried here.
    #[error("failed to connect to stream store: {source}")]
    Connect {
        #[source]
        source: redis::RedisError,
    },

    /// A command failed after the connection was established. The consumer
    /// loop treats these as transient and backs off.
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn connect(source: redis::RedisError) -> Self {
        Self::Connect { source }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}
