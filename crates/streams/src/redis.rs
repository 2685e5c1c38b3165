use std::time::Duration;

use {
    async_trait::async_trait,
    redis::{
        AsyncCommands, Client,
        aio::MultiplexedConnection,
        streams::{StreamReadOptions, StreamReadReply},
    },
};

use courier_config::RedisConfig;

use crate::{
    Result,
    error::Error,
    id::RecordId,
    store::{StreamRecord, StreamStore},
};

/// Redis-streams implementation of [`StreamStore`].
///
/// Holds two multiplexed connections: one dedicated to blocking reads (a
/// blocked XREAD stalls every other command sharing its connection) and one
/// for appends and deletes, which may be issued concurrently.
#[derive(Clone)]
pub struct RedisStreamStore {
    commands: MultiplexedConnection,
    reader: MultiplexedConnection,
}

impl RedisStreamStore {
    /// Connect both connections up front. Fails with [`Error::Connect`] if
    /// the store is unreachable; callers treat that as fatal.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url()).map_err(Error::connect)?;
        let commands = client
            .get_multiplexed_async_connection()
            .await
            .map_err(Error::connect)?;
        let reader = client
            .get_multiplexed_async_connection()
            .await
            .map_err(Error::connect)?;
        Ok(Self { commands, reader })
    }
}

#[async_trait]
impl StreamStore for RedisStreamStore {
    async fn append(
        &self,
        stream: &str,
        id: &RecordId,
        fields: &[(String, String)],
    ) -> Result<RecordId> {
        let mut conn = self.commands.clone();
        let assigned: String = conn.xadd(stream, id.as_str(), fields).await?;
        Ok(RecordId::new(assigned))
    }

    async fn read_blocking(
        &self,
        stream: &str,
        after: &RecordId,
        block: Duration,
        max_count: usize,
    ) -> Result<Option<Vec<StreamRecord>>> {
        let options = StreamReadOptions::default()
            .block(block.as_millis() as usize)
            .count(max_count);
        let mut conn = self.reader.clone();
        let reply: Option<StreamReadReply> = conn
            .xread_options(&[stream], &[after.as_str()], &options)
            .await?;

        let Some(reply) = reply else {
            return Ok(None);
        };

        let mut records = Vec::new();
        for key in reply.keys {
            for entry in key.ids {
                let fields = entry
                    .map
                    .iter()
                    .map(|(name, value)| {
                        let text: String = redis::from_redis_value(value).unwrap_or_default();
                        (name.clone(), text)
                    })
                    .collect();
                records.push(StreamRecord {
                    id: RecordId::new(entry.id.clone()),
                    fields,
                });
            }
        }

        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records))
        }
    }

    async fn delete(&self, stream: &str, id: &RecordId) -> Result<u64> {
        let mut conn = self.commands.clone();
        let removed: u64 = conn.xdel(stream, &[id.as_str()]).await?;
        Ok(removed)
    }
}
