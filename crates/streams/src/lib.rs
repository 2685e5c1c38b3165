//! Client for the durable append-only stream store.
//!
//! The relay talks to the store through the [`StreamStore`] trait: append a
//! record, read records after a cursor with a bounded block, delete a record
//! by id. [`RedisStreamStore`] is the production implementation over Redis
//! streams; [`MemoryStreamStore`] backs tests and local experiments.

pub mod error;
pub mod id;
pub mod memory;
pub mod redis;
pub mod store;

pub use {
    self::redis::RedisStreamStore,
    error::{Error, Result},
    id::RecordId,
    memory::MemoryStreamStore,
    store::{StreamRecord, StreamStore},
};
