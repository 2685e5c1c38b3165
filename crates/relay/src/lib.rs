//! The durable request/result relay protocol.
//!
//! Inbound chat events pass the eligibility gate, become task-request records
//! in the request stream, and an external worker answers each with a record
//! in the result stream. The consumer side blocks on the result stream,
//! delivers each result back to its originating conversation, then deletes
//! the request/result pair. At-least-once end to end: the cursor is process
//! local, so a restart re-delivers anything not yet cleaned up.

pub mod chat;
pub mod cleanup;
pub mod consumer;
pub mod dispatch;
pub mod error;
pub mod gating;
pub mod producer;
pub mod record;

pub use {
    chat::{ChannelContext, ChannelKind, ChatClient, InboundMessage},
    consumer::{ResultFeed, ResultListener},
    dispatch::ResultDispatcher,
    error::{Error, Result},
    gating::{Ineligible, check_eligibility, is_eligible},
    producer::submit,
    record::{TaskRequest, TaskResult},
};
