//! Error plumbing shared across all courier crates.

pub mod error;

pub use error::FromMessage;
