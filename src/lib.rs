#![deny(missing_docs)]

//! A Rust client library for the DIAL model gateway.
//!
//! One normalized chat-completion protocol fronts OpenAI, Google and Anthropic
//! models. This crate provides the message model (text, image parts and
//! attachments), a [`ModelClient`] for completions and a [`BucketClient`] for
//! moving binary attachments through the gateway's object storage.

pub mod bucket;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use bucket::{BucketClient, StorageError};
pub use client::ModelClient;
pub use config::{ConfigError, DialConfig};
pub use error::DialError;
