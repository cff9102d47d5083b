//! Persistence layer: key-value adapters, codec, startup load and the
//! debounced writer.
//!
//! # Responsibility
//! - Keep storage details out of the in-memory store.
//! - Store the whole collection as one value under one key.
//!
//! # Invariants
//! - Storage failures never reach store callers; they are logged here.

pub mod codec;
pub mod kv;
pub mod loader;
pub mod sqlite;
pub mod writer;
