//! SQLite bootstrap for the durable key-value adapter.
//!
//! # Responsibility
//! - Open SQLite connections and bring `kv_entries` up to date.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No key-value reads/writes happen before migrations succeed.
//! - Failures surface as `KvError`, the adapter's own error type.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
