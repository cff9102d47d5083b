//! In-memory task state.
//!
//! # Responsibility
//! - Own the authoritative task collection and its mutation operations.
//! - Stay free of I/O; persistence is layered on top by `service`.

pub mod task_store;
