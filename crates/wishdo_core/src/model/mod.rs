//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task/step records shared by store, persistence and
//!   FFI layers.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod task;
